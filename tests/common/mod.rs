// Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use personashop::models::Product;
use personashop::services::{GenerationError, InMemoryCatalog, TextGenerator};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// Seed catalog: (name, price, categories, color)
///
/// Listed oldest to newest; product n (1-based) gets id `Uuid::from_u128(n)`.
const SEED: &[(&str, f64, &[&str], &str)] = &[
    ("Classic White Shirt", 49.99, &["clothing", "formal", "shirts"], "white"),
    ("Navy Blue Blazer", 129.99, &["clothing", "formal", "outerwear"], "navy"),
    ("Black Slim-Fit Jeans", 59.99, &["clothing", "casual", "jeans"], "black"),
    ("Beige Chino Pants", 45.99, &["clothing", "casual", "pants"], "beige"),
    ("Gray Cashmere Sweater", 149.99, &["clothing", "casual", "knitwear"], "gray"),
    ("Brown Leather Belt", 35.99, &["accessories", "belts"], "brown"),
    ("Minimalist Watch", 89.99, &["accessories", "watches"], "black"),
    ("Canvas Tote Bag", 29.99, &["accessories", "bags"], "natural"),
    ("White Sneakers", 79.99, &["footwear", "casual", "sneakers"], "white"),
    ("Black Chelsea Boots", 129.99, &["footwear", "formal", "boots"], "black"),
    ("Wool Scarf", 39.99, &["accessories", "scarves"], "gray"),
    ("Leather Messenger Bag", 149.99, &["accessories", "bags", "formal"], "brown"),
];

pub fn product_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn seed_products() -> Vec<Product> {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

    SEED.iter()
        .enumerate()
        .map(|(i, (name, price, categories, color))| {
            let created = base + ChronoDuration::minutes(i as i64);
            let mut attributes = BTreeMap::new();
            attributes.insert("color".to_string(), color.to_string());
            attributes.insert("gender".to_string(), "unisex".to_string());

            Product {
                id: product_id(i as u128 + 1),
                name: name.to_string(),
                description: format!("{} from the seed collection", name),
                price: *price,
                image_url: None,
                categories: categories.iter().map(|c| c.to_string()).collect(),
                attributes,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
}

pub fn seed_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(seed_products())
}

/// Seed positions (1-based) of a product list
pub fn positions(products: &[Product]) -> Vec<u128> {
    products.iter().map(|p| p.id.as_u128()).collect()
}

/// Text generator with a fixed behavior
pub enum StubGenerator {
    Reply(&'static str),
    Fail,
    Hang(Duration),
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _max_tokens: u32,
    ) -> Result<String, GenerationError> {
        match self {
            StubGenerator::Reply(text) => Ok(text.to_string()),
            StubGenerator::Fail => Err(GenerationError::ApiError {
                status: 503,
                body: "upstream unavailable".to_string(),
            }),
            StubGenerator::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("too late".to_string())
            }
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub const STYLIST_REPLY: &str =
    "Your style is classic and elegant, with a sophisticated and minimalist feel.";
