use std::collections::HashSet;
use uuid::Uuid;

use crate::core::filters::build_filter;
use crate::error::StorageError;
use crate::models::{PreferenceSet, Product};
use crate::services::catalog::ProductCatalog;

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 6;

/// Assembles a fixed-size recommendation list for a user
///
/// # Pipeline
/// 1. No preferences: the newest products
/// 2. Preferences: products matching the derived catalog filter, newest first
/// 3. Backfill: newest products not already picked, until `limit` is reached
///
/// The result never holds the same product id twice and never exceeds
/// `limit`. A catalog smaller than `limit` just yields a shorter list.
#[derive(Debug, Clone, Copy)]
pub struct Recommender {
    limit: usize,
}

impl Recommender {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn with_default_limit() -> Self {
        Self::new(DEFAULT_RECOMMENDATION_LIMIT)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub async fn recommend(
        &self,
        preferences: Option<&PreferenceSet>,
        catalog: &dyn ProductCatalog,
    ) -> Result<Vec<Product>, StorageError> {
        if self.limit == 0 {
            return Ok(Vec::new());
        }

        let mut picked = Picked::new(self.limit);

        let Some(preferences) = preferences else {
            let newest = catalog.most_recent(self.limit, &HashSet::new()).await?;
            picked.extend(newest);
            tracing::debug!("No style profile, returning {} newest products", picked.len());
            return Ok(picked.into_products());
        };

        let filter = build_filter(preferences);
        let matches = catalog.find(&filter, self.limit).await?;
        picked.extend(matches);
        let matched = picked.len();

        if !picked.is_full() {
            let backfill = catalog
                .most_recent(self.limit - picked.len(), &picked.ids)
                .await?;
            picked.extend(backfill);
        }

        tracing::debug!(
            "Recommended {} products ({} matched, {} backfilled, {} filter clauses)",
            picked.len(),
            matched,
            picked.len() - matched,
            filter.clauses.len()
        );

        Ok(picked.into_products())
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_limit()
    }
}

/// Ordered, de-duplicated, bounded product list
struct Picked {
    limit: usize,
    ids: HashSet<Uuid>,
    products: Vec<Product>,
}

impl Picked {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            ids: HashSet::with_capacity(limit),
            products: Vec::with_capacity(limit),
        }
    }

    fn len(&self) -> usize {
        self.products.len()
    }

    fn is_full(&self) -> bool {
        self.products.len() >= self.limit
    }

    fn extend(&mut self, products: Vec<Product>) {
        for product in products {
            if self.is_full() {
                break;
            }
            if self.ids.insert(product.id) {
                self.products.push(product);
            }
        }
    }

    fn into_products(self) -> Vec<Product> {
        self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogFilter, ProductPage, ProductQuery};
    use crate::services::memory::InMemoryCatalog;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn create_product(n: u128, categories: &[&str], color: &str) -> Product {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(n as i64);
        let mut attributes = BTreeMap::new();
        attributes.insert("color".to_string(), color.to_string());

        Product {
            id: Uuid::from_u128(n),
            name: format!("Product {}", n),
            description: String::new(),
            price: 25.0,
            image_url: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            attributes,
            created_at: created,
            updated_at: created,
        }
    }

    fn ids(products: &[Product]) -> Vec<u128> {
        products.iter().map(|p| p.id.as_u128()).collect()
    }

    /// Catalog that hands back duplicates to prove the assembler dedupes
    struct RepeatingCatalog(Product);

    #[async_trait]
    impl ProductCatalog for RepeatingCatalog {
        async fn find(&self, _: &CatalogFilter, limit: usize) -> Result<Vec<Product>, StorageError> {
            Ok(vec![self.0.clone(); limit])
        }

        async fn most_recent(
            &self,
            limit: usize,
            _: &HashSet<Uuid>,
        ) -> Result<Vec<Product>, StorageError> {
            Ok(vec![self.0.clone(); limit])
        }

        async fn get_product(&self, _: Uuid) -> Result<Option<Product>, StorageError> {
            Ok(None)
        }

        async fn list(&self, query: &ProductQuery) -> Result<ProductPage, StorageError> {
            Ok(ProductPage::new(vec![], query, 0))
        }

        async fn categories(&self) -> Result<Vec<String>, StorageError> {
            Ok(vec![])
        }
    }

    /// Catalog whose `find` and/or `most_recent` report the store as down
    struct FailingCatalog {
        matches: Vec<Product>,
        fail_find: bool,
        fail_most_recent: bool,
    }

    impl FailingCatalog {
        fn down() -> Self {
            Self {
                matches: vec![],
                fail_find: true,
                fail_most_recent: true,
            }
        }

        fn backfill_down(matches: Vec<Product>) -> Self {
            Self {
                matches,
                fail_find: false,
                fail_most_recent: true,
            }
        }

        fn unavailable() -> StorageError {
            StorageError::Unavailable("catalog offline".to_string())
        }
    }

    #[async_trait]
    impl ProductCatalog for FailingCatalog {
        async fn find(&self, _: &CatalogFilter, limit: usize) -> Result<Vec<Product>, StorageError> {
            if self.fail_find {
                return Err(Self::unavailable());
            }
            Ok(self.matches.iter().take(limit).cloned().collect())
        }

        async fn most_recent(
            &self,
            _: usize,
            _: &HashSet<Uuid>,
        ) -> Result<Vec<Product>, StorageError> {
            if self.fail_most_recent {
                return Err(Self::unavailable());
            }
            Ok(vec![])
        }

        async fn get_product(&self, _: Uuid) -> Result<Option<Product>, StorageError> {
            Err(Self::unavailable())
        }

        async fn list(&self, _: &ProductQuery) -> Result<ProductPage, StorageError> {
            Err(Self::unavailable())
        }

        async fn categories(&self) -> Result<Vec<String>, StorageError> {
            Err(Self::unavailable())
        }
    }

    #[tokio::test]
    async fn test_no_profile_returns_newest() {
        let catalog = InMemoryCatalog::new((1..=10).map(|n| create_product(n, &["casual"], "navy")).collect());

        let products = Recommender::default().recommend(None, &catalog).await.unwrap();

        assert_eq!(ids(&products), vec![10, 9, 8, 7, 6, 5]);
    }

    #[tokio::test]
    async fn test_matches_then_backfill() {
        let catalog = InMemoryCatalog::new(vec![
            create_product(1, &["formal"], "black"),
            create_product(2, &["casual"], "black"),
            create_product(3, &["business"], "white"),
            create_product(4, &["casual"], "olive"),
            create_product(5, &["formal"], "navy"),
            create_product(6, &["casual"], "rust"),
            create_product(7, &["everyday"], "gray"),
        ]);
        let prefs = PreferenceSet::new()
            .with("occasion", "formal")
            .with("color_palette", "neutrals");

        let products = Recommender::default().recommend(Some(&prefs), &catalog).await.unwrap();

        // 3 and 1 match both clauses, the rest is backfill newest first
        assert_eq!(ids(&products), vec![3, 1, 7, 6, 5, 4]);
    }

    #[tokio::test]
    async fn test_small_catalog_is_not_an_error() {
        let catalog = InMemoryCatalog::new(vec![
            create_product(1, &["formal"], "black"),
            create_product(2, &["casual"], "olive"),
        ]);
        let prefs = PreferenceSet::new().with("occasion", "casual");

        let products = Recommender::default().recommend(Some(&prefs), &catalog).await.unwrap();

        assert_eq!(ids(&products), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_limit_caps_matches() {
        let catalog = InMemoryCatalog::new((1..=9).map(|n| create_product(n, &["casual"], "brown")).collect());
        let prefs = PreferenceSet::new().with("occasion", "casual");

        let products = Recommender::new(4).recommend(Some(&prefs), &catalog).await.unwrap();

        assert_eq!(ids(&products), vec![9, 8, 7, 6]);
    }

    #[tokio::test]
    async fn test_duplicates_from_catalog_are_dropped() {
        let catalog = RepeatingCatalog(create_product(42, &["formal"], "black"));
        let prefs = PreferenceSet::new().with("occasion", "formal");

        let products = Recommender::default().recommend(Some(&prefs), &catalog).await.unwrap();

        assert_eq!(ids(&products), vec![42]);
    }

    #[tokio::test]
    async fn test_find_failure_propagates() {
        let prefs = PreferenceSet::new().with("occasion", "formal");

        let result = Recommender::default()
            .recommend(Some(&prefs), &FailingCatalog::down())
            .await;

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_backfill_failure_after_partial_match_propagates() {
        let catalog = FailingCatalog::backfill_down(vec![create_product(1, &["formal"], "black")]);
        let prefs = PreferenceSet::new().with("occasion", "formal");

        let result = Recommender::default().recommend(Some(&prefs), &catalog).await;

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_full_match_skips_backfill() {
        let matches = (1..=6).map(|n| create_product(n, &["formal"], "black")).collect();
        let catalog = FailingCatalog::backfill_down(matches);
        let prefs = PreferenceSet::new().with("occasion", "formal");

        let products = Recommender::default().recommend(Some(&prefs), &catalog).await.unwrap();

        assert_eq!(products.len(), 6);
    }

    #[tokio::test]
    async fn test_no_profile_failure_propagates() {
        let result = Recommender::default().recommend(None, &FailingCatalog::down()).await;

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_zero_limit() {
        let catalog = InMemoryCatalog::new(vec![create_product(1, &[], "black")]);
        let products = Recommender::new(0).recommend(None, &catalog).await.unwrap();
        assert!(products.is_empty());
    }
}
