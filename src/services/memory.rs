use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{
    CatalogFilter, PreferenceSet, Product, ProductPage, ProductQuery, SortField, SortOrder,
    StyleNarrative, StyleProfile,
};
use crate::services::catalog::ProductCatalog;
use crate::services::profiles::ProfileStore;

/// Newest first, ties broken by id descending
fn newest_first(a: &Product, b: &Product) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Fixed product catalog held in memory
///
/// Used for tests, benchmarks and local runs without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by(newest_first);
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn find(&self, filter: &CatalogFilter, limit: usize) -> Result<Vec<Product>, StorageError> {
        Ok(self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn most_recent(
        &self,
        limit: usize,
        excluding: &HashSet<Uuid>,
    ) -> Result<Vec<Product>, StorageError> {
        Ok(self
            .products
            .iter()
            .filter(|p| !excluding.contains(&p.id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, StorageError> {
        let mut matching: Vec<&Product> = self.products.iter().filter(|p| query.matches(p)).collect();

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
                SortField::Name => a.name.cmp(&b.name),
            }
            .then_with(|| a.id.cmp(&b.id));

            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let products = matching
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .cloned()
            .collect();

        Ok(ProductPage::new(products, query, total))
    }

    async fn categories(&self) -> Result<Vec<String>, StorageError> {
        let distinct: BTreeSet<&String> = self
            .products
            .iter()
            .flat_map(|p| p.categories.iter())
            .collect();

        Ok(distinct.into_iter().cloned().collect())
    }
}

/// Profile store held in memory, keyed by user id
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, StyleProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<StyleProfile>, StorageError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        preferences: &PreferenceSet,
        narrative: &StyleNarrative,
    ) -> Result<StyleProfile, StorageError> {
        let now = Utc::now();
        let mut profiles = self.profiles.write().await;

        let profile = profiles
            .entry(user_id)
            .and_modify(|existing| {
                existing.preferences = preferences.clone();
                existing.narrative = Some(narrative.clone());
                existing.updated_at = now;
            })
            .or_insert_with(|| StyleProfile {
                id: Uuid::new_v4(),
                user_id,
                preferences: preferences.clone(),
                narrative: Some(narrative.clone()),
                created_at: now,
                updated_at: now,
            });

        Ok(profile.clone())
    }
}
