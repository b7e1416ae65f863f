use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{CatalogFilter, Product, ProductPage, ProductQuery};

/// Read access to the product catalog
///
/// Every listing method returns products newest first (`created_at` desc,
/// then id desc) unless the query says otherwise.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Products matching `filter`, newest first, at most `limit`
    async fn find(&self, filter: &CatalogFilter, limit: usize) -> Result<Vec<Product>, StorageError>;

    /// Newest products whose id is not in `excluding`, at most `limit`
    async fn most_recent(
        &self,
        limit: usize,
        excluding: &HashSet<Uuid>,
    ) -> Result<Vec<Product>, StorageError>;

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StorageError>;

    /// One page of the browsing query
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, StorageError>;

    /// Distinct category tags, sorted
    async fn categories(&self) -> Result<Vec<String>, StorageError>;

    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }
}
