use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{PreferenceSet, StyleNarrative, StyleProfile};

/// Persistence for style profiles, one per user
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<StyleProfile>, StorageError>;

    /// Insert the user's profile or replace its preferences and narrative
    ///
    /// `created_at` survives updates, `updated_at` is bumped.
    async fn upsert_profile(
        &self,
        user_id: Uuid,
        preferences: &PreferenceSet,
        narrative: &StyleNarrative,
    ) -> Result<StyleProfile, StorageError>;
}
