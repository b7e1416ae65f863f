// Route exports
pub mod auth;
pub mod products;
pub mod style;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{NarrativeGenerator, Recommender};
use crate::error::{StorageError, ValidationError};
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{CacheManager, ProductCatalog, ProfileStore};

pub use auth::{AuthenticatedUser, JwtValidator};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ProductCatalog>,
    pub profiles: Arc<dyn ProfileStore>,
    pub narratives: Arc<NarrativeGenerator>,
    pub recommender: Recommender,
    /// `None` runs every request uncached
    pub cache: Option<Arc<CacheManager>>,
    pub jwt: JwtValidator,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(products::configure)
            .configure(style::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_healthy = match state.catalog.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Catalog health check failed: {}", e);
            false
        }
    };

    let status = if catalog_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

impl AppState {
    /// Read-through lookup; cache failures only cost a warning
    pub(crate) async fn cache_get<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(value) => Some(value),
            Err(e) if e.is_miss() => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    pub(crate) async fn cache_set<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(key, value).await {
                tracing::warn!("Cache write failed for {}: {}", key, e);
            }
        }
    }

    pub(crate) async fn cache_invalidate(&self, keys: &[String]) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(keys).await {
                tracing::warn!("Failed to invalidate cache: {}", e);
            }
        }
    }
}

pub(crate) fn bad_request(err: &ValidationError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: err.to_string(),
        status_code: 400,
    })
}

pub(crate) fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Not found".to_string(),
        message: format!("{} not found", what),
        status_code: 404,
    })
}

pub(crate) fn storage_failure(context: &str, err: &StorageError) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: context.to_string(),
        message: err.to_string(),
        status_code: 500,
    })
}
