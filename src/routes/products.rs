use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::score_product;
use crate::error::ValidationError;
use crate::models::{
    CategoriesResponse, ListProductsRequest, Product, ProductQuery, ProductResponse,
    RecommendationsResponse, StyleMatchResponse,
};
use crate::routes::style::load_profile;
use crate::routes::{bad_request, not_found, storage_failure, AppState, AuthenticatedUser};
use crate::services::CacheKey;

const PERSONALIZED_MESSAGE: &str = "Personalized recommendations based on style profile";
const DEFAULT_MESSAGE: &str = "Default recommendations (no style profile)";

/// Cached recommendations, tagged with the profile version they were built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRecommendations {
    pub profile_updated_at: Option<DateTime<Utc>>,
    pub response: RecommendationsResponse,
}

/// Configure all product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Literal segments are registered before `{id}` so they win the match
    cfg.route("/products/list", web::get().to(list_products))
        .route("/products/categories", web::get().to(list_categories))
        .route("/products/recommendations", web::get().to(recommendations))
        .route("/products/{id}/with-style-match", web::get().to(product_with_style_match))
        .route("/products/{id}", web::get().to(get_product));
}

/// Browse the catalog
///
/// GET /api/v1/products/list?category=&min_price=&max_price=&search=&sort_by=&sort_order=&page=&per_page=
async fn list_products(
    state: web::Data<AppState>,
    req: web::Query<ListProductsRequest>,
) -> impl Responder {
    let req = req.into_inner();
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for product listing: {:?}", errors);
        return bad_request(&ValidationError::from(errors));
    }

    let query = ProductQuery::from(req);
    match state.catalog.list(&query).await {
        Ok(page) => {
            tracing::debug!(
                "Listed {} of {} products (page {})",
                page.products.len(),
                page.total_products,
                page.page
            );
            HttpResponse::Ok().json(page)
        }
        Err(e) => storage_failure("Failed to list products", &e),
    }
}

/// Distinct categories across the catalog
///
/// GET /api/v1/products/categories
async fn list_categories(state: web::Data<AppState>) -> impl Responder {
    let key = CacheKey::categories();
    if let Some(categories) = state.cache_get::<Vec<String>>(&key).await {
        return HttpResponse::Ok().json(CategoriesResponse { categories });
    }

    match state.catalog.categories().await {
        Ok(categories) => {
            state.cache_set(&key, &categories).await;
            HttpResponse::Ok().json(CategoriesResponse { categories })
        }
        Err(e) => storage_failure("Failed to fetch categories", &e),
    }
}

/// GET /api/v1/products/{id}
async fn get_product(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match fetch_product(&state, &path).await {
        Ok(product) => HttpResponse::Ok().json(ProductResponse { product }),
        Err(response) => response,
    }
}

/// Recommendations for the caller
///
/// GET /api/v1/products/recommendations
///
/// Callers without a style profile get the newest products.
async fn recommendations(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    let profile = match load_profile(&state, user.user_id).await {
        Ok(profile) => profile,
        Err(e) => return storage_failure("Failed to fetch style profile", &e),
    };
    let profile_updated_at = profile.as_ref().map(|p| p.updated_at);

    // An entry built from another profile version is ignored
    let key = CacheKey::recommendations(user.user_id);
    if let Some(cached) = state.cache_get::<CachedRecommendations>(&key).await {
        if cached.profile_updated_at == profile_updated_at {
            tracing::debug!("Serving cached recommendations for {}", user.user_id);
            return HttpResponse::Ok().json(cached.response);
        }
    }

    let preferences = profile.as_ref().map(|p| &p.preferences);

    let products = match state
        .recommender
        .recommend(preferences, state.catalog.as_ref())
        .await
    {
        Ok(products) => products,
        Err(e) => return storage_failure("Failed to fetch recommendations", &e),
    };

    let message = if preferences.is_some() {
        PERSONALIZED_MESSAGE
    } else {
        DEFAULT_MESSAGE
    };

    tracing::info!(
        "Returning {} recommendations for user {} ({})",
        products.len(),
        user.user_id,
        if preferences.is_some() { "personalized" } else { "default" }
    );

    let response = RecommendationsResponse {
        products,
        message: message.to_string(),
    };
    let cached = CachedRecommendations {
        profile_updated_at,
        response,
    };
    state.cache_set(&key, &cached).await;

    HttpResponse::Ok().json(cached.response)
}

/// A product plus how well it fits the caller's style profile
///
/// GET /api/v1/products/{id}/with-style-match
async fn product_with_style_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> impl Responder {
    let product = match fetch_product(&state, &path).await {
        Ok(product) => product,
        Err(response) => return response,
    };

    let profile = match load_profile(&state, user.user_id).await {
        Ok(profile) => profile,
        Err(e) => return storage_failure("Failed to fetch style profile", &e),
    };

    let preferences = profile.as_ref().and_then(|p| p.matching_preferences());
    let style_match = score_product(&product, preferences);

    tracing::debug!(
        "Product {} scored {} for user {}",
        product.id,
        style_match.score,
        user.user_id
    );

    HttpResponse::Ok().json(StyleMatchResponse {
        product,
        style_match,
    })
}

/// Resolve a path id to a product, or the error response to send
async fn fetch_product(state: &AppState, raw_id: &str) -> Result<Product, HttpResponse> {
    let id = Uuid::parse_str(raw_id).map_err(|e| {
        bad_request(&ValidationError::Invalid {
            field: "product id",
            reason: e.to_string(),
        })
    })?;

    match state.catalog.get_product(id).await {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(not_found("Product")),
        Err(e) => Err(storage_failure("Failed to fetch product", &e)),
    }
}
