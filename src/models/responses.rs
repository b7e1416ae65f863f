use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{Product, StyleMatch, StyleNarrative, StyleProfile};

/// Response for the category listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Response for the single product endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub products: Vec<Product>,
    pub message: String,
}

/// Response for the product-with-style-match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleMatchResponse {
    pub product: Product,
    pub style_match: StyleMatch,
}

/// Response for reading the caller's style profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub has_profile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<StyleProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for saving the caller's style profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProfileResponse {
    pub message: String,
    pub profile_id: Uuid,
    pub ai_analysis: StyleNarrative,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
