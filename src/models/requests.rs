use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{PreferenceSet, ProductQuery, SortField, SortOrder};

/// Query string of the product listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListProductsRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub max_price: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    12
}

impl From<ListProductsRequest> for ProductQuery {
    fn from(req: ListProductsRequest) -> Self {
        Self {
            category: req.category.filter(|c| !c.is_empty()),
            min_price: req.min_price,
            max_price: req.max_price,
            search: req.search,
            sort_by: req.sort_by,
            sort_order: req.sort_order,
            page: req.page,
            per_page: req.per_page,
        }
    }
}

/// Body of the style profile save endpoint
///
/// `preferences` is optional at the serde level so a missing field can be
/// reported with a proper validation message instead of a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProfileRequest {
    #[serde(default)]
    pub preferences: Option<PreferenceSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_request_defaults() {
        let req: ListProductsRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 12);
        assert_eq!(req.sort_by, SortField::CreatedAt);
        assert_eq!(req.sort_order, SortOrder::Desc);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_list_request_rejects_oversized_page() {
        let req: ListProductsRequest = serde_json::from_str(r#"{"per_page": 500}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_request_rejects_negative_price() {
        let req: ListProductsRequest = serde_json::from_str(r#"{"min_price": -1.0}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_category_is_ignored() {
        let req: ListProductsRequest = serde_json::from_str(r#"{"category": ""}"#).unwrap();
        let query = ProductQuery::from(req);
        assert_eq!(query.category, None);
    }

    #[test]
    fn test_save_request_without_preferences() {
        let req: SaveProfileRequest = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(req.preferences.is_none());
    }
}
