// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CatalogFilter, FilterClause, PreferenceSet, Product, ProductPage, ProductQuery, SortField,
    SortOrder, StyleMatch, StyleNarrative, StyleProfile,
};
pub use requests::{ListProductsRequest, SaveProfileRequest};
pub use responses::{
    CategoriesResponse, ErrorResponse, HealthResponse, ProductResponse, ProfileResponse,
    RecommendationsResponse, SaveProfileResponse, StyleMatchResponse,
};
