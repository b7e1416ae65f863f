// Core algorithm exports
pub mod filters;
pub mod narrative;
pub mod recommender;
pub mod rules;
pub mod scoring;

pub use filters::build_filter;
pub use narrative::{build_style_prompt, extract_style_keywords, NarrativeGenerator, STYLE_VOCABULARY};
pub use recommender::{Recommender, DEFAULT_RECOMMENDATION_LIMIT};
pub use rules::{StyleRule, STYLE_RULES};
pub use scoring::score_product;
