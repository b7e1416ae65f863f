//! PersonaShop - style profile matching and product recommendations
//!
//! This library provides the rule-based style matcher behind the PersonaShop
//! catalog: preference sets become catalog filters and per-product match
//! scores, recommendation lists are backfilled with the newest products, and
//! stored profiles carry an AI-written style narrative.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_filter, score_product, NarrativeGenerator, Recommender};
pub use crate::error::{StorageError, ValidationError};
pub use crate::models::{CatalogFilter, PreferenceSet, Product, StyleMatch, StyleNarrative, StyleProfile};
