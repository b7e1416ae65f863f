use crate::core::rules::{active_rules, StyleRule, STYLE_RULES};
use crate::models::{CatalogFilter, PreferenceSet};

/// Translate a preference set into a catalog filter
///
/// Every firing rule contributes one independent clause and the clauses are
/// ANDed. Unknown keys and unrecognized values add nothing, so an empty or
/// unrecognized preference set yields an unfiltered query.
pub fn build_filter(preferences: &PreferenceSet) -> CatalogFilter {
    build_filter_with(preferences, STYLE_RULES)
}

/// Same as [`build_filter`] over an explicit rule table
pub fn build_filter_with(preferences: &PreferenceSet, rules: &[StyleRule]) -> CatalogFilter {
    CatalogFilter {
        clauses: active_rules(preferences, rules)
            .map(StyleRule::clause)
            .collect(),
    }
}
