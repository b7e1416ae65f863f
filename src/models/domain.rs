use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A user's style preferences: preference category -> chosen value
///
/// Keys are open-ended (e.g. `occasion`, `color_palette`, `fit_preference`).
/// Matching logic only reads the keys it has rules for; everything else is
/// carried along untouched. Entries keep the order in which they were first
/// inserted (for JSON input, document order); re-inserting a key replaces
/// its value in place. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct PreferenceSet(Vec<(String, String)>);

impl PreferenceSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder-style insert, handy for fixtures
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for PreferenceSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for PreferenceSet {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PreferenceSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl Serialize for PreferenceSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for PreferenceSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PreferenceVisitor;

        impl<'de> serde::de::Visitor<'de> for PreferenceVisitor {
            type Value = PreferenceSet;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of preference names to string values")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut set = PreferenceSet(Vec::with_capacity(map.size_hint().unwrap_or(0)));
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    set.insert(key, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(PreferenceVisitor)
    }
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// True if any of the product's categories is in `accepted`
    pub fn has_category_in<S: AsRef<str>>(&self, accepted: &[S]) -> bool {
        self.categories
            .iter()
            .any(|c| accepted.iter().any(|a| a.as_ref() == c))
    }

    /// True if attribute `key` is present and its value is in `accepted`
    pub fn attribute_in<S: AsRef<str>>(&self, key: &str, accepted: &[S]) -> bool {
        self.attribute(key)
            .is_some_and(|value| accepted.iter().any(|a| a.as_ref() == value))
    }
}

/// AI-generated description of a preference set plus extracted keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleNarrative {
    pub description: String,
    pub keywords: Vec<String>,
    pub generated_at: DateTime<Utc>,
    /// Set only when generation failed and this is the fallback narrative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StyleNarrative {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Stored style profile, one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub preferences: PreferenceSet,
    #[serde(rename = "ai_analysis", alias = "narrative", default)]
    pub narrative: Option<StyleNarrative>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StyleProfile {
    /// Preferences usable for matching; a profile with an empty preference
    /// set counts as no profile at all.
    pub fn matching_preferences(&self) -> Option<&PreferenceSet> {
        if self.preferences.is_empty() {
            None
        } else {
            Some(&self.preferences)
        }
    }
}

/// How well a single product fits a user's preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleMatch {
    #[serde(rename = "has_style_profile")]
    pub has_profile: bool,
    #[serde(rename = "match_score")]
    pub score: u8,
    #[serde(rename = "match_reasons")]
    pub reasons: Vec<String>,
}

impl StyleMatch {
    pub fn no_profile() -> Self {
        Self {
            has_profile: false,
            score: 0,
            reasons: Vec::new(),
        }
    }
}

/// One constraint of a catalog filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// Product categories must intersect `values`
    CategoryIn(Vec<String>),
    /// Product attribute `key` must be one of `values`
    AttributeIn { key: String, values: Vec<String> },
}

impl FilterClause {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            FilterClause::CategoryIn(values) => product.has_category_in(values),
            FilterClause::AttributeIn { key, values } => product.attribute_in(key, values),
        }
    }
}

/// Structured catalog filter; clauses are ANDed, no clauses matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub clauses: Vec<FilterClause>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.clauses.iter().all(|clause| clause.matches(product))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Catalog browsing query
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            per_page: 12,
        }
    }
}

impl ProductQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Check the non-pagination constraints against a product
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.categories.iter().any(|c| c == category) {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }

        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        true
    }
}

/// One page of catalog browsing results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
    pub total_products: u64,
    pub total_pages: u64,
}

impl ProductPage {
    pub fn new(products: Vec<Product>, query: &ProductQuery, total_products: u64) -> Self {
        let per_page = u64::from(query.per_page.max(1));
        Self {
            products,
            page: query.page,
            per_page: query.per_page,
            total_products,
            total_pages: total_products.div_ceil(per_page),
        }
    }
}
