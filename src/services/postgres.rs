use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{
    CatalogFilter, FilterClause, PreferenceSet, Product, ProductPage, ProductQuery, SortField,
    SortOrder, StyleNarrative, StyleProfile,
};
use crate::services::catalog::ProductCatalog;
use crate::services::profiles::ProfileStore;

const SELECT_PRODUCTS: &str = r#"
    SELECT id, name, description, price, image_url, categories, attributes, created_at, updated_at
    FROM products
"#;

const SELECT_PROFILES: &str = r#"
    SELECT id, user_id, preferences, narrative, created_at, updated_at
    FROM style_profiles
"#;

/// PostgreSQL client backing both the product catalog and the profile store
///
/// Products keep their categories in a `TEXT[]` column and their attributes
/// in a `JSONB` object, so catalog filters translate directly to array
/// overlap and `->>` lookups.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StorageError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl ProductCatalog for PostgresClient {
    async fn find(&self, filter: &CatalogFilter, limit: usize) -> Result<Vec<Product>, StorageError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_PRODUCTS);
        qb.push(" WHERE TRUE");

        for clause in &filter.clauses {
            match clause {
                FilterClause::CategoryIn(values) => {
                    qb.push(" AND categories && ").push_bind(values.clone());
                }
                FilterClause::AttributeIn { key, values } => {
                    qb.push(" AND (attributes ->> ")
                        .push_bind(key.clone())
                        .push(") = ANY(")
                        .push_bind(values.clone())
                        .push(")");
                }
            }
        }

        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(sql_limit(limit));

        let rows = qb.build().fetch_all(&self.pool).await?;

        tracing::debug!(
            "Catalog filter with {} clauses matched {} products",
            filter.clauses.len(),
            rows.len()
        );

        rows.iter().map(product_from_row).collect()
    }

    async fn most_recent(
        &self,
        limit: usize,
        excluding: &HashSet<Uuid>,
    ) -> Result<Vec<Product>, StorageError> {
        let excluded: Vec<Uuid> = excluding.iter().copied().collect();

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_PRODUCTS);
        qb.push(" WHERE NOT (id = ANY(")
            .push_bind(excluded)
            .push(")) ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(sql_limit(limit));

        let rows = qb.build().fetch_all(&self.pool).await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        let query = format!("{} WHERE id = $1", SELECT_PRODUCTS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, StorageError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS total FROM products");
        push_list_conditions(&mut count, query);
        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get("total")?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_PRODUCTS);
        push_list_conditions(&mut qb, query);

        let column = match query.sort_by {
            SortField::CreatedAt => "created_at",
            SortField::Price => "price",
            SortField::Name => "name",
        };
        let direction = match query.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        qb.push(format!(" ORDER BY {column} {direction}, id {direction}"));
        qb.push(" LIMIT ")
            .push_bind(i64::from(query.per_page))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));

        let rows = qb.build().fetch_all(&self.pool).await?;
        let products = rows.iter().map(product_from_row).collect::<Result<Vec<_>, _>>()?;

        Ok(ProductPage::new(products, query, total.max(0) as u64))
    }

    async fn categories(&self) -> Result<Vec<String>, StorageError> {
        let query = r#"
            SELECT DISTINCT unnest(categories) AS category
            FROM products
            ORDER BY category
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| row.try_get("category").map_err(StorageError::from))
            .collect()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StorageError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ProfileStore for PostgresClient {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<StyleProfile>, StorageError> {
        let query = format!("{} WHERE user_id = $1", SELECT_PROFILES);

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    /// Uses INSERT ... ON CONFLICT so each user keeps exactly one profile.
    async fn upsert_profile(
        &self,
        user_id: Uuid,
        preferences: &PreferenceSet,
        narrative: &StyleNarrative,
    ) -> Result<StyleProfile, StorageError> {
        let query = r#"
            INSERT INTO style_profiles (id, user_id, preferences, narrative, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                preferences = EXCLUDED.preferences,
                narrative = EXCLUDED.narrative,
                updated_at = EXCLUDED.updated_at
            RETURNING id, user_id, preferences, narrative, created_at, updated_at
        "#;

        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(Json(preferences))
            .bind(Json(narrative))
            .fetch_one(&self.pool)
            .await?;

        let profile = profile_from_row(&row)?;

        tracing::debug!("Saved style profile {} for user {}", profile.id, user_id);

        Ok(profile)
    }
}

fn push_list_conditions(qb: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
    qb.push(" WHERE TRUE");

    if let Some(category) = &query.category {
        qb.push(" AND ")
            .push_bind(category.clone())
            .push(" = ANY(categories)");
    }

    if let Some(min_price) = query.min_price {
        qb.push(" AND price >= ").push_bind(min_price);
    }

    if let Some(max_price) = query.max_price {
        qb.push(" AND price <= ").push_bind(max_price);
    }

    if let Some(search) = &query.search {
        let pattern = like_pattern(search);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Wrap user input in `%...%`, escaping LIKE metacharacters
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn product_from_row(row: &PgRow) -> Result<Product, StorageError> {
    let Json(raw_attributes): Json<BTreeMap<String, Value>> = row.try_get("attributes")?;

    // Attributes are written as strings, but tolerate other JSON scalars
    let attributes = raw_attributes
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect();

    let price: f64 = row.try_get("price")?;
    if price < 0.0 {
        return Err(StorageError::InvalidData(format!("negative price {}", price)));
    }

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price,
        image_url: row.try_get("image_url")?,
        categories: row.try_get("categories")?,
        attributes,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<StyleProfile, StorageError> {
    let Json(preferences): Json<PreferenceSet> = row.try_get("preferences")?;
    let narrative: Option<Json<StyleNarrative>> = row.try_get("narrative")?;

    Ok(StyleProfile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        preferences,
        narrative: narrative.map(|Json(n)| n),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
