//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use newilano_core::{map_product, Product, RawProduct, SearchHit};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{postgres::PgArguments, query::QueryScalar, PgExecutor, PgPool, Postgres};
use uuid::Uuid;

use crate::{sql_limit, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub brand_id: Option<Uuid>,
    pub brand_name: String,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub currency: String,
    pub image: String,
    /// One of `HYPE`, `ONE_CIKAN`, `YENI`; enforced by a CHECK constraint.
    pub tag: Option<String>,
    pub product_url: Option<String>,
    pub description: String,
    pub gallery: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Runs the row through the product mapper so stored rows and imported
    /// documents share one normalization path.
    #[must_use]
    pub fn into_product(self) -> Product {
        map_product(RawProduct {
            id: Some(self.id),
            brand_id: self.brand_id,
            brand_slug: None,
            brand_name: Some(self.brand_name),
            slug: Some(self.slug),
            name: Some(self.name),
            category: Some(self.category),
            price: Some(Value::String(self.price.normalize().to_string())),
            currency: Some(Value::String(self.currency)),
            image: Some(self.image),
            tag: self.tag,
            product_url: self.product_url,
            description: Some(self.description),
            gallery: Some(self.gallery.into()),
            sizes: Some(self.sizes.into()),
            colors: Some(self.colors.into()),
            features: Some(self.features.into()),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Vec<Product> {
    rows.into_iter().map(ProductRow::into_product).collect()
}

const PRODUCT_COLUMNS: &str = "id, brand_id, brand_name, slug, name, category, price, currency, \
     image, tag, product_url, description, gallery, sizes, colors, features, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Single-product lookups
// ---------------------------------------------------------------------------

/// Returns the product with the given slug, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, DbError> {
    if slug.is_empty() {
        return Ok(None);
    }
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ProductRow::into_product))
}

/// Returns the product with the given id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ProductRow::into_product))
}

// ---------------------------------------------------------------------------
// Batch lookups
// ---------------------------------------------------------------------------

/// Returns products for `slugs` in the order the slugs were given.
///
/// Unknown slugs are dropped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_products_by_slugs(
    pool: &PgPool,
    slugs: &[String],
) -> Result<Vec<Product>, DbError> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} \
         FROM products p \
         JOIN UNNEST($1::TEXT[]) WITH ORDINALITY AS wanted(slug, position) USING (slug) \
         ORDER BY wanted.position"
    ))
    .bind(slugs)
    .fetch_all(pool)
    .await?;

    Ok(into_products(rows))
}

/// Returns products whose id is in `ids`, in no particular order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_products_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Product>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(into_products(rows))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Returns every product, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(into_products(rows))
}

/// Returns the `limit` newest products.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_new_products(pool: &PgPool, limit: usize) -> Result<Vec<Product>, DbError> {
    list_newest_excluding(pool, &[], limit).await
}

/// Returns up to `limit` products not in `exclude`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_newest_excluding(
    pool: &PgPool,
    exclude: &[Uuid],
    limit: usize,
) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE NOT (id = ANY($1)) \
         ORDER BY created_at DESC, id \
         LIMIT $2"
    ))
    .bind(exclude)
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(into_products(rows))
}

/// Returns up to `limit` products not in `exclude`, most recently updated first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recently_updated_excluding(
    pool: &PgPool,
    exclude: &[Uuid],
    limit: usize,
) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE NOT (id = ANY($1)) \
         ORDER BY updated_at DESC, id \
         LIMIT $2"
    ))
    .bind(exclude)
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(into_products(rows))
}

/// Returns up to `limit` products of `brand_id` other than `exclude`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brand_products(
    pool: &PgPool,
    brand_id: Uuid,
    exclude: Uuid,
    limit: usize,
) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE brand_id = $1 AND id <> $2 \
         ORDER BY created_at DESC, id \
         LIMIT $3"
    ))
    .bind(brand_id)
    .bind(exclude)
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(into_products(rows))
}

/// Case-insensitive search on product or brand name, newest first.
///
/// A blank query matches every product.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_products(
    pool: &PgPool,
    query: &str,
    limit: usize,
) -> Result<Vec<SearchHit>, DbError> {
    let trimmed = query.trim();
    let pattern = if trimmed.is_empty() {
        None
    } else {
        Some(format!("%{}%", escape_like(trimmed)))
    };

    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR brand_name ILIKE $1) \
         ORDER BY created_at DESC, id \
         LIMIT $2"
    ))
    .bind(pattern)
    .bind(sql_limit(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SearchHit::from(&row.into_product()))
        .collect())
}

/// Escapes `ILIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

const PRODUCT_INSERT: &str = "INSERT INTO products \
         (brand_id, brand_name, slug, name, category, price, currency, image, tag, \
          product_url, description, gallery, sizes, colors, features, created_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)";

fn bind_product<'q>(
    query: QueryScalar<'q, Postgres, Uuid, PgArguments>,
    product: &'q Product,
) -> QueryScalar<'q, Postgres, Uuid, PgArguments> {
    query
        .bind(product.brand_id)
        .bind(&product.brand)
        .bind(&product.slug)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_value)
        .bind(&product.currency)
        .bind(&product.image)
        .bind(product.tag.map(|t| t.as_str()))
        .bind(&product.product_url)
        .bind(&product.description)
        .bind(&product.gallery)
        .bind(&product.sizes)
        .bind(&product.colors)
        .bind(&product.features)
        .bind(product.created_at)
}

/// Inserts a new product, refusing to touch an existing row with the same slug.
///
/// # Errors
///
/// Returns [`DbError::Conflict`] if the slug is already taken, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_product<'e, E>(executor: E, product: &Product) -> Result<Uuid, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("{PRODUCT_INSERT} ON CONFLICT (slug) DO NOTHING RETURNING id");
    let id = bind_product(sqlx::query_scalar(&sql), product)
        .fetch_optional(executor)
        .await?;

    id.ok_or(DbError::Conflict)
}

/// Upserts a product keyed by slug and returns its id.
///
/// The slug itself is never rewritten; conflicting rows have every other
/// field replaced and `updated_at` bumped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_product<'e, E>(executor: E, product: &Product) -> Result<Uuid, DbError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "{PRODUCT_INSERT} \
         ON CONFLICT (slug) DO UPDATE SET \
             brand_id    = EXCLUDED.brand_id, \
             brand_name  = EXCLUDED.brand_name, \
             name        = EXCLUDED.name, \
             category    = EXCLUDED.category, \
             price       = EXCLUDED.price, \
             currency    = EXCLUDED.currency, \
             image       = EXCLUDED.image, \
             tag         = EXCLUDED.tag, \
             product_url = EXCLUDED.product_url, \
             description = EXCLUDED.description, \
             gallery     = EXCLUDED.gallery, \
             sizes       = EXCLUDED.sizes, \
             colors      = EXCLUDED.colors, \
             features    = EXCLUDED.features, \
             updated_at  = NOW() \
         RETURNING id"
    );
    let id = bind_product(sqlx::query_scalar(&sql), product)
        .fetch_one(executor)
        .await?;

    Ok(id)
}
