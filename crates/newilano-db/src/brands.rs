//! Database operations for the `brands` table.

use chrono::{DateTime, Utc};
use newilano_core::{map_brand, BrandSummary, RawBrand};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BrandRow {
    #[must_use]
    pub fn into_summary(self) -> BrandSummary {
        map_brand(RawBrand {
            id: Some(self.id),
            name: Some(self.name),
            slug: Some(self.slug),
            logo: self.logo,
            description: self.description,
            categories: Some(self.categories.into()),
        })
    }
}

const BRAND_COLUMNS: &str =
    "id, name, slug, logo, description, categories, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all brands, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brands(pool: &PgPool) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single brand by slug, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE slug = $1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns a single brand by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_by_id(pool: &PgPool, id: Uuid) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts or updates a brand keyed by slug and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_brand<'e, E>(executor: E, brand: &BrandSummary) -> Result<Uuid, DbError>
where
    E: PgExecutor<'e>,
{
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO brands (name, slug, logo, description, categories) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (slug) DO UPDATE SET \
             name        = EXCLUDED.name, \
             logo        = EXCLUDED.logo, \
             description = EXCLUDED.description, \
             categories  = EXCLUDED.categories, \
             updated_at  = NOW() \
         RETURNING id",
    )
    .bind(&brand.name)
    .bind(&brand.slug)
    .bind(&brand.logo)
    .bind(&brand.description)
    .bind(&brand.categories)
    .fetch_one(executor)
    .await?;

    Ok(id)
}
