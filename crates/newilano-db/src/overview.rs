//! Catalog totals for the admin dashboard.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Store-wide counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CatalogTotals {
    pub products: i64,
    /// Distinct brands referenced by products, by id or, when unlinked, by name.
    pub brands: i64,
    pub categories: i64,
    pub campaigns: i64,
    /// Stored slides only; configured defaults are not counted.
    pub hero_slides: i64,
}

/// Number of products linked to one brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BrandProductCount {
    pub brand_id: Uuid,
    pub slug: String,
    pub name: String,
    pub product_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOverview {
    pub totals: CatalogTotals,
    /// Every brand, including those without products, ordered by name.
    pub brands: Vec<BrandProductCount>,
}

/// Returns store-wide totals.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn catalog_totals(pool: &PgPool) -> Result<CatalogTotals, DbError> {
    let totals = sqlx::query_as::<_, CatalogTotals>(
        "SELECT \
             (SELECT COUNT(*) FROM products) AS products, \
             (SELECT COUNT(DISTINCT COALESCE(brand_id::TEXT, brand_name)) FROM products) AS brands, \
             (SELECT COUNT(DISTINCT category) FROM products) AS categories, \
             (SELECT COUNT(*) FROM campaigns) AS campaigns, \
             (SELECT COUNT(*) FROM hero_slides) AS hero_slides",
    )
    .fetch_one(pool)
    .await?;

    Ok(totals)
}

/// Returns the product count of every brand.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn brand_product_counts(pool: &PgPool) -> Result<Vec<BrandProductCount>, DbError> {
    let rows = sqlx::query_as::<_, BrandProductCount>(
        "SELECT b.id AS brand_id, b.slug, b.name, \
                COALESCE(counts.product_count, 0) AS product_count \
         FROM brands b \
         LEFT JOIN ( \
             SELECT brand_id, COUNT(*) AS product_count \
             FROM products \
             WHERE brand_id IS NOT NULL \
             GROUP BY brand_id \
         ) counts ON counts.brand_id = b.id \
         ORDER BY b.name, b.slug",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Totals plus per-brand product counts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn catalog_overview(pool: &PgPool) -> Result<CatalogOverview, DbError> {
    let totals = catalog_totals(pool).await?;
    let brands = brand_product_counts(pool).await?;
    Ok(CatalogOverview { totals, brands })
}
