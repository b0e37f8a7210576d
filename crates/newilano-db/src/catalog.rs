//! Postgres-backed [`CatalogReader`] for the ranking engine.

use chrono::{DateTime, Utc};
use newilano_core::{CatalogReader, Product};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{favorites, products, DbError};

#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CatalogReader for PgCatalog {
    type Error = DbError;

    async fn favorite_sets(&self) -> Result<Vec<Vec<String>>, DbError> {
        favorites::list_favorite_sets(&self.pool).await
    }

    async fn favorite_event_products_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, DbError> {
        favorites::favorite_event_products_since(&self.pool, since).await
    }

    async fn products_by_slugs(&self, slugs: &[String]) -> Result<Vec<Product>, DbError> {
        products::get_products_by_slugs(&self.pool, slugs).await
    }

    async fn products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DbError> {
        products::get_products_by_ids(&self.pool, ids).await
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, DbError> {
        products::get_product_by_slug(&self.pool, slug).await
    }

    async fn newest_products(
        &self,
        exclude: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Product>, DbError> {
        products::list_newest_excluding(&self.pool, exclude, limit).await
    }

    async fn recently_updated_products(
        &self,
        exclude: &[Uuid],
        limit: usize,
    ) -> Result<Vec<Product>, DbError> {
        products::list_recently_updated_excluding(&self.pool, exclude, limit).await
    }

    async fn brand_products(
        &self,
        brand_id: Uuid,
        exclude: Uuid,
        limit: usize,
    ) -> Result<Vec<Product>, DbError> {
        products::list_brand_products(&self.pool, brand_id, exclude, limit).await
    }
}
