//! Derived product rankings: most-favorited, trending, and recommendations.
//!
//! Each ranking returns at most `limit` distinct products. When the primary
//! signal is too sparse to fill `limit`, the list is backfilled from a
//! recency ordering, so callers receive `min(limit, catalog size)` products.

mod ordered_set;
pub mod signal;

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::products::Product;

pub use ordered_set::OrderedSet;

/// Hours covered by the trending window unless configured otherwise.
pub const DEFAULT_TRENDING_WINDOW_HOURS: i64 = 12;

/// Extra most-favorited candidates fetched when backfilling recommendations,
/// absorbing the subject product and already-selected entries.
const RECOMMENDATION_BACKFILL_SLACK: usize = 4;

/// Read-only catalog queries the ranking engine is built on.
pub trait CatalogReader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Favorite slug lists of every user with at least one favorite.
    fn favorite_sets(&self) -> impl Future<Output = Result<Vec<Vec<String>>, Self::Error>> + Send;

    /// Product ids of every favorite event recorded at or after `since`.
    fn favorite_event_products_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send;

    /// Products whose slug is in `slugs`, in any order. Unknown slugs are skipped.
    fn products_by_slugs(
        &self,
        slugs: &[String],
    ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;

    /// Products whose id is in `ids`, in any order. Unknown ids are skipped.
    fn products_by_ids(
        &self,
        ids: &[Uuid],
    ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;

    fn product_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send;

    /// Up to `limit` products not in `exclude`, newest `created_at` first.
    fn newest_products(
        &self,
        exclude: &[Uuid],
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;

    /// Up to `limit` products not in `exclude`, latest `updated_at` first.
    fn recently_updated_products(
        &self,
        exclude: &[Uuid],
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;

    /// Up to `limit` products of `brand_id` other than `exclude`, newest first.
    fn brand_products(
        &self,
        brand_id: Uuid,
        exclude: Uuid,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;
}

/// Computes ranked product lists over a [`CatalogReader`].
///
/// Reader errors are returned unchanged; a failed query never yields a
/// partial list.
#[derive(Debug, Clone)]
pub struct RankingEngine<S> {
    reader: S,
    trending_window: Duration,
}

impl<S> RankingEngine<S>
where
    S: CatalogReader + Sync,
{
    #[must_use]
    pub fn new(reader: S) -> Self {
        Self {
            reader,
            trending_window: Duration::hours(DEFAULT_TRENDING_WINDOW_HOURS),
        }
    }

    #[must_use]
    pub fn with_trending_window(mut self, window: Duration) -> Self {
        self.trending_window = window;
        self
    }

    /// Products appearing in the most user favorite lists.
    ///
    /// Backfilled with the newest products when fewer than `limit` favorites
    /// resolve to products.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if any query fails.
    pub async fn most_favorited_products(&self, limit: usize) -> Result<Vec<Product>, S::Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let favorite_sets = self.reader.favorite_sets().await?;
        let counts = signal::count_signals(favorite_sets.into_iter().flatten());
        let candidates = signal::top_candidates(counts, limit.saturating_mul(2));

        let slugs: Vec<String> = candidates.iter().map(|(slug, _)| slug.clone()).collect();
        let products = if slugs.is_empty() {
            Vec::new()
        } else {
            self.reader.products_by_slugs(&slugs).await?
        };
        let ranked = signal::order_resolved(&candidates, products, |p| p.slug.clone());

        let mut selected = OrderedSet::new();
        selected.fill(ranked, limit, |p: &Product| p.id);
        let from_signal = selected.len();

        if selected.len() < limit {
            let exclude: Vec<Uuid> = selected.keys().copied().collect();
            let newest = self
                .reader
                .newest_products(&exclude, limit - selected.len())
                .await?;
            selected.fill(newest, limit, |p: &Product| p.id);
        }

        tracing::debug!(
            candidates = candidates.len(),
            from_signal,
            backfilled = selected.len() - from_signal,
            "most-favorited ranking computed"
        );

        Ok(selected.into_values())
    }

    /// Products favorited most often within the trending window ending now.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if any query fails.
    pub async fn trending_products(&self, limit: usize) -> Result<Vec<Product>, S::Error> {
        self.trending_products_at(limit, Utc::now()).await
    }

    /// Products favorited most often within the trending window ending at `now`.
    ///
    /// Backfilled with the most recently updated products when the window
    /// holds fewer than `limit` distinct favorited products.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if any query fails.
    pub async fn trending_products_at(
        &self,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Product>, S::Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let since = now - self.trending_window;
        let events = self.reader.favorite_event_products_since(since).await?;
        let counts = signal::count_signals(events);
        let candidates = signal::top_candidates(counts, limit.saturating_mul(2));

        let ids: Vec<Uuid> = candidates.iter().map(|(id, _)| *id).collect();
        let products = if ids.is_empty() {
            Vec::new()
        } else {
            self.reader.products_by_ids(&ids).await?
        };
        let ranked = signal::order_resolved(&candidates, products, |p| p.id);

        let mut selected = OrderedSet::new();
        selected.fill(ranked, limit, |p: &Product| p.id);
        let from_signal = selected.len();

        if selected.len() < limit {
            let exclude: Vec<Uuid> = selected.keys().copied().collect();
            let updated = self
                .reader
                .recently_updated_products(&exclude, limit - selected.len())
                .await?;
            selected.fill(updated, limit, |p: &Product| p.id);
        }

        tracing::debug!(
            %since,
            candidates = candidates.len(),
            from_signal,
            backfilled = selected.len() - from_signal,
            "trending ranking computed"
        );

        Ok(selected.into_values())
    }

    /// Products to show next to `slug`: same-brand products first, then
    /// most-favorited products. Never contains the subject product.
    ///
    /// Returns an empty list when `slug` does not exist.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if any query fails.
    pub async fn recommendations(&self, slug: &str, limit: usize) -> Result<Vec<Product>, S::Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let Some(subject) = self.reader.product_by_slug(slug).await? else {
            tracing::debug!(slug, "recommendations requested for unknown product");
            return Ok(Vec::new());
        };

        let same_brand = match subject.brand_id {
            Some(brand_id) => {
                self.reader
                    .brand_products(brand_id, subject.id, limit)
                    .await?
            }
            None => Vec::new(),
        };

        let mut selected = OrderedSet::new();
        selected.fill(
            same_brand.into_iter().filter(|p| p.id != subject.id),
            limit,
            |p: &Product| p.id,
        );
        let from_brand = selected.len();

        if selected.len() < limit {
            let popular = self
                .most_favorited_products(limit.saturating_add(RECOMMENDATION_BACKFILL_SLACK))
                .await?;
            selected.fill(
                popular
                    .into_iter()
                    .filter(|p| p.id != subject.id && p.slug != subject.slug),
                limit,
                |p: &Product| p.id,
            );
        }

        tracing::debug!(
            slug,
            from_brand,
            backfilled = selected.len() - from_brand,
            "recommendations computed"
        );

        Ok(selected.into_values())
    }
}
