//! Database operations for user favorites and the favorite event log.

use chrono::{DateTime, Utc};
use newilano_core::Product;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::products::get_products_by_slugs;
use crate::DbError;

/// Outcome of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
    Unchanged,
}

impl FavoriteChange {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Unchanged => "unchanged",
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking inputs
// ---------------------------------------------------------------------------

/// Returns the favorite slug lists of every user with at least one favorite.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_favorite_sets(pool: &PgPool) -> Result<Vec<Vec<String>>, DbError> {
    let sets = sqlx::query_scalar::<_, Vec<String>>(
        "SELECT favorites FROM users WHERE cardinality(favorites) > 0",
    )
    .fetch_all(pool)
    .await?;

    Ok(sets)
}

/// Returns the product id of every favorite event at or after `since`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn favorite_event_products_since(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<Uuid>, DbError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT product_id FROM favorite_events WHERE created_at >= $1",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Inserts a user by email (or replaces the favorites of an existing one).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_user<'e, E>(
    executor: E,
    email: &str,
    favorites: &[String],
) -> Result<Uuid, DbError>
where
    E: PgExecutor<'e>,
{
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, favorites) \
         VALUES ($1, ARRAY(SELECT DISTINCT unnest($2::TEXT[]))) \
         ON CONFLICT (email) DO UPDATE SET \
             favorites  = EXCLUDED.favorites, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(email)
    .bind(favorites)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Resolves a user's favorite slugs to products, skipping stale slugs.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the user does not exist, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn list_user_favorites(pool: &PgPool, user_id: Uuid) -> Result<Vec<Product>, DbError> {
    let slugs = sqlx::query_scalar::<_, Vec<String>>("SELECT favorites FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;

    get_products_by_slugs(pool, &slugs).await
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Adds `slug` to the user's favorites.
///
/// Idempotent: a favorite event is recorded only when the slug was not
/// already present.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the user or product does not exist, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn add_favorite(
    pool: &PgPool,
    user_id: Uuid,
    slug: &str,
) -> Result<FavoriteChange, DbError> {
    let mut tx = pool.begin().await?;

    let product_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM products WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound)?;

    // Row lock serializes concurrent toggles for the same user.
    let current = sqlx::query_scalar::<_, Vec<String>>(
        "SELECT favorites FROM users WHERE id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(DbError::NotFound)?;

    if current.iter().any(|s| s == slug) {
        tx.commit().await?;
        return Ok(FavoriteChange::Unchanged);
    }

    sqlx::query(
        "UPDATE users SET favorites = array_append(favorites, $2), updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(user_id)
    .bind(slug)
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO favorite_events (user_id, product_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!(%user_id, slug, "favorite added");
    Ok(FavoriteChange::Added)
}

/// Removes `slug` from the user's favorites. No event is recorded.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the user does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn remove_favorite(
    pool: &PgPool,
    user_id: Uuid,
    slug: &str,
) -> Result<FavoriteChange, DbError> {
    let removed: Option<bool> = sqlx::query_scalar(
        "WITH previous AS ( \
             SELECT id, $2 = ANY(favorites) AS had FROM users WHERE id = $1 FOR UPDATE \
         ) \
         UPDATE users u SET \
             favorites  = array_remove(u.favorites, $2), \
             updated_at = CASE WHEN previous.had THEN NOW() ELSE u.updated_at END \
         FROM previous WHERE u.id = previous.id \
         RETURNING previous.had",
    )
    .bind(user_id)
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    match removed {
        None => Err(DbError::NotFound),
        Some(true) => Ok(FavoriteChange::Removed),
        Some(false) => Ok(FavoriteChange::Unchanged),
    }
}
