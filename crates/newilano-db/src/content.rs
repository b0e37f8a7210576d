//! Database operations for merchandising content: `campaigns` and `hero_slides`.

use chrono::{DateTime, Utc};
use newilano_core::{
    map_campaign, map_hero_slide, Campaign, HeroSlide, RawCampaign, RawHeroSlide,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{sql_limit, DbError};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CampaignRow {
    #[must_use]
    pub fn into_campaign(self) -> Campaign {
        map_campaign(RawCampaign {
            id: Some(self.id),
            title: Some(self.title),
            description: Some(self.description),
            image: Some(self.image),
            cta_label: self.cta_label,
            cta_href: self.cta_href,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HeroSlideRow {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    pub cta_href: String,
    pub image: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl HeroSlideRow {
    #[must_use]
    pub fn into_slide(self) -> HeroSlide {
        map_hero_slide(RawHeroSlide {
            id: Some(self.id.to_string()),
            title: Some(self.title),
            subtitle: Some(self.subtitle),
            cta_label: Some(self.cta_label),
            cta_href: Some(self.cta_href),
            image: Some(self.image),
            sort_order: Some(self.sort_order),
        })
    }
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

/// Returns campaigns newest first; undated campaigns sort last.
///
/// `None` returns every campaign.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_campaigns(pool: &PgPool, limit: Option<usize>) -> Result<Vec<Campaign>, DbError> {
    let rows = sqlx::query_as::<_, CampaignRow>(
        "SELECT id, title, description, image, cta_label, cta_href, created_at \
         FROM campaigns \
         ORDER BY created_at DESC NULLS LAST, id \
         LIMIT $1",
    )
    .bind(limit.map(sql_limit))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CampaignRow::into_campaign).collect())
}

/// Inserts a campaign, or replaces it when `campaign.id` already exists.
///
/// A nil id always inserts a new row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the write fails.
pub async fn upsert_campaign<'e, E>(executor: E, campaign: &Campaign) -> Result<Uuid, DbError>
where
    E: PgExecutor<'e>,
{
    let id = (!campaign.id.is_nil()).then_some(campaign.id);
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO campaigns (id, title, description, image, cta_label, cta_href, created_at) \
         VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5, $6, COALESCE($7, NOW())) \
         ON CONFLICT (id) DO UPDATE SET \
             title       = EXCLUDED.title, \
             description = EXCLUDED.description, \
             image       = EXCLUDED.image, \
             cta_label   = EXCLUDED.cta_label, \
             cta_href    = EXCLUDED.cta_href \
         RETURNING id",
    )
    .bind(id)
    .bind(&campaign.title)
    .bind(&campaign.description)
    .bind(&campaign.image)
    .bind(&campaign.cta_label)
    .bind(&campaign.cta_href)
    .bind(campaign.created_at)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

// ---------------------------------------------------------------------------
// Hero slides
// ---------------------------------------------------------------------------

/// Returns stored hero slides by `sort_order`, newest first within an order.
///
/// When none are stored, `defaults` is returned instead (pass an empty slice
/// to disable the fallback).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_hero_slides(
    pool: &PgPool,
    defaults: &[HeroSlide],
) -> Result<Vec<HeroSlide>, DbError> {
    let rows = sqlx::query_as::<_, HeroSlideRow>(
        "SELECT id, title, subtitle, cta_label, cta_href, image, sort_order, created_at \
         FROM hero_slides \
         ORDER BY sort_order ASC, created_at DESC, id",
    )
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(defaults.to_vec());
    }
    Ok(rows.into_iter().map(HeroSlideRow::into_slide).collect())
}

/// Inserts a hero slide at `sort_order` and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn upsert_hero_slide<'e, E>(
    executor: E,
    slide: &HeroSlide,
    sort_order: i32,
) -> Result<Uuid, DbError>
where
    E: PgExecutor<'e>,
{
    // Stored slides are keyed by UUID; readable ids from config files get a fresh one.
    let id = slide.id.parse::<Uuid>().ok().filter(|id| !id.is_nil());
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO hero_slides (id, title, subtitle, cta_label, cta_href, image, sort_order) \
         VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (id) DO UPDATE SET \
             title      = EXCLUDED.title, \
             subtitle   = EXCLUDED.subtitle, \
             cta_label  = EXCLUDED.cta_label, \
             cta_href   = EXCLUDED.cta_href, \
             image      = EXCLUDED.image, \
             sort_order = EXCLUDED.sort_order \
         RETURNING id",
    )
    .bind(id)
    .bind(&slide.title)
    .bind(&slide.subtitle)
    .bind(&slide.cta_label)
    .bind(&slide.cta_href)
    .bind(&slide.image)
    .bind(sort_order)
    .fetch_one(executor)
    .await?;

    Ok(id)
}
