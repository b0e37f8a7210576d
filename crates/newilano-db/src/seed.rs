use std::collections::HashMap;

use newilano_core::brands::slugify;
use newilano_core::{
    map_brand, map_campaign, map_hero_slide, map_product, CatalogDocument, RawProduct,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::brands::upsert_brand;
use crate::content::{upsert_campaign, upsert_hero_slide};
use crate::favorites::upsert_user;
use crate::products::upsert_product;
use crate::DbError;

/// Counts of records written by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedSummary {
    pub brands: usize,
    pub products: usize,
    pub campaigns: usize,
    pub hero_slides: usize,
    pub users: usize,
    /// Records dropped for lacking both a slug and a name (or an email).
    pub skipped: usize,
}

/// Brand ids written so far, addressable the ways a product may refer to them.
#[derive(Debug, Default)]
struct BrandIndex {
    by_slug: HashMap<String, (Uuid, String)>,
    by_name: HashMap<String, (Uuid, String)>,
    by_document_id: HashMap<Uuid, (Uuid, String)>,
}

impl BrandIndex {
    fn insert(&mut self, document_id: Option<Uuid>, slug: &str, name: &str, id: Uuid) {
        let entry = (id, name.to_string());
        self.by_slug.insert(slug.to_string(), entry.clone());
        self.by_name.insert(name.to_lowercase(), entry.clone());
        if let Some(document_id) = document_id {
            self.by_document_id.insert(document_id, entry);
        }
    }

    /// Document id first, then brand slug, then brand name.
    fn resolve(&self, raw: &RawProduct) -> Option<&(Uuid, String)> {
        raw.brand_id
            .and_then(|id| self.by_document_id.get(&id))
            .or_else(|| raw.brand_slug.as_ref().and_then(|s| self.by_slug.get(s)))
            .or_else(|| {
                raw.brand_name
                    .as_ref()
                    .and_then(|n| self.by_name.get(&n.to_lowercase()))
            })
    }
}

/// Upsert every record of a catalog document.
///
/// Brands and products are upserted by slug (missing slugs are derived from
/// the name). Campaigns and hero slides are replaced wholesale so reseeding
/// does not duplicate them. Users are upserted by email. All writes run in a
/// single transaction; any failure rolls the whole import back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, doc: &CatalogDocument) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();
    let mut brand_index = BrandIndex::default();

    for raw in &doc.brands {
        let document_id = raw.id;
        let mut brand = map_brand(raw.clone());
        if brand.slug.is_empty() {
            brand.slug = slugify(&brand.name);
        }
        if brand.slug.is_empty() {
            tracing::warn!("skipping brand without name or slug");
            summary.skipped += 1;
            continue;
        }
        let id = upsert_brand(&mut *tx, &brand).await?;
        brand_index.insert(document_id, &brand.slug, &brand.name, id);
        summary.brands += 1;
    }

    for raw in &doc.products {
        let resolved = brand_index.resolve(raw).cloned();
        let mut product = map_product(raw.clone());
        if product.slug.is_empty() {
            product.slug = slugify(&product.name);
        }
        if product.slug.is_empty() {
            tracing::warn!("skipping product without name or slug");
            summary.skipped += 1;
            continue;
        }
        match resolved {
            Some((brand_id, brand_name)) => {
                product.brand_id = Some(brand_id);
                if product.brand.is_empty() {
                    product.brand = brand_name;
                }
            }
            None => {
                if product.brand_id.is_some() || raw.brand_slug.is_some() {
                    tracing::warn!(slug = %product.slug, "product brand not found in document");
                }
                product.brand_id = None;
            }
        }
        upsert_product(&mut *tx, &product).await?;
        summary.products += 1;
    }

    sqlx::query("DELETE FROM campaigns").execute(&mut *tx).await?;
    for raw in &doc.campaigns {
        let mut campaign = map_campaign(raw.clone());
        campaign.id = Uuid::nil();
        upsert_campaign(&mut *tx, &campaign).await?;
        summary.campaigns += 1;
    }

    sqlx::query("DELETE FROM hero_slides").execute(&mut *tx).await?;
    for (position, raw) in doc.hero_slides.iter().enumerate() {
        let sort_order = raw
            .sort_order
            .unwrap_or_else(|| i32::try_from(position).unwrap_or(i32::MAX));
        let mut slide = map_hero_slide(raw.clone());
        slide.id.clear();
        upsert_hero_slide(&mut *tx, &slide, sort_order).await?;
        summary.hero_slides += 1;
    }

    for user in &doc.users {
        let email = user.email.trim();
        if email.is_empty() {
            summary.skipped += 1;
            continue;
        }
        upsert_user(&mut *tx, email, &user.favorites).await?;
        summary.users += 1;
    }

    tx.commit().await?;

    tracing::info!(
        brands = summary.brands,
        products = summary.products,
        campaigns = summary.campaigns,
        hero_slides = summary.hero_slides,
        users = summary.users,
        skipped = summary.skipped,
        "catalog seeded"
    );
    Ok(summary)
}
