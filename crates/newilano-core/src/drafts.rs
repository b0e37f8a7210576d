//! Admin-submitted product and hero slide drafts.
//!
//! Drafts arrive as loose JSON from the admin forms. Validation rejects what
//! the storefront cannot render; everything that passes is converted through
//! the regular entity mappers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::brands::slugify;
use crate::content::HeroSlide;
use crate::mapping::{map_hero_slide, map_product, RawHeroSlide, RawProduct};
use crate::products::Product;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("price must be a positive amount")]
    InvalidPrice,
    #[error("name does not produce a usable slug")]
    InvalidSlug,
    #[error("sort order must not be negative")]
    InvalidOrder,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    pub brand_id: Option<Uuid>,
    pub category: String,
    /// Number or numeric string; a decimal comma is accepted.
    pub price: Value,
    pub currency: Option<String>,
    pub image: String,
    pub description: String,
    pub gallery: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub product_url: Option<String>,
    pub tag: Option<String>,
}

impl ProductDraft {
    /// Slug a new product created from this draft will receive.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::InvalidSlug`] if the name has no slug-able characters.
    pub fn slug(&self) -> Result<String, DraftError> {
        let slug = slugify(&self.name);
        if slug.is_empty() {
            return Err(DraftError::InvalidSlug);
        }
        Ok(slug)
    }

    /// Validate the draft and build the product stored under `slug`.
    ///
    /// `brand_name` is the display name of the draft's brand as resolved by
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] naming the first field that fails validation.
    pub fn into_product(
        self,
        slug: String,
        brand_name: String,
        created_at: DateTime<Utc>,
    ) -> Result<Product, DraftError> {
        let name = required(self.name, "name")?;
        let category = required(self.category, "category")?;
        let description = required(self.description, "description")?;
        let image = required(self.image, "image")?;
        let brand_id = self.brand_id.ok_or(DraftError::MissingField("brand_id"))?;

        let price = match self.price {
            Value::String(s) => Value::String(s.trim().replace(',', ".")),
            other => other,
        };

        let product = map_product(RawProduct {
            brand_id: Some(brand_id),
            brand_name: Some(brand_name),
            slug: Some(slug),
            name: Some(name),
            category: Some(category),
            price: Some(price),
            currency: self.currency.map(Value::String),
            image: Some(image),
            tag: self.tag,
            product_url: self.product_url.as_deref().and_then(normalize_product_url),
            description: Some(description),
            gallery: Some(clean_list(self.gallery).into()),
            sizes: Some(clean_list(self.sizes).into()),
            colors: Some(clean_list(self.colors).into()),
            features: Some(clean_list(self.features).into()),
            created_at: Some(created_at),
            updated_at: Some(Utc::now()),
            ..RawProduct::default()
        });

        if product.price_value <= Decimal::ZERO {
            return Err(DraftError::InvalidPrice);
        }
        Ok(product)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeroSlideDraft {
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    pub cta_href: String,
    pub image: String,
    pub order: i32,
}

impl HeroSlideDraft {
    /// Validate the draft, returning the slide and its sort order.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] naming the first field that fails validation.
    pub fn into_slide(self) -> Result<(HeroSlide, i32), DraftError> {
        if self.order < 0 {
            return Err(DraftError::InvalidOrder);
        }
        let slide = map_hero_slide(RawHeroSlide {
            id: None,
            title: Some(required(self.title, "title")?),
            subtitle: Some(required(self.subtitle, "subtitle")?),
            cta_label: Some(required(self.cta_label, "cta_label")?),
            cta_href: Some(required(self.cta_href, "cta_href")?),
            image: Some(required(self.image, "image")?),
            sort_order: Some(self.order),
        });
        Ok((slide, self.order))
    }
}

/// Trims a product link; bare hosts get an `https://` scheme, blanks become `None`.
#[must_use]
pub fn normalize_product_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

fn required(value: String, field: &'static str) -> Result<String, DraftError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DraftError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
