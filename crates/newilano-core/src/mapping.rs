//! Raw record to view entity mapping.
//!
//! Raw records are whatever the store or an import file hands us: fields may
//! be missing, numbers may arrive as strings, lists may be absent. Every
//! mapper here is total: malformed optional data is defaulted, never rejected.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::brands::BrandSummary;
use crate::content::{Campaign, HeroSlide};
use crate::price::format_price;
use crate::products::{Product, ProductTag};

pub const DEFAULT_CURRENCY: &str = "TRY";

/// Loosely-typed product record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(alias = "_id")]
    pub id: Option<Uuid>,
    #[serde(alias = "brand")]
    pub brand_id: Option<Uuid>,
    /// Only used when importing catalogs, to link a product to its brand.
    pub brand_slug: Option<String>,
    pub brand_name: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Value>,
    pub currency: Option<Value>,
    pub image: Option<String>,
    pub tag: Option<String>,
    pub product_url: Option<String>,
    pub description: Option<String>,
    pub gallery: Option<Value>,
    pub sizes: Option<Value>,
    pub colors: Option<Value>,
    pub features: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBrand {
    #[serde(alias = "_id")]
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawCampaign {
    #[serde(alias = "_id")]
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawHeroSlide {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub image: Option<String>,
    #[serde(alias = "order")]
    pub sort_order: Option<i32>,
}

/// Map a raw product record to a [`Product`].
///
/// Records without an id map to the nil UUID; the store assigns real ids.
#[must_use]
pub fn map_product(raw: RawProduct) -> Product {
    let price_value = coerce_decimal(raw.price.as_ref());
    let currency = match raw.currency {
        Some(Value::String(code)) => code,
        _ => DEFAULT_CURRENCY.to_string(),
    };
    let created_at = raw.created_at.unwrap_or_else(Utc::now);

    Product {
        id: raw.id.unwrap_or_default(),
        brand_id: raw.brand_id,
        slug: raw.slug.unwrap_or_default(),
        brand: raw.brand_name.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        category: raw.category.unwrap_or_default(),
        price: format_price(price_value, &currency),
        price_value,
        currency,
        image: raw.image.unwrap_or_default(),
        tag: raw.tag.as_deref().and_then(ProductTag::parse),
        product_url: non_blank(raw.product_url),
        description: raw.description.unwrap_or_default(),
        gallery: string_list(raw.gallery),
        sizes: string_list(raw.sizes),
        colors: string_list(raw.colors),
        features: string_list(raw.features),
        created_at,
        updated_at: raw.updated_at.unwrap_or(created_at),
    }
}

#[must_use]
pub fn map_brand(raw: RawBrand) -> BrandSummary {
    BrandSummary {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        slug: raw.slug.unwrap_or_default(),
        logo: non_blank(raw.logo),
        description: raw.description,
        categories: string_list(raw.categories),
    }
}

#[must_use]
pub fn map_campaign(raw: RawCampaign) -> Campaign {
    Campaign {
        id: raw.id.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        image: raw.image.unwrap_or_default(),
        cta_label: raw.cta_label,
        cta_href: non_blank(raw.cta_href),
        created_at: raw.created_at,
    }
}

#[must_use]
pub fn map_hero_slide(raw: RawHeroSlide) -> HeroSlide {
    HeroSlide {
        id: raw.id.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        subtitle: raw.subtitle.unwrap_or_default(),
        cta_label: raw.cta_label.unwrap_or_default(),
        cta_href: raw.cta_href.unwrap_or_default(),
        image: raw.image.unwrap_or_default(),
    }
}

/// Numbers pass through, numeric strings are parsed, anything else is zero.
fn coerce_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(s: &str) -> Decimal {
    if s.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

/// Keeps the string elements of an array value; anything else is empty.
fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "mapping_test.rs"]
mod tests;
