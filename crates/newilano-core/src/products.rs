use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Merchandising marker shown on product cards. Not used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductTag {
    Hype,
    /// Featured ("öne çıkan").
    OneCikan,
    /// New arrival ("yeni").
    Yeni,
}

impl ProductTag {
    /// Parses the stored tag code. Unknown codes yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "HYPE" => Some(Self::Hype),
            "ONE_CIKAN" => Some(Self::OneCikan),
            "YENI" => Some(Self::Yeni),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hype => "HYPE",
            Self::OneCikan => "ONE_CIKAN",
            Self::Yeni => "YENI",
        }
    }
}

impl std::fmt::Display for ProductTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product as served to the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub brand_id: Option<Uuid>,
    /// URL key. Unique across the catalog and never reassigned.
    pub slug: String,
    /// Brand display name, denormalized onto the product.
    pub brand: String,
    pub name: String,
    pub category: String,
    /// Display price, e.g. `"5.499 TL"`.
    pub price: String,
    pub price_value: Decimal,
    pub currency: String,
    pub image: String,
    pub tag: Option<ProductTag>,
    pub product_url: Option<String>,
    pub description: String,
    pub gallery: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Text matched by free-text catalog search: brand then name.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }
}

/// Compact product projection returned by the search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub brand: String,
    pub price: String,
}

impl From<&Product> for SearchHit {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price.clone(),
        }
    }
}
