pub mod app_config;
pub mod brands;
pub mod config;
pub mod content;
pub mod drafts;
pub mod filter;
pub mod mapping;
pub mod price;
pub mod products;
pub mod ranking;
pub mod seed;

pub use app_config::{AppConfig, Environment};
pub use brands::BrandSummary;
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{load_hero_slides, Campaign, HeroSlide};
pub use drafts::{normalize_product_url, DraftError, HeroSlideDraft, ProductDraft};
pub use filter::{facet_values, filter_catalog, CatalogFilter, Facets};
pub use mapping::{
    map_brand, map_campaign, map_hero_slide, map_product, RawBrand, RawCampaign, RawHeroSlide,
    RawProduct,
};
pub use price::format_price;
pub use products::{Product, ProductTag, SearchHit};
pub use ranking::{CatalogReader, OrderedSet, RankingEngine};
pub use seed::{CatalogDocument, RawUser};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse hero slides file: {0}")]
    HeroSlidesParse(#[source] serde_yaml::Error),
    #[error("failed to parse catalog document: {0}")]
    CatalogParse(#[source] serde_json::Error),
    #[error("validation error: {0}")]
    Validation(String),
}
