//! Catalog import document used to seed a store.

use std::path::Path;

use serde::Deserialize;

use crate::mapping::{RawBrand, RawCampaign, RawHeroSlide, RawProduct};
use crate::ConfigError;

/// A user and their favorite product slugs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawUser {
    pub email: String,
    pub favorites: Vec<String>,
}

/// Everything needed to populate an empty storefront.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogDocument {
    pub brands: Vec<RawBrand>,
    pub products: Vec<RawProduct>,
    pub campaigns: Vec<RawCampaign>,
    pub hero_slides: Vec<RawHeroSlide>,
    pub users: Vec<RawUser>,
}

impl CatalogDocument {
    /// Read a catalog document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is not a valid document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse a catalog document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CatalogParse` on malformed JSON.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::CatalogParse)
    }
}
