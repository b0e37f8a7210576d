//! Merchandising content: campaigns and the home-page hero carousel.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSlide {
    /// Database UUID for stored slides, a readable key for configured defaults.
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    pub cta_href: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
struct HeroSlidesFile {
    slides: Vec<HeroSlide>,
}

/// Load the default hero slides shown when no slides are stored.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_hero_slides(path: &Path) -> Result<Vec<HeroSlide>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_hero_slides(&content)
}

fn parse_hero_slides(content: &str) -> Result<Vec<HeroSlide>, ConfigError> {
    let file: HeroSlidesFile =
        serde_yaml::from_str(content).map_err(ConfigError::HeroSlidesParse)?;
    validate_hero_slides(&file.slides)?;
    Ok(file.slides)
}

fn validate_hero_slides(slides: &[HeroSlide]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for slide in slides {
        if slide.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hero slide id must be non-empty".to_string(),
            ));
        }
        if slide.title.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "hero slide '{}' has an empty title",
                slide.id
            )));
        }
        if !slide.cta_href.starts_with('/') && !slide.cta_href.starts_with("http") {
            return Err(ConfigError::Validation(format!(
                "hero slide '{}' has an invalid cta_href '{}'",
                slide.id, slide.cta_href
            )));
        }
        if !seen_ids.insert(slide.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate hero slide id: '{}'",
                slide.id
            )));
        }
    }

    Ok(())
}
