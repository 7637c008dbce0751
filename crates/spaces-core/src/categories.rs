//! Display categories and the source tags that feed each of them.
//!
//! The category table is static: it is either the built-in table or a YAML
//! file with the same shape, never derived from the records themselves.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Category id meaning "no category filter".
pub const ALL_SPACES: &str = "all-spaces";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub id: String,
    pub label: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub source_tags: Vec<String>,
}

impl CategoryConfig {
    #[must_use]
    pub fn is_all_spaces(&self) -> bool {
        self.id == ALL_SPACES
    }

    #[must_use]
    pub fn includes_tag(&self, tag: &str) -> bool {
        self.source_tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryConfig>,
}

/// Ordered lookup table of categories, in navigation-tab order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<CategoryConfig>,
}

const CREATIVE_BACKDROPS: &str = "Discover unique backdrops for Fashion shoots • Product photography • Brand campaigns • Portrait sessions • Lifestyle content • Editorial spreads and more...";

const BUILTIN: &[(&str, &str, &str, &str, &[&str])] = &[
    ("all-spaces", "All Spaces", CREATIVE_BACKDROPS, "all-spaces.svg", &[]),
    (
        "photoshoot",
        "Photoshoot",
        CREATIVE_BACKDROPS,
        "photo-shoot.svg",
        &[
            "best-location-for-photoshoot-near-you.html",
            "best-photoshoot-locations.html",
        ],
    ),
    (
        "video-shoot",
        "Video Shoot",
        "Professional video production spaces • Content creation studios • Commercial filming locations • Interview setups and more...",
        "video-shoot.svg",
        &["video-shoot-locations.html"],
    ),
    (
        "workshops",
        "Workshops",
        "Creative learning spaces • Training rooms • Workshop venues • Educational environments and more...",
        "workshops.svg",
        &["workshops-spaces.html"],
    ),
    (
        "podcast",
        "Podcast",
        "Professional recording studios • Audio production spaces • Interview setups • Podcast-ready environments and more...",
        "podcast.svg",
        &["podcast-spaces.html"],
    ),
    (
        "dance-shoot",
        "Dance Shoot",
        "Dance studios • Movement spaces • Performance venues • Choreography locations and more...",
        "dance-shoot.svg",
        &["best-locations-performance-shoots.html"],
    ),
    (
        "film-shoot",
        "Film Shoot",
        "Cinema-quality locations • Movie sets • Professional filming spaces • Cinematic backdrops and more...",
        "film-shoot.svg",
        &["film-shoot-locations.html"],
    ),
    (
        "events",
        "Events",
        "Event venues • Party spaces • Celebration locations • Corporate event spaces and more...",
        "events.svg",
        &["events-spaces.html"],
    ),
    (
        "exhibitions",
        "Exhibitions",
        "Gallery spaces • Exhibition venues • Display areas • Art showcase locations and more...",
        "exhibitions.svg",
        &["exhibition-spaces.html"],
    ),
];

impl CategoryCatalog {
    /// The nine categories the site ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let categories = BUILTIN
            .iter()
            .map(|(id, label, description, icon, tags)| CategoryConfig {
                id: (*id).to_string(),
                label: (*label).to_string(),
                title: (*label).to_string(),
                description: (*description).to_string(),
                icon: (*icon).to_string(),
                source_tags: tags.iter().map(|t| (*t).to_string()).collect(),
            })
            .collect();
        Self { categories }
    }

    /// Build a catalog from an explicit list, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the list breaks a catalog rule.
    pub fn from_categories(categories: Vec<CategoryConfig>) -> Result<Self, ConfigError> {
        validate_categories(&categories)?;
        Ok(Self { categories })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn is_valid(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn all(&self) -> &[CategoryConfig] {
        &self.categories
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.id.as_str()).collect()
    }
}

/// Load and validate a category table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<CategoryCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CategoriesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CategoriesFileParse)?;

    CategoryCatalog::from_categories(file.categories)
}

fn validate_categories(categories: &[CategoryConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for category in categories {
        if category.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category id must be non-empty".to_string(),
            ));
        }

        if !seen.insert(category.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category id: '{}'",
                category.id
            )));
        }

        if category.is_all_spaces() {
            if !category.source_tags.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "'{ALL_SPACES}' must not list source tags"
                )));
            }
        } else if category.source_tags.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has no source tags",
                category.id
            )));
        }
    }

    if !seen.contains(ALL_SPACES) {
        return Err(ConfigError::Validation(format!(
            "category table must include '{ALL_SPACES}'"
        )));
    }

    Ok(())
}
