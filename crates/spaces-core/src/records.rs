//! Location records as stored in the static data file.
//!
//! Records are loaded once at startup and never mutated afterwards. The
//! `country`/`state`/`city` triple is optional: records missing any part are
//! still listed when no location filter is active, but they never appear in
//! the hierarchy or in location-filtered results.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::DataError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub period: String,
    #[serde(default)]
    pub full_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: Price,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub details_link: String,
    /// Category tag: the listing page this record was collected from.
    pub source_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// A complete country/state/city triple borrowed from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Place<'a> {
    pub country: &'a str,
    pub state: &'a str,
    pub city: &'a str,
}

impl LocationRecord {
    /// Returns the record's place, or `None` when any part is missing or blank.
    #[must_use]
    pub fn place(&self) -> Option<Place<'_>> {
        Some(Place {
            country: non_blank(self.country.as_ref())?,
            state: non_blank(self.state.as_ref())?,
            city: non_blank(self.city.as_ref())?,
        })
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

/// On-disk shape of the locations data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationsFile {
    pub locations: Vec<LocationRecord>,
}

/// Parse a locations data file from a JSON string.
///
/// # Errors
///
/// Returns [`DataError::Parse`] if the JSON does not match [`LocationsFile`].
pub fn parse_locations(json: &str) -> Result<LocationsFile, DataError> {
    serde_json::from_str(json).map_err(|e| DataError::Parse {
        context: "inline json".to_string(),
        source: e,
    })
}

/// Load the locations data file from disk.
///
/// # Errors
///
/// Returns [`DataError::Io`] if the file cannot be read, or
/// [`DataError::Parse`] if it is not a valid locations file.
pub fn load_locations(path: &Path) -> Result<LocationsFile, DataError> {
    let content = std::fs::read_to_string(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: LocationsFile = serde_json::from_str(&content).map_err(|e| DataError::Parse {
        context: path.display().to_string(),
        source: e,
    })?;

    let incomplete = file
        .locations
        .iter()
        .filter(|r| r.place().is_none())
        .count();
    if incomplete > 0 {
        tracing::warn!(
            path = %path.display(),
            incomplete,
            "records without a complete country/state/city are excluded from location filtering"
        );
    }
    tracing::info!(path = %path.display(), records = file.locations.len(), "loaded locations");

    Ok(file)
}
