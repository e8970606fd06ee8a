//! Catalog configuration loading from config.toml
//!
//! The catalog lists the dimension rows (faculties with their research groups, seedbed
//! programs and budget line items) an installation starts with. It is used to seed the
//! database on first run or when some of those rows are missing.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Faculties to seed, each with its research groups
    #[serde(default)]
    pub faculties: Vec<FacultyConfig>,
    /// Seedbed program names
    #[serde(default)]
    pub seedbeds: Vec<String>,
    /// Budget line item names
    #[serde(default)]
    pub line_items: Vec<String>,
}

/// Configuration for a single faculty
#[derive(Debug, Deserialize, Clone)]
pub struct FacultyConfig {
    /// Name of the faculty
    pub name: String,
    /// Names of the research groups attached to it
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Loads the catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}
