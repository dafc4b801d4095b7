//! Run configuration: where to scrape, which products, which columns, and
//! where to write them.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `AMIS_*` environment variables, then explicit overrides from the caller.
//! The finished [`ScrapeConfig`] is not modified once a crawl starts.

use std::path::{Path, PathBuf};

use amis_api::types::{Column, ProductId};
use amis_api::DEFAULT_BASE_URL;
use serde::Deserialize;

use crate::error::AmisError;
use crate::validation;

/// Default output file, relative to the working directory.
pub const DEFAULT_CSV_FILE_NAME: &str = "commodity_data.csv";

pub const ENV_BASE_URL: &str = "AMIS_BASE_URL";
pub const ENV_PRODUCT_IDS: &str = "AMIS_PRODUCT_IDS";
pub const ENV_COLUMN_NAMES: &str = "AMIS_COLUMN_NAMES";
pub const ENV_CSV_FILE_NAME: &str = "AMIS_CSV_FILE_NAME";

/// Settings for one scrape run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Listing URL without query string or offset segment.
    pub base_url: String,
    /// Products to crawl, in order.
    pub product_ids: Vec<ProductId>,
    /// Output columns, in order. Also the CSV header.
    pub column_names: Vec<String>,
    /// Output CSV path.
    pub csv_file_name: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            product_ids: vec![1],
            column_names: Column::default_names(),
            csv_file_name: PathBuf::from(DEFAULT_CSV_FILE_NAME),
        }
    }
}

/// Optional string-valued overrides, as they arrive from flags or the
/// environment. Lists are comma-separated.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub product_ids: Option<String>,
    pub column_names: Option<String>,
    pub csv_file_name: Option<String>,
}

impl ConfigOverrides {
    /// Reads the `AMIS_*` variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: lookup(ENV_BASE_URL),
            product_ids: lookup(ENV_PRODUCT_IDS),
            column_names: lookup(ENV_COLUMN_NAMES),
            csv_file_name: lookup(ENV_CSV_FILE_NAME),
        }
    }

    /// Reads the `AMIS_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl ScrapeConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, AmisError> {
        let config: ScrapeConfig =
            toml::from_str(content).map_err(|e| AmisError::Config(e.to_string()))?;
        Ok(config.fill_empty())
    }

    /// Reads and parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, AmisError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AmisError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies overrides on top of this config.
    ///
    /// Empty strings are treated as "not given", matching how blank
    /// arguments fall back to defaults. A malformed product id list is an
    /// error.
    pub fn apply(mut self, overrides: &ConfigOverrides) -> Result<Self, AmisError> {
        if let Some(url) = non_empty(&overrides.base_url) {
            self.base_url = url.to_string();
        }
        if let Some(ids) = non_empty(&overrides.product_ids) {
            let parsed = validation::parse_product_ids(ids)?;
            if !parsed.is_empty() {
                self.product_ids = parsed;
            }
        }
        if let Some(cols) = non_empty(&overrides.column_names) {
            self.column_names = validation::parse_column_names(cols);
        }
        if let Some(path) = non_empty(&overrides.csv_file_name) {
            self.csv_file_name = PathBuf::from(path);
        }
        Ok(self.fill_empty())
    }

    // Empty lists in a file or override mean "use the default".
    fn fill_empty(mut self) -> Self {
        let defaults = ScrapeConfig::default();
        if self.base_url.is_empty() {
            self.base_url = defaults.base_url;
        }
        if self.product_ids.is_empty() {
            self.product_ids = defaults.product_ids;
        }
        if self.column_names.is_empty() {
            self.column_names = defaults.column_names;
        }
        if self.csv_file_name.as_os_str().is_empty() {
            self.csv_file_name = defaults.csv_file_name;
        }
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
