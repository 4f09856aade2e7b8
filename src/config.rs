//! Configuration file for the `seekpage` binary
//!
//! Everything here can also be given on the command line; flags win over
//! file values.
//!
//! ```yaml
//! database: ./app.duckdb
//! table: users
//! pagination_key: id
//! listing:
//!   default_limit: 20
//!   max_limit: 200
//!   default_order: asc
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::listing::ListingConfig;
use crate::types::PaginationKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults for CLI pagination runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// DuckDB database file
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Table to page through
    #[serde(default)]
    pub table: Option<String>,

    /// Key overriding `listing.pagination_key`
    #[serde(default)]
    pub pagination_key: Option<PaginationKey>,

    /// Listing defaults
    #[serde(default)]
    pub listing: ListingConfig,
}

impl PagerConfig {
    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Load from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check listing bounds
    pub fn validate(&self) -> Result<()> {
        if self.listing.default_limit == 0 {
            return Err(Error::config("listing.default_limit must be at least 1"));
        }
        if self.listing.max_limit < self.listing.default_limit {
            return Err(Error::config(format!(
                "listing.max_limit ({}) is below listing.default_limit ({})",
                self.listing.max_limit, self.listing.default_limit
            )));
        }
        if matches!(&self.table, Some(t) if t.is_empty()) {
            return Err(Error::config("table cannot be empty"));
        }
        Ok(())
    }

    /// Listing config with the top-level key applied
    pub fn listing(&self) -> ListingConfig {
        match &self.pagination_key {
            Some(key) => self.listing.clone().with_key(key.clone()),
            None => self.listing.clone(),
        }
    }

    /// Database path, preferring `flag`
    pub fn database(&self, flag: Option<&Path>) -> Result<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .ok_or_else(|| Error::missing_field("database"))
    }

    /// Table name, preferring `flag`
    pub fn table(&self, flag: Option<&str>) -> Result<String> {
        flag.map(String::from)
            .or_else(|| self.table.clone())
            .ok_or_else(|| Error::missing_field("table"))
    }
}
