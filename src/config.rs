//! Synchronizer configuration.
//!
//! [`SyncConfig`] carries the handful of constants the page needs to know
//! about its surroundings: the index document name, the path segment that
//! prefixes every embedded docs URL, the host origin used by the external
//! link policy, and the wording of the staleness banner.
//!
//! All keys are optional in TOML; anything missing falls back to the
//! defaults below.
//!
//! ```
//! use docat_navigator::SyncConfig;
//!
//! let config = SyncConfig::from_toml_str(r#"
//!     host_origin = "https://docs.example.com"
//!     title_suffix = "Example Docs"
//! "#).unwrap();
//!
//! assert_eq!(config.host_origin, "https://docs.example.com");
//! assert_eq!(config.index_page, "index.html");
//! ```

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

pub const DEFAULT_INDEX_PAGE: &str = "index.html";
pub const DEFAULT_EMBED_DELIMITER: &str = "/doc/";
pub const DEFAULT_HOST_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_TITLE_SUFFIX: &str = "docat";
pub const DEFAULT_STALE_MESSAGE: &str = "You are viewing an outdated version of the documentation.";
pub const DEFAULT_CATALOG_CACHE_CAPACITY: usize = 64;

/// Settings shared by the page, the watcher and the HTTP repository.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Page used when the route names none.
    pub index_page: String,
    /// Segment preceding `{project}/{version}/{page}` in embedded URLs.
    pub embed_delimiter: String,
    /// Origin of the hosting page. Links elsewhere open in a new context.
    pub host_origin: String,
    /// Prefix for API and docs URLs. Empty means same origin.
    pub api_base_url: String,
    /// Appended to the project name in the document title.
    pub title_suffix: String,
    /// Banner text shown when an outdated version is displayed.
    pub stale_message: String,
    /// Number of project catalogs kept by the caching repository.
    pub catalog_cache_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            index_page: DEFAULT_INDEX_PAGE.to_string(),
            embed_delimiter: DEFAULT_EMBED_DELIMITER.to_string(),
            host_origin: DEFAULT_HOST_ORIGIN.to_string(),
            api_base_url: String::new(),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
            stale_message: DEFAULT_STALE_MESSAGE.to_string(),
            catalog_cache_capacity: DEFAULT_CATALOG_CACHE_CAPACITY,
        }
    }
}

impl SyncConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&text)
    }

    /// Set the host origin used for the external link policy.
    pub fn with_host_origin(mut self, origin: impl Into<String>) -> Self {
        self.host_origin = origin.into();
        self
    }

    /// Set the base URL prefixed to API and docs URLs.
    pub fn with_api_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base_url = base.into();
        self
    }
}

/// Errors loading a [`SyncConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = SyncConfig::from_toml_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.embed_delimiter, "/doc/");
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SyncConfig::from_toml_str(
            r#"
            embed_delimiter = "/docs/"
            catalog_cache_capacity = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.embed_delimiter, "/docs/");
        assert_eq!(config.catalog_cache_capacity, 8);
        assert_eq!(config.stale_message, DEFAULT_STALE_MESSAGE);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = SyncConfig::from_toml_str("index_page = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SyncConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
