//! Dashboard configuration
//!
//! [`DashboardConfig`] is read from a TOML file and then overridden from
//! the environment:
//!
//! ```toml
//! [api]
//! base_url = "https://coop.example.org/api"
//! timeout_secs = 15
//!
//! [table]
//! items_per_page = 25
//!
//! [log]
//! filter = "coopex=debug,info"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "COOPEX_API_URL";
/// Environment variable overriding `table.items_per_page`
pub const ENV_ITEMS_PER_PAGE: &str = "COOPEX_ITEMS_PER_PAGE";
/// Environment variable overriding `log.filter`
pub const ENV_LOG: &str = "COOPEX_LOG";

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// REST backend
    pub api: ApiConfig,
    /// Table defaults
    pub table: TableConfig,
    /// Logging
    pub log: LogConfig,
}

/// REST backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the endpoints are appended to
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Table defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Page size of list screens
    pub items_per_page: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            items_per_page: coopex_table::DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` filter directive
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// With table page size
    #[inline]
    #[must_use]
    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.table.items_per_page = items_per_page;
        self
    }

    /// Parse TOML text; missing sections keep their defaults
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for the schema
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// Returns error if an override cannot be parsed
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns error if `COOPEX_ITEMS_PER_PAGE` is not a positive integer
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(raw) = lookup(ENV_ITEMS_PER_PAGE) {
            self.table.items_per_page = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_ITEMS_PER_PAGE.to_string(),
                    value: raw.clone(),
                })?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log.filter = filter;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = DashboardConfig::new();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.table.items_per_page, 10);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml_str("[table]\nitems_per_page = 25\n").unwrap();
        assert_eq!(config.table.items_per_page, 25);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn invalid_toml() {
        assert!(matches!(
            DashboardConfig::from_toml_str("[table]\nitems_per_page = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"https://coop.example.org/api\"").unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://coop.example.org/api");
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            DashboardConfig::load("/nonexistent/coopex.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "http://api.local"),
            (ENV_ITEMS_PER_PAGE, "20"),
            (ENV_LOG, "debug"),
        ]
        .into_iter()
        .collect();
        let config = DashboardConfig::new()
            .apply_overrides(|v| vars.get(v).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.api.base_url, "http://api.local");
        assert_eq!(config.table.items_per_page, 20);
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn bad_override() {
        let err = DashboardConfig::new()
            .apply_overrides(|v| (v == ENV_ITEMS_PER_PAGE).then(|| "0".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_ITEMS_PER_PAGE));
    }
}
