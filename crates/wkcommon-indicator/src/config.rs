//! Configuration for the indicator
//!
//! Endpoint, cache namespace and TTL, and request timeout.

use crate::IndicatorError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wkcommon_cache::DEFAULT_NAMESPACE;
use wkcommon_lookup::{DEFAULT_ENDPOINT, DEFAULT_SEARCH_PAGE, DEFAULT_TIMEOUT_SECS};

/// Configuration for the indicator service
///
/// # Examples
///
/// ```
/// use wkcommon_indicator::IndicatorConfig;
///
/// let config = IndicatorConfig::default();
/// assert_eq!(config.cache_ttl_days, 28);
/// assert_eq!(config.cache_namespace, "wkcommon/");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Word search API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Human-facing search page base URL
    #[serde(default = "default_search_page_url")]
    pub search_page_url: String,

    /// Key prefix for cached verdicts
    ///
    /// A single segment ending in `/`, so no namespace is a prefix of another
    /// and clearing one never touches the rest.
    #[serde(default = "default_cache_namespace")]
    pub cache_namespace: String,

    /// How long a verdict stays valid (in days)
    /// Default: 28 days
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: u64,

    /// HTTP request timeout (in seconds)
    /// Default: 30 seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// SQLite cache file; `None` lets the caller pick a location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_search_page_url() -> String {
    DEFAULT_SEARCH_PAGE.to_string()
}

fn default_cache_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_cache_ttl_days() -> u64 {
    28
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            search_page_url: default_search_page_url(),
            cache_namespace: default_cache_namespace(),
            cache_ttl_days: default_cache_ttl_days(),
            request_timeout_secs: default_request_timeout_secs(),
            database_path: None,
        }
    }
}

impl IndicatorConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, IndicatorError> {
        let contents = std::fs::read_to_string(path)?;
        let config: IndicatorConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.endpoint.trim().is_empty() {
            return Err(IndicatorError::Config("endpoint cannot be empty".to_string()));
        }
        if self.cache_namespace.is_empty() {
            return Err(IndicatorError::Config(
                "cache_namespace cannot be empty".to_string(),
            ));
        }
        if !is_single_segment(&self.cache_namespace) {
            return Err(IndicatorError::Config(format!(
                "cache_namespace must be a single segment ending in '/', got {:?}",
                self.cache_namespace
            )));
        }
        if self.cache_ttl_days == 0 {
            return Err(IndicatorError::Config(
                "cache_ttl_days must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(IndicatorError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get cache TTL as Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_days.saturating_mul(86400))
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `name/` with no other separator
fn is_single_segment(namespace: &str) -> bool {
    match namespace.strip_suffix('/') {
        Some(name) => !name.is_empty() && !name.contains('/'),
        None => false,
    }
}
