//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Indicator assembly or event loop error
    #[error(transparent)]
    Indicator(#[from] wkcommon_indicator::IndicatorError),

    /// Cache store error
    #[error("Cache error: {0}")]
    Cache(#[from] wkcommon_cache::CacheError),

    /// Lookup error
    #[error("Lookup error: {0}")]
    Lookup(#[from] wkcommon_lookup::LookupError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
