//! Error types for indicator operations

use thiserror::Error;
use wkcommon_cache::CacheError;
use wkcommon_lookup::TransportError;

/// Errors that can occur while assembling or running the indicator
///
/// Lookup and storage failures during event handling are recovered inside the
/// controller and never surface here.
#[derive(Error, Debug)]
pub enum IndicatorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read a config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Storage layer could not be opened
    #[error("Storage error: {0}")]
    Store(#[from] CacheError),

    /// HTTP transport could not be created
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Event loop error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
