//! wkcommon Storage Layer
//!
//! Namespaced, per-key TTL cache of commonality verdicts, plus the key-value
//! stores it can sit on.
//!
//! # Architecture
//!
//! - `CommonalityCache`: verdict cache with lazy expiry (no background sweep)
//! - `SqliteKvStore`: persistent `KeyValueStore` backed by a single SQLite table
//! - `MemoryKvStore`: in-process `KeyValueStore` for tests and throwaway runs
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use wkcommon_cache::{CommonalityCache, MemoryKvStore};
//! use wkcommon_domain::VocabularyToken;
//!
//! let cache = CommonalityCache::new(MemoryKvStore::new(), "wkcommon/");
//! let token = VocabularyToken::new("大人").unwrap();
//!
//! cache.set(&token, true, Duration::from_secs(60));
//! assert_eq!(cache.get(&token), Some(true));
//! ```

#![warn(missing_docs)]

mod cache;
mod memory;
mod sqlite;

pub use cache::{CommonalityCache, DEFAULT_NAMESPACE};
pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored value is not valid JSON
    #[error("Invalid data: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// Store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,

    /// Store refused the operation (e.g. quota exceeded)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
