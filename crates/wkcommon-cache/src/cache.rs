//! Commonality verdict cache

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use wkcommon_domain::traits::KeyValueStore;
use wkcommon_domain::{Clock, CommonalityVerdict, SystemClock, VocabularyToken};

/// Default key prefix for cached verdicts
pub const DEFAULT_NAMESPACE: &str = "wkcommon/";

/// Stored form of a verdict. Never leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    value: CommonalityVerdict,
    written_at: u64,
    ttl: u64,
}

impl CacheEntry {
    /// Valid iff `now - written_at <= ttl`
    fn is_valid_at(&self, now: u64) -> bool {
        now.saturating_sub(self.written_at) <= self.ttl
    }
}

/// Namespaced verdict cache with per-entry expiry
///
/// Expired entries are not deleted; they read as absent and are overwritten by
/// the next `set` for the same token. Storage failures never propagate: a
/// failed read is a miss and a failed write is dropped.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wkcommon_cache::{CommonalityCache, MemoryKvStore};
/// use wkcommon_domain::{ManualClock, VocabularyToken};
///
/// let clock = ManualClock::new(0);
/// let cache = CommonalityCache::with_clock(MemoryKvStore::new(), clock.clone(), "test/");
/// let token = VocabularyToken::new("一人").unwrap();
///
/// cache.set(&token, false, Duration::from_secs(10));
/// clock.advance(Duration::from_secs(11));
/// assert_eq!(cache.get(&token), None);
/// ```
pub struct CommonalityCache<S, C = SystemClock> {
    store: S,
    clock: C,
    namespace: String,
}

impl<S> CommonalityCache<S, SystemClock>
where
    S: KeyValueStore,
    S::Error: Display,
{
    /// Create a cache over `store` using wall-clock time
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self::with_clock(store, SystemClock, namespace)
    }
}

impl<S, C> CommonalityCache<S, C>
where
    S: KeyValueStore,
    S::Error: Display,
    C: Clock,
{
    /// Create a cache with an explicit time source
    pub fn with_clock(store: S, clock: C, namespace: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            namespace: namespace.into(),
        }
    }

    /// Key prefix applied to every token
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, token: &VocabularyToken) -> String {
        format!("{}{}", self.namespace, token.as_str())
    }

    /// Get the cached verdict for `token`, if present and not expired
    pub fn get(&self, token: &VocabularyToken) -> Option<CommonalityVerdict> {
        let key = self.key(token);
        let raw = match self.store.get_raw(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%token, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(%token, error = %e, "unreadable cache entry, treating as miss");
                return None;
            }
        };

        if entry.is_valid_at(self.clock.now_millis()) {
            Some(entry.value)
        } else {
            tracing::debug!(%token, "cache entry expired");
            None
        }
    }

    /// Store `verdict` for `token`, replacing any previous entry
    ///
    /// Silently drops the write if the store fails.
    pub fn set(&self, token: &VocabularyToken, verdict: CommonalityVerdict, ttl: Duration) {
        let entry = CacheEntry {
            value: verdict,
            written_at: self.clock.now_millis(),
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };

        let value = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%token, error = %e, "failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = self.store.put(&self.key(token), &value) {
            tracing::warn!(%token, error = %e, "cache write failed, dropping");
        }
    }

    /// Remove every entry under this cache's namespace
    ///
    /// Removal is by key prefix, so a namespace that extends this one
    /// (`wkcommon/` and `wkcommon/v2/`) is cleared too. Returns the number of
    /// entries removed.
    pub fn clear(&self) -> Result<usize, S::Error> {
        let removed = self.store.clear_prefix(&self.namespace)?;
        tracing::info!(namespace = %self.namespace, removed, "cache cleared");
        Ok(removed)
    }
}
