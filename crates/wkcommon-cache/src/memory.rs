//! In-process key-value store

use crate::CacheError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use wkcommon_domain::traits::KeyValueStore;

/// `HashMap`-backed store; contents are lost when the process exits
///
/// Clones share the same map, so a test can keep a handle while the cache
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryKvStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail, simulating a full quota
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored keys (expired or not)
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKvStore {
    type Error = CacheError;

    fn put(&self, key: &str, value: &Value) -> Result<(), Self::Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("quota exceeded".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| CacheError::Poisoned)?
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get_raw(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn clear_prefix(&self, prefix: &str) -> Result<usize, Self::Error> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_and_get() {
        let store = MemoryKvStore::new();
        store.put("k", &json!({"a": 1})).unwrap();
        assert_eq!(store.get_raw("k").unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.get_raw("missing").unwrap(), None);
    }

    #[test]
    fn test_clear_prefix() {
        let store = MemoryKvStore::new();
        store.put("x/1", &json!(1)).unwrap();
        store.put("x/2", &json!(2)).unwrap();
        store.put("y/1", &json!(3)).unwrap();

        assert_eq!(store.clear_prefix("x/").unwrap(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fail_writes() {
        let store = MemoryKvStore::new();
        store.fail_writes(true);
        assert!(matches!(
            store.put("k", &json!(1)),
            Err(CacheError::Unavailable(_))
        ));

        store.fail_writes(false);
        assert!(store.put("k", &json!(1)).is_ok());
    }
}
