//! SQLite-backed key-value store
//!
//! One table, one row per key, values stored as JSON text.

use crate::CacheError;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use wkcommon_domain::traits::KeyValueStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

/// Persistent `KeyValueStore` on SQLite
///
/// The connection is guarded by a mutex so the store can be shared between
/// the event loop's tasks.
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Open (or create) the database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```
    /// use wkcommon_cache::SqliteKvStore;
    ///
    /// let store = SqliteKvStore::new(":memory:").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored keys (expired or not)
    pub fn len(&self) -> Result<usize, CacheError> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for SqliteKvStore {
    type Error = CacheError;

    fn put(&self, key: &str, value: &Value) -> Result<(), Self::Error> {
        let text = serde_json::to_string(value)?;
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, text],
        )?;
        Ok(())
    }

    fn get_raw(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        let text: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        match text {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn clear_prefix(&self, prefix: &str) -> Result<usize, Self::Error> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        // substr() avoids LIKE wildcard escaping; lengths are in characters
        let removed = conn.execute(
            "DELETE FROM kv WHERE substr(key, 1, ?2) = ?1",
            params![prefix, prefix.chars().count() as i64],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upsert_replaces_value() {
        let store = SqliteKvStore::new(":memory:").unwrap();
        store.put("k", &json!({"v": 1})).unwrap();
        store.put("k", &json!({"v": 2})).unwrap();

        assert_eq!(store.get_raw("k").unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_clear_prefix_with_wildcard_characters() {
        let store = SqliteKvStore::new(":memory:").unwrap();
        store.put("a_%/1", &json!(1)).unwrap();
        store.put("abc/1", &json!(2)).unwrap();

        assert_eq!(store.clear_prefix("a_%/").unwrap(), 1);
        assert!(store.get_raw("abc/1").unwrap().is_some());
    }

    #[test]
    fn test_clear_prefix_multibyte() {
        let store = SqliteKvStore::new(":memory:").unwrap();
        store.put("語/大人", &json!(true)).unwrap();
        store.put("語/一人", &json!(false)).unwrap();
        store.put("other/大人", &json!(true)).unwrap();

        assert_eq!(store.clear_prefix("語/").unwrap(), 2);
        assert_eq!(store.len().unwrap(), 1);
    }
}
