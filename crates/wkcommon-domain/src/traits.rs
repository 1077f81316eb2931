//! Trait definitions for external capabilities
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Implementations live in other crates (wkcommon-cache, wkcommon-cli).

use crate::{CommonalityVerdict, IndicatorState};
use serde_json::Value;
use std::sync::Arc;

/// Persistent key-value storage
///
/// Implemented by the infrastructure layer (wkcommon-cache). Each call is a
/// single-key operation; no multi-key transactions are required.
pub trait KeyValueStore {
    /// Error type for store operations
    type Error;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &Value) -> Result<(), Self::Error>;

    /// Get the raw value stored under `key`
    fn get_raw(&self, key: &str) -> Result<Option<Value>, Self::Error>;

    /// Remove every key starting with `prefix`, returning how many were removed
    fn clear_prefix(&self, prefix: &str) -> Result<usize, Self::Error>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    type Error = S::Error;

    fn put(&self, key: &str, value: &Value) -> Result<(), Self::Error> {
        (**self).put(key, value)
    }

    fn get_raw(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        (**self).get_raw(key)
    }

    fn clear_prefix(&self, prefix: &str) -> Result<usize, Self::Error> {
        (**self).clear_prefix(prefix)
    }
}

/// Renders the indicator widget
///
/// Each call fully replaces the previously visible state and is idempotent.
pub trait IndicatorView {
    /// Hide the indicator
    fn show_hidden(&self);

    /// Show the in-flight marker
    fn show_fetching(&self);

    /// Show a resolved verdict
    fn show_verdict(&self, verdict: CommonalityVerdict);

    /// Render an arbitrary state
    fn show(&self, state: IndicatorState) {
        match state {
            IndicatorState::Hidden => self.show_hidden(),
            IndicatorState::Fetching => self.show_fetching(),
            IndicatorState::Common => self.show_verdict(true),
            IndicatorState::Uncommon => self.show_verdict(false),
        }
    }
}

impl<V: IndicatorView + ?Sized> IndicatorView for Arc<V> {
    fn show_hidden(&self) {
        (**self).show_hidden()
    }

    fn show_fetching(&self) {
        (**self).show_fetching()
    }

    fn show_verdict(&self, verdict: CommonalityVerdict) {
        (**self).show_verdict(verdict)
    }
}
