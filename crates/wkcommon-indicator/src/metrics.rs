//! Metrics collection for controller operations

use serde::Serialize;

/// Counters collected while handling item-changed events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerMetrics {
    /// Item-changed events handled
    pub events: usize,

    /// Non-vocabulary items skipped
    pub skipped: usize,

    /// Verdicts served from cache
    pub cache_hits: usize,

    /// Cache misses (each issues a lookup)
    pub cache_misses: usize,

    /// Lookups that resolved to a verdict
    pub resolved: usize,

    /// Resolved lookups with no usable record, defaulted to not common
    pub not_found: usize,

    /// Lookups that failed in transport
    pub failures: usize,

    /// Resolved lookups whose event had already been superseded
    pub superseded: usize,
}

impl ControllerMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of lookupable events served from cache
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Indicator Metrics Summary".to_string(),
            "=========================".to_string(),
            format!("Events: {}", self.events),
            format!("Skipped (not vocabulary): {}", self.skipped),
            format!(
                "Cache hits: {} / misses: {} ({:.0}% hit rate)",
                self.cache_hits,
                self.cache_misses,
                self.hit_rate() * 100.0
            ),
            format!("Lookups resolved: {} ({} not found)", self.resolved, self.not_found),
            format!("Lookups failed: {}", self.failures),
            format!("Superseded responses: {}", self.superseded),
        ]
        .join("\n")
    }
}
