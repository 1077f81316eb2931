//! Lookup controller: the indicator state machine

use crate::{ControllerMetrics, IndicatorConfig};
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use wkcommon_cache::CommonalityCache;
use wkcommon_domain::traits::{IndicatorView, KeyValueStore};
use wkcommon_domain::{Clock, CommonalityVerdict, DisplayedItem, SystemClock, VocabularyToken};
use wkcommon_lookup::{JishoLookup, LookupOutcome, Transport};

/// What happened while handling one item-changed event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Item was not vocabulary; indicator hidden
    Skipped,

    /// Verdict served from cache, no network call
    CacheHit(CommonalityVerdict),

    /// Lookup resolved, verdict cached and displayed
    Resolved(CommonalityVerdict),

    /// Lookup resolved and was cached, but a newer event owns the view
    Superseded(CommonalityVerdict),

    /// Lookup failed; indicator left in Fetching, nothing cached
    Failed,
}

impl HandleOutcome {
    /// Verdict produced by this event, if any
    pub fn verdict(&self) -> Option<CommonalityVerdict> {
        match self {
            HandleOutcome::CacheHit(v) | HandleOutcome::Resolved(v) | HandleOutcome::Superseded(v) => {
                Some(*v)
            }
            HandleOutcome::Skipped | HandleOutcome::Failed => None,
        }
    }
}

/// Result of the synchronous part of event handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Event fully handled without a lookup
    Settled(HandleOutcome),

    /// Fetching is shown; the lookup still has to run
    Pending(PendingLookup),
}

/// A cache miss waiting for its lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    token: VocabularyToken,
    generation: u64,
}

impl PendingLookup {
    /// Token being looked up
    pub fn token(&self) -> &VocabularyToken {
        &self.token
    }

    /// Generation of the event that issued the lookup
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Drives the indicator view from item-changed events
///
/// The cache is read only in `dispatch` and written only in `complete`: a miss
/// that resolves is written through exactly once, so the cache is a pure
/// memoization layer over the lookup service.
///
/// Every view update happens while the generation lock is held, so a
/// completed lookup can never paint over a newer event's state.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wkcommon_cache::{CommonalityCache, MemoryKvStore};
/// use wkcommon_indicator::{LookupController, RecordingView};
/// use wkcommon_lookup::{JishoLookup, MockTransport, DEFAULT_ENDPOINT};
///
/// let controller = LookupController::new(
///     CommonalityCache::new(MemoryKvStore::new(), "wkcommon/"),
///     JishoLookup::new(MockTransport::default(), DEFAULT_ENDPOINT),
///     RecordingView::new(),
///     Duration::from_secs(28 * 86400),
/// );
/// assert_eq!(controller.metrics().events, 0);
/// ```
pub struct LookupController<S, T, V, C = SystemClock> {
    cache: CommonalityCache<S, C>,
    lookup: JishoLookup<T>,
    view: V,
    ttl: Duration,
    generation: Mutex<u64>,
    metrics: Mutex<ControllerMetrics>,
}

impl<S, T, V> LookupController<S, T, V, SystemClock>
where
    S: KeyValueStore,
    S::Error: Display,
    T: Transport,
    V: IndicatorView,
{
    /// Assemble a controller from configuration
    pub fn from_config(store: S, transport: T, view: V, config: &IndicatorConfig) -> Self {
        let cache = CommonalityCache::new(store, config.cache_namespace.clone());
        let lookup = JishoLookup::new(transport, config.endpoint.clone())
            .with_search_page(config.search_page_url.clone());
        Self::new(cache, lookup, view, config.cache_ttl())
    }
}

impl<S, T, V, C> LookupController<S, T, V, C>
where
    S: KeyValueStore,
    S::Error: Display,
    T: Transport,
    V: IndicatorView,
    C: Clock,
{
    /// Create a controller from its parts
    ///
    /// `ttl` is applied to every verdict written to the cache.
    pub fn new(cache: CommonalityCache<S, C>, lookup: JishoLookup<T>, view: V, ttl: Duration) -> Self {
        Self {
            cache,
            lookup,
            view,
            ttl,
            generation: Mutex::new(0),
            metrics: Mutex::new(ControllerMetrics::new()),
        }
    }

    /// The verdict cache
    pub fn cache(&self) -> &CommonalityCache<S, C> {
        &self.cache
    }

    /// The lookup service
    pub fn lookup(&self) -> &JishoLookup<T> {
        &self.lookup
    }

    /// Generation of the most recent event
    pub fn current_generation(&self) -> u64 {
        *self.lock_generation()
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the counters
    pub fn metrics(&self) -> ControllerMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, update: impl FnOnce(&mut ControllerMetrics)) {
        let mut metrics = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut *metrics);
    }

    /// Handle one item-changed event
    ///
    /// Non-vocabulary items are hidden before any cache or network access.
    /// A transport failure leaves the view in Fetching and caches nothing.
    pub async fn handle_item_changed(&self, item: &DisplayedItem) -> HandleOutcome {
        match self.dispatch(item) {
            Dispatch::Settled(outcome) => outcome,
            Dispatch::Pending(pending) => self.complete(pending).await,
        }
    }

    /// Run the synchronous part of event handling
    ///
    /// Takes the event's generation, then either settles it (skip or cache
    /// hit) or shows Fetching and returns the lookup still to be made. Calling
    /// this in event order keeps view updates in event order even when the
    /// pending lookups are completed concurrently.
    pub fn dispatch(&self, item: &DisplayedItem) -> Dispatch {
        let mut current = self.lock_generation();
        *current += 1;
        let generation = *current;
        self.record(|m| m.events += 1);

        let token = match item {
            DisplayedItem::Vocabulary(token) => token,
            DisplayedItem::NonVocabulary => {
                tracing::debug!(generation, "not a vocabulary item, hiding indicator");
                self.view.show_hidden();
                self.record(|m| m.skipped += 1);
                return Dispatch::Settled(HandleOutcome::Skipped);
            }
        };

        if let Some(verdict) = self.cache.get(token) {
            tracing::debug!(%token, verdict, "cache hit");
            self.view.show_verdict(verdict);
            self.record(|m| m.cache_hits += 1);
            return Dispatch::Settled(HandleOutcome::CacheHit(verdict));
        }

        tracing::debug!(%token, "cache miss");
        self.record(|m| m.cache_misses += 1);
        self.view.show_fetching();

        Dispatch::Pending(PendingLookup {
            token: token.clone(),
            generation,
        })
    }

    /// Perform a pending lookup, write the verdict through, and show it if
    /// no newer event has arrived
    pub async fn complete(&self, pending: PendingLookup) -> HandleOutcome {
        let PendingLookup { token, generation } = pending;

        let verdict = match self.lookup.lookup(&token).await {
            Ok(outcome) => {
                if outcome == LookupOutcome::NotFound {
                    self.record(|m| m.not_found += 1);
                }
                outcome.verdict()
            }
            Err(e) => {
                tracing::error!(%token, error = %e, "lookup failed");
                self.record(|m| m.failures += 1);
                return HandleOutcome::Failed;
            }
        };

        tracing::info!(%token, verdict, "lookup resolved");
        self.cache.set(&token, verdict, self.ttl);
        self.record(|m| m.resolved += 1);

        let current = self.lock_generation();
        if *current == generation {
            self.view.show_verdict(verdict);
            HandleOutcome::Resolved(verdict)
        } else {
            tracing::debug!(%token, generation, "response superseded by newer event");
            self.record(|m| m.superseded += 1);
            HandleOutcome::Superseded(verdict)
        }
    }

    /// Convenience for a vocabulary token outside the event stream
    pub async fn check(&self, token: &VocabularyToken) -> HandleOutcome {
        self.handle_item_changed(&DisplayedItem::Vocabulary(token.clone()))
            .await
    }

    /// Remove every cached verdict
    pub fn clear_cache(&self) -> Result<usize, S::Error> {
        self.cache.clear()
    }
}
