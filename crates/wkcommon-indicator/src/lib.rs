//! wkcommon Indicator
//!
//! Orchestrates the commonality cache, the dictionary lookup and the indicator
//! view in response to item-changed events from the host application.
//!
//! # Overview
//!
//! For every item-changed event the controller:
//! - **Skips** non-vocabulary items, hiding the indicator without touching the
//!   cache or the network
//! - **Serves** cached verdicts directly
//! - **Looks up** on a cache miss, showing the fetching marker, then writes the
//!   verdict through to the cache and displays it
//!
//! ## State machine
//!
//! | Current | Event | Condition | Next |
//! |---------|-------|-----------|------|
//! | any | item changed | not vocabulary | Hidden |
//! | any | item changed | cache hit | Common / Uncommon |
//! | any | item changed | cache miss | Fetching, then Common / Uncommon |
//! | Fetching | lookup fails | | Fetching (unchanged) |
//!
//! Each event takes a new generation number. A lookup that resolves after a
//! newer event arrived still caches its verdict but leaves the view alone.
//!
//! # Usage
//!
//! ## Single event
//!
//! ```
//! use std::sync::Arc;
//! use wkcommon_cache::MemoryKvStore;
//! use wkcommon_domain::{DisplayedItem, IndicatorState, VocabularyToken};
//! use wkcommon_indicator::{IndicatorConfig, LookupController, RecordingView};
//! use wkcommon_lookup::MockTransport;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = MockTransport::default();
//! transport.add_response("大人", MockTransport::search_body(&[true]));
//! let view = RecordingView::new();
//!
//! let controller = LookupController::from_config(
//!     MemoryKvStore::new(),
//!     transport,
//!     view.clone(),
//!     &IndicatorConfig::default(),
//! );
//!
//! let item = DisplayedItem::Vocabulary(VocabularyToken::new("大人").unwrap());
//! controller.handle_item_changed(&item).await;
//! assert_eq!(view.current(), IndicatorState::Common);
//! # });
//! ```
//!
//! ## Event loop
//!
//! ```no_run
//! use wkcommon_domain::{HostItem, SessionKind};
//! use wkcommon_indicator::{IndicatorApp, IndicatorConfig, ItemFeed, RecordingView, StorageBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = IndicatorConfig::default();
//!     let app = IndicatorApp::build(&config, StorageBackend::Memory, RecordingView::new())?;
//!
//!     let (feed, events) = ItemFeed::channel(16);
//!     let worker = app.worker();
//!     let handle = tokio::spawn(async move { worker.run(events).await });
//!
//!     feed.publish(SessionKind::Review, &HostItem { voc: Some("大人".into()), ..Default::default() }).await?;
//!     drop(feed);
//!
//!     let metrics = handle.await??;
//!     println!("{}", metrics.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! endpoint = "https://jisho.org/api/v1/search/words"
//! search_page_url = "https://jisho.org/search/"
//! cache_namespace = "wkcommon/"
//! cache_ttl_days = 28
//! request_timeout_secs = 30
//! ```

#![warn(missing_docs)]

mod app;
mod config;
mod controller;
mod error;
mod metrics;
mod view;
mod worker;

pub use app::{AppController, DynStore, IndicatorApp, StorageBackend};
pub use config::IndicatorConfig;
pub use controller::{Dispatch, HandleOutcome, LookupController, PendingLookup};
pub use error::IndicatorError;
pub use metrics::ControllerMetrics;
pub use view::RecordingView;
pub use worker::{IndicatorWorker, ItemFeed};
