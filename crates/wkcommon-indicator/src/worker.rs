//! Event loop driving the controller from item-changed events

use crate::{ControllerMetrics, Dispatch, HandleOutcome, IndicatorError, LookupController};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use wkcommon_domain::traits::{IndicatorView, KeyValueStore};
use wkcommon_domain::{Clock, HostItem, ItemChanged, SessionKind};
use wkcommon_lookup::Transport;

/// Publishing side of the item-change source
///
/// Host payloads are classified into `DisplayedItem` here, once, before they
/// enter the event loop. Clones publish into the same stream, so the review
/// and lesson sessions can each hold one.
#[derive(Debug, Clone)]
pub struct ItemFeed {
    tx: mpsc::Sender<ItemChanged>,
}

impl ItemFeed {
    /// Create a feed and the receiver the worker consumes
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<ItemChanged>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    /// Classify a host payload and publish it
    pub async fn publish(&self, session: SessionKind, item: &HostItem) -> Result<(), IndicatorError> {
        self.send(ItemChanged::from_host(session, item)).await
    }

    /// Publish an already classified event
    pub async fn send(&self, event: ItemChanged) -> Result<(), IndicatorError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| IndicatorError::Worker("event loop has stopped".to_string()))
    }
}

/// Consumes item-changed events and drives the controller
///
/// Events are dispatched in arrival order; cache misses spawn their lookup as
/// a task so a slow response never holds up the next event. The controller's
/// generation guard decides which completed lookup may update the view.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use wkcommon_cache::MemoryKvStore;
/// use wkcommon_indicator::{IndicatorConfig, IndicatorWorker, ItemFeed, LookupController, RecordingView};
/// use wkcommon_lookup::MockTransport;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let controller = Arc::new(LookupController::from_config(
///         MemoryKvStore::new(),
///         MockTransport::default(),
///         RecordingView::new(),
///         &IndicatorConfig::default(),
///     ));
///     let (feed, events) = ItemFeed::channel(16);
///     let worker = IndicatorWorker::new(controller);
///
///     // Runs until every feed is dropped or Ctrl+C
///     drop(feed);
///     worker.run(events).await?;
///     Ok(())
/// }
/// ```
pub struct IndicatorWorker<S, T, V, C> {
    controller: Arc<LookupController<S, T, V, C>>,
}

impl<S, T, V, C> Clone for IndicatorWorker<S, T, V, C> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<S, T, V, C> IndicatorWorker<S, T, V, C>
where
    S: KeyValueStore + Send + Sync + 'static,
    S::Error: Display,
    T: Transport + 'static,
    V: IndicatorView + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Create a worker around a shared controller
    pub fn new(controller: Arc<LookupController<S, T, V, C>>) -> Self {
        Self { controller }
    }

    /// The controller being driven
    pub fn controller(&self) -> &Arc<LookupController<S, T, V, C>> {
        &self.controller
    }

    /// Run until the event source closes or a shutdown signal (Ctrl+C) arrives
    ///
    /// When the source closes, in-flight lookups are awaited. On Ctrl+C they
    /// are aborted.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler task panicked.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<ItemChanged>,
    ) -> Result<ControllerMetrics, IndicatorError> {
        let mut tasks: JoinSet<HandleOutcome> = JoinSet::new();
        let mut panicked = 0usize;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        tracing::info!("Indicator worker started");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event, &mut tasks),
                    None => {
                        tracing::debug!("Event source closed, draining {} lookups", tasks.len());
                        while let Some(joined) = tasks.join_next().await {
                            panicked += Self::reap(joined);
                        }
                        break;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    panicked += Self::reap(joined);
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, aborting {} lookups", tasks.len());
                    tasks.shutdown().await;
                    break;
                }
            }
        }

        let metrics = self.controller.metrics();
        tracing::info!("Indicator worker stopped. Final metrics:\n{}", metrics.summary());

        if panicked > 0 {
            return Err(IndicatorError::Worker(format!(
                "{} handler task(s) panicked",
                panicked
            )));
        }
        Ok(metrics)
    }

    fn dispatch(&self, event: ItemChanged, tasks: &mut JoinSet<HandleOutcome>) {
        tracing::debug!(session = event.session.as_str(), "item changed");

        if let Dispatch::Pending(pending) = self.controller.dispatch(&event.item) {
            let controller = Arc::clone(&self.controller);
            tasks.spawn(async move { controller.complete(pending).await });
        }
    }

    fn reap(joined: Result<HandleOutcome, JoinError>) -> usize {
        match joined {
            Ok(outcome) => {
                tracing::trace!(?outcome, "lookup task finished");
                0
            }
            Err(e) if e.is_cancelled() => 0,
            Err(e) => {
                tracing::error!("Lookup task failed: {}", e);
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wkcommon_domain::DisplayedItem;

    #[tokio::test]
    async fn test_publish_classifies_at_boundary() {
        let (feed, mut events) = ItemFeed::channel(4);
        let kanji = HostItem {
            voc: Some("大".to_string()),
            on: Some(serde_json::json!(["だい"])),
            kun: None,
        };

        feed.publish(SessionKind::Lesson, &kanji).await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.session, SessionKind::Lesson);
        assert_eq!(event.item, DisplayedItem::NonVocabulary);
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (feed, events) = ItemFeed::channel(1);
        drop(events);

        let result = feed
            .send(ItemChanged::new(SessionKind::Review, DisplayedItem::NonVocabulary))
            .await;
        assert!(matches!(result, Err(IndicatorError::Worker(_))));
    }
}
