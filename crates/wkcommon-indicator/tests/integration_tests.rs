//! Integration tests for the lookup controller and event loop

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wkcommon_cache::{CommonalityCache, MemoryKvStore};
use wkcommon_domain::{
    DisplayedItem, HostItem, IndicatorState, ManualClock, SessionKind, VocabularyToken,
};
use wkcommon_domain::traits::KeyValueStore;
use wkcommon_indicator::{
    Dispatch, HandleOutcome, IndicatorWorker, ItemFeed, LookupController, RecordingView,
};
use wkcommon_lookup::{JishoLookup, MockTransport, TransportError, DEFAULT_ENDPOINT};

const TTL: Duration = Duration::from_secs(28 * 86400);

type Controller = LookupController<MemoryKvStore, MockTransport, RecordingView, ManualClock>;

/// Helper bundling a controller with handles to its collaborators
struct Fixture {
    controller: Arc<Controller>,
    store: MemoryKvStore,
    transport: MockTransport,
    view: RecordingView,
}

fn fixture() -> Fixture {
    let store = MemoryKvStore::new();
    let transport = MockTransport::default();
    let view = RecordingView::new();
    let controller = LookupController::new(
        CommonalityCache::with_clock(store.clone(), ManualClock::new(0), "wkcommon/"),
        JishoLookup::new(transport.clone(), DEFAULT_ENDPOINT),
        view.clone(),
        TTL,
    );
    Fixture {
        controller: Arc::new(controller),
        store,
        transport,
        view,
    }
}

fn token(s: &str) -> VocabularyToken {
    VocabularyToken::new(s).unwrap()
}

fn vocab(s: &str) -> DisplayedItem {
    DisplayedItem::Vocabulary(token(s))
}

fn vocab_host(s: &str) -> HostItem {
    HostItem {
        voc: Some(s.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_empty_result_caches_false() {
    let f = fixture();
    f.transport
        .add_response("ふぁぶ", json!({"meta": {"status": 200}, "data": []}));

    let outcome = f.controller.handle_item_changed(&vocab("ふぁぶ")).await;

    assert_eq!(outcome, HandleOutcome::Resolved(false));
    assert_eq!(f.controller.cache().get(&token("ふぁぶ")), Some(false));
    assert_eq!(
        f.view.history(),
        vec![IndicatorState::Fetching, IndicatorState::Uncommon]
    );
}

#[tokio::test]
async fn test_common_first_record_shows_common_and_caches_true() {
    let f = fixture();
    f.transport
        .add_response("大人", MockTransport::search_body(&[true, false]));

    f.controller.handle_item_changed(&vocab("大人")).await;

    assert_eq!(
        f.view.history(),
        vec![IndicatorState::Fetching, IndicatorState::Common]
    );
    assert_eq!(f.controller.cache().get(&token("大人")), Some(true));
}

#[tokio::test]
async fn test_only_first_record_decides() {
    let f = fixture();
    f.transport
        .add_response("生", MockTransport::search_body(&[false, true, true]));

    let outcome = f.controller.handle_item_changed(&vocab("生")).await;
    assert_eq!(outcome, HandleOutcome::Resolved(false));
}

#[tokio::test]
async fn test_non_vocabulary_hides_from_any_state() {
    let f = fixture();
    f.transport
        .add_response("大人", MockTransport::search_body(&[true]));
    f.controller.handle_item_changed(&vocab("大人")).await;
    let calls_before = f.transport.call_count();
    let entries_before = f.store.len();

    let kanji = HostItem {
        on: Some(json!(["じん"])),
        ..Default::default()
    };
    let outcome = f
        .controller
        .handle_item_changed(&DisplayedItem::from(&kanji))
        .await;

    assert_eq!(outcome, HandleOutcome::Skipped);
    assert_eq!(f.view.current(), IndicatorState::Hidden);
    assert_eq!(f.transport.call_count(), calls_before);
    assert_eq!(f.store.len(), entries_before);
}

#[tokio::test]
async fn test_hidden_while_fetching() {
    let f = fixture();
    f.transport
        .add_error("大人", TransportError::Timeout);
    f.controller.handle_item_changed(&vocab("大人")).await;
    assert_eq!(f.view.current(), IndicatorState::Fetching);

    f.controller
        .handle_item_changed(&DisplayedItem::NonVocabulary)
        .await;
    assert_eq!(f.view.current(), IndicatorState::Hidden);
}

#[tokio::test]
async fn test_cache_hit_makes_no_network_call() {
    let f = fixture();
    f.controller.cache().set(&token("一人"), false, TTL);

    let outcome = f.controller.handle_item_changed(&vocab("一人")).await;

    assert_eq!(outcome, HandleOutcome::CacheHit(false));
    assert_eq!(f.transport.call_count(), 0);
    assert_eq!(f.view.history(), vec![IndicatorState::Uncommon]);
}

#[tokio::test]
async fn test_transport_failure_writes_nothing() {
    let f = fixture();
    f.transport.add_error("大人", TransportError::Status(503));

    let outcome = f.controller.handle_item_changed(&vocab("大人")).await;

    assert_eq!(outcome, HandleOutcome::Failed);
    assert_eq!(f.view.current(), IndicatorState::Fetching);
    assert!(f.store.is_empty());
    assert_eq!(f.store.get_raw("wkcommon/大人").unwrap(), None);
}

#[tokio::test]
async fn test_failure_is_retried_on_next_event() {
    let f = fixture();
    f.transport.add_error("大人", TransportError::Timeout);
    f.controller.handle_item_changed(&vocab("大人")).await;

    f.transport
        .add_response("大人", MockTransport::search_body(&[true]));
    let outcome = f.controller.handle_item_changed(&vocab("大人")).await;

    assert_eq!(outcome, HandleOutcome::Resolved(true));
    assert_eq!(f.transport.calls(), vec!["大人", "大人"]);
}

#[tokio::test]
async fn test_superseded_response_caches_but_keeps_view() {
    let f = fixture();
    f.transport
        .add_response("大人", MockTransport::search_body(&[true]));
    f.transport.add_delay("大人", Duration::from_millis(100));
    f.transport
        .add_response("一人", MockTransport::search_body(&[false]));

    let slow = match f.controller.dispatch(&vocab("大人")) {
        Dispatch::Pending(pending) => pending,
        other => panic!("expected pending lookup, got {:?}", other),
    };
    let controller = Arc::clone(&f.controller);
    let slow_task = tokio::spawn(async move { controller.complete(slow).await });

    let fast = f.controller.handle_item_changed(&vocab("一人")).await;
    let stale = slow_task.await.unwrap();

    assert_eq!(fast, HandleOutcome::Resolved(false));
    assert_eq!(stale, HandleOutcome::Superseded(true));
    assert_eq!(f.view.current(), IndicatorState::Uncommon);
    assert_eq!(f.controller.cache().get(&token("大人")), Some(true));
    assert_eq!(f.controller.metrics().superseded, 1);
}

#[tokio::test]
async fn test_worker_processes_feed_in_order() {
    let f = fixture();
    f.transport
        .add_response("大人", MockTransport::search_body(&[true]));
    f.transport.add_delay("大人", Duration::from_millis(100));
    f.transport
        .add_response("一人", MockTransport::search_body(&[false]));

    let (feed, events) = ItemFeed::channel(8);
    let worker = IndicatorWorker::new(Arc::clone(&f.controller));
    let handle = tokio::spawn(async move { worker.run(events).await });

    feed.publish(SessionKind::Review, &vocab_host("大人"))
        .await
        .unwrap();
    feed.publish(SessionKind::Review, &vocab_host("一人"))
        .await
        .unwrap();
    drop(feed);

    let metrics = handle.await.unwrap().unwrap();

    assert_eq!(metrics.events, 2);
    assert_eq!(metrics.cache_misses, 2);
    assert_eq!(metrics.resolved, 2);
    assert_eq!(metrics.superseded, 1);
    assert_eq!(f.view.current(), IndicatorState::Uncommon);
    assert_eq!(f.controller.cache().get(&token("大人")), Some(true));
}

#[tokio::test]
async fn test_lesson_and_review_share_one_controller() {
    let f = fixture();
    f.transport
        .add_response("大人", MockTransport::search_body(&[true]));

    let (review_feed, events) = ItemFeed::channel(8);
    let lesson_feed = review_feed.clone();
    let worker = IndicatorWorker::new(Arc::clone(&f.controller));
    let handle = tokio::spawn(async move { worker.run(events).await });

    lesson_feed
        .publish(SessionKind::Lesson, &vocab_host("大人"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    review_feed
        .publish(SessionKind::Review, &vocab_host("大人"))
        .await
        .unwrap();
    drop(review_feed);
    drop(lesson_feed);

    let metrics = handle.await.unwrap().unwrap();

    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(f.transport.call_count(), 1);
    assert_eq!(
        f.view.history(),
        vec![
            IndicatorState::Fetching,
            IndicatorState::Common,
            IndicatorState::Common
        ]
    );
}
