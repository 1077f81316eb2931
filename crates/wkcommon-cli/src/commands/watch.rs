//! Watch command implementation.
//!
//! Each input line is one host item payload, e.g.
//! `{"voc": "大人"}` or `{"session": "lesson", "on": ["じん"]}`.

use crate::cli::WatchArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::{Formatter, TerminalView};
use serde::Deserialize;
use std::future::Future;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use wkcommon_domain::{HostItem, ItemChanged, SessionKind};
use wkcommon_indicator::{ControllerMetrics, IndicatorApp, IndicatorError, ItemFeed, StorageBackend};

/// Events buffered between the reader and the event loop
const FEED_BUFFER: usize = 64;

#[derive(Debug, Deserialize)]
struct WatchLine {
    #[serde(default)]
    session: Option<SessionKind>,
    #[serde(flatten)]
    item: HostItem,
}

/// Execute the watch command.
pub async fn execute_watch(
    args: WatchArgs,
    config: &Config,
    backend: StorageBackend,
    formatter: &Formatter,
) -> Result<()> {
    let app = IndicatorApp::build(&config.indicator, backend, TerminalView::new(*formatter))?;

    let (feed, events) = ItemFeed::channel(FEED_BUFFER);
    let worker = app.worker();
    let handle = tokio::spawn(async move { worker.run(events).await });

    let reading = read_input(args.file.as_deref(), args.session.into(), feed, formatter);
    let (metrics, published) = join_worker(reading, handle).await?;

    let summary = formatter.metrics(&metrics)?;
    if !summary.is_empty() {
        println!("{}", summary);
    }

    if let Some(published) = published {
        tracing::info!("Published {} item change(s)", published?);
    }
    Ok(())
}

/// Drive `reading` alongside the worker and wait for the worker to finish.
///
/// The worker is always awaited, even when reading fails; the read result is
/// handed back untouched. `None` means the worker stopped first (Ctrl+C) and
/// input was abandoned.
async fn join_worker<F>(
    reading: F,
    mut handle: JoinHandle<std::result::Result<ControllerMetrics, IndicatorError>>,
) -> Result<(ControllerMetrics, Option<Result<usize>>)>
where
    F: Future<Output = Result<usize>>,
{
    tokio::pin!(reading);

    let (published, joined) = tokio::select! {
        published = &mut reading => {
            // Reading owned the feed, so the worker now sees the source close
            let joined = handle.await;
            (Some(published), joined)
        }
        joined = &mut handle => {
            tracing::info!("Event loop stopped, no longer reading input");
            (None, joined)
        }
    };

    let metrics = joined.map_err(|e| IndicatorError::Worker(e.to_string()))??;
    Ok((metrics, published))
}

/// Publish from `file` (or stdin); the feed is dropped when input ends.
async fn read_input(
    file: Option<&str>,
    session: SessionKind,
    feed: ItemFeed,
    formatter: &Formatter,
) -> Result<usize> {
    match file {
        Some(path) => {
            let file = File::open(path).await?;
            feed_lines(BufReader::new(file), session, &feed, formatter).await
        }
        None => feed_lines(BufReader::new(tokio::io::stdin()), session, &feed, formatter).await,
    }
}

/// Parse one input line; blank lines yield `None`.
pub fn parse_line(line: &str, default_session: SessionKind) -> Result<Option<ItemChanged>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parsed: WatchLine = serde_json::from_str(line)?;
    let session = parsed.session.unwrap_or(default_session);
    Ok(Some(ItemChanged::from_host(session, &parsed.item)))
}

/// Read JSON lines and publish each as an item-changed event.
///
/// Malformed lines are reported and skipped. Returns the number of events
/// published.
pub async fn feed_lines<R>(
    reader: R,
    default_session: SessionKind,
    feed: &ItemFeed,
    formatter: &Formatter,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut published = 0;
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let event = match parse_line(&line, default_session) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(line = line_no, "Skipping malformed item payload: {}", e);
                eprintln!("{}", formatter.warning(&format!("line {}: {}", line_no, e)));
                continue;
            }
        };

        if formatter.format() == OutputFormat::Table {
            let word = event.item.token().map(|t| t.as_str());
            println!("{}", formatter.item_changed(event.session, word));
        }

        feed.send(event).await?;
        published += 1;
    }

    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::io::Write;
    use wkcommon_domain::DisplayedItem;
    use wkcommon_indicator::RecordingView;

    #[test]
    fn test_parse_vocabulary_line() {
        let event = parse_line(r#"{"voc": "大人", "meaning": "adult"}"#, SessionKind::Review)
            .unwrap()
            .unwrap();
        assert_eq!(event.session, SessionKind::Review);
        assert_eq!(event.item.token().map(|t| t.as_str()), Some("大人"));
    }

    #[test]
    fn test_parse_session_override() {
        let event = parse_line(r#"{"session": "lesson", "kun": ["ひと"]}"#, SessionKind::Review)
            .unwrap()
            .unwrap();
        assert_eq!(event.session, SessionKind::Lesson);
        assert_eq!(event.item, DisplayedItem::NonVocabulary);
    }

    #[test]
    fn test_parse_blank_and_invalid() {
        assert!(parse_line("   ", SessionKind::Review).unwrap().is_none());
        assert!(matches!(
            parse_line("not json", SessionKind::Review),
            Err(CliError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_feed_lines_skips_bad_lines() {
        let input = "{\"voc\": \"大人\"}\n\ngarbage\n{\"on\": \"じん\"}\n";
        let (feed, mut events) = ItemFeed::channel(8);
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let published = feed_lines(input.as_bytes(), SessionKind::Lesson, &feed, &formatter)
            .await
            .unwrap();
        drop(feed);

        assert_eq!(published, 2);
        let first = events.recv().await.unwrap();
        assert!(first.item.is_lookupable());
        assert_eq!(first.session, SessionKind::Lesson);
        let second = events.recv().await.unwrap();
        assert_eq!(second.item, DisplayedItem::NonVocabulary);
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_feed_lines_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"voc": "一人"}}"#).unwrap();
        writeln!(file, r#"{{"voc": "大人"}}"#).unwrap();

        let (feed, mut events) = ItemFeed::channel(8);
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let reader = BufReader::new(File::open(file.path()).await.unwrap());

        let published = feed_lines(reader, SessionKind::Review, &feed, &formatter)
            .await
            .unwrap();

        assert_eq!(published, 2);
        assert_eq!(
            events.recv().await.unwrap().item.token().map(|t| t.as_str()),
            Some("一人")
        );
    }

    async fn publish_then_fail(feed: ItemFeed) -> Result<usize> {
        feed.send(ItemChanged::new(SessionKind::Review, DisplayedItem::NonVocabulary))
            .await?;
        Err(CliError::InvalidInput("stream broke".to_string()))
    }

    #[tokio::test]
    async fn test_read_failure_still_waits_for_worker() {
        let app = IndicatorApp::with_transport(
            &Default::default(),
            StorageBackend::Memory,
            wkcommon_lookup::MockTransport::default(),
            RecordingView::new(),
        )
        .unwrap();
        let (feed, events) = ItemFeed::channel(8);
        let worker = app.worker();
        let handle = tokio::spawn(async move { worker.run(events).await });

        let (metrics, published) = join_worker(publish_then_fail(feed), handle).await.unwrap();
        assert_eq!(metrics.events, 1);
        assert_eq!(metrics.skipped, 1);
        assert!(matches!(published, Some(Err(CliError::InvalidInput(_)))));
    }

    #[tokio::test]
    async fn test_missing_input_file_is_an_error() {
        let args = WatchArgs {
            file: Some("/nonexistent/wkcommon/items.jsonl".to_string()),
            session: crate::cli::SessionArg::Review,
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_watch(args, &Config::default(), StorageBackend::Memory, &formatter).await;
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
