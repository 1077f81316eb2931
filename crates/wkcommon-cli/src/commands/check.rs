//! Check command implementation.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::{CheckRow, Formatter};
use wkcommon_domain::traits::IndicatorView;
use wkcommon_domain::VocabularyToken;
use wkcommon_indicator::{AppController, IndicatorApp, RecordingView, StorageBackend};
use wkcommon_lookup::Transport;

/// Execute the check command.
pub async fn execute_check(
    args: CheckArgs,
    config: &Config,
    backend: StorageBackend,
    formatter: &Formatter,
) -> Result<()> {
    let app = IndicatorApp::build(&config.indicator, backend, RecordingView::new())?;
    let rows = check_words(app.controller(), &args.words).await?;

    println!("{}", formatter.format_rows(&rows)?);
    Ok(())
}

/// Run each word through the controller, in order.
///
/// Words are validated up front so a bad entry fails before any lookup.
pub async fn check_words<V, T>(controller: &AppController<V, T>, words: &[String]) -> Result<Vec<CheckRow>>
where
    V: IndicatorView,
    T: Transport,
{
    let tokens = words
        .iter()
        .map(|w| {
            VocabularyToken::new(w.trim())
                .map_err(|e| CliError::InvalidInput(format!("'{}': {}", w, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(tokens.len());
    for token in tokens {
        let outcome = controller.check(&token).await;
        let link = match controller.lookup().search_page_url(&token) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::debug!("No search page link for {}: {}", token, e);
                None
            }
        };
        rows.push(CheckRow::new(token.as_str(), outcome, link));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wkcommon_domain::IndicatorState;
    use wkcommon_indicator::IndicatorConfig;
    use wkcommon_lookup::{MockTransport, TransportError};

    fn app(transport: MockTransport) -> IndicatorApp<RecordingView, MockTransport> {
        IndicatorApp::with_transport(
            &IndicatorConfig::default(),
            StorageBackend::Memory,
            transport,
            RecordingView::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_check_words_reports_sources() {
        let transport = MockTransport::default();
        transport.add_response("大人", MockTransport::search_body(&[true]));
        transport.add_error("一人", TransportError::Timeout);
        let app = app(transport);

        let words = vec!["大人".to_string(), "大人".to_string(), "一人".to_string()];
        let rows = check_words(app.controller(), &words).await.unwrap();

        assert_eq!(rows[0].source, "lookup");
        assert_eq!(rows[0].state, IndicatorState::Common);
        assert_eq!(rows[1].source, "cache");
        assert_eq!(rows[2].state, IndicatorState::Fetching);
        assert_eq!(
            rows[0].link.as_deref(),
            Some("https://jisho.org/search/%E5%A4%A7%E4%BA%BA")
        );
    }

    #[tokio::test]
    async fn test_blank_word_rejected_before_lookup() {
        let transport = MockTransport::default();
        let app = app(transport.clone());

        let words = vec!["大人".to_string(), "  ".to_string()];
        let result = check_words(app.controller(), &words).await;

        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert_eq!(transport.call_count(), 0);
    }
}
