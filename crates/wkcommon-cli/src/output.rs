//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde::Serialize;
use wkcommon_domain::traits::IndicatorView;
use wkcommon_domain::{CommonalityVerdict, IndicatorState, SessionKind};
use wkcommon_indicator::{ControllerMetrics, HandleOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// One checked word, as reported by `check` and the REPL.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRow {
    /// The word as entered
    pub word: String,

    /// Indicator state after handling
    pub state: IndicatorState,

    /// Where the verdict came from
    pub source: &'static str,

    /// Search page for the word
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl CheckRow {
    /// Build a row from a handling outcome.
    pub fn new(word: impl Into<String>, outcome: HandleOutcome, link: Option<String>) -> Self {
        let (state, source) = match outcome {
            HandleOutcome::Skipped => (IndicatorState::Hidden, "skipped"),
            HandleOutcome::CacheHit(v) => (IndicatorState::from_verdict(v), "cache"),
            HandleOutcome::Resolved(v) | HandleOutcome::Superseded(v) => {
                (IndicatorState::from_verdict(v), "lookup")
            }
            HandleOutcome::Failed => (IndicatorState::Fetching, "failed"),
        };
        Self {
            word: word.into(),
            state,
            source,
            link,
        }
    }
}

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format check results.
    pub fn format_rows(&self, rows: &[CheckRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Table => Ok(self.format_rows_table(rows)),
            OutputFormat::Quiet => Ok(rows
                .iter()
                .map(|r| r.state.css_class())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_rows_table(&self, rows: &[CheckRow]) -> String {
        if rows.is_empty() {
            return self.colorize("No words checked.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Word", "Indicator", "Source", "Link"]);

        for row in rows {
            let indicator = self.indicator(row.state);
            builder.push_record([
                row.word.as_str(),
                indicator.as_str(),
                row.source,
                row.link.as_deref().unwrap_or(""),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Render an indicator state the way the badge would read.
    pub fn indicator(&self, state: IndicatorState) -> String {
        let text = match state {
            IndicatorState::Hidden => "-",
            other => other.label(),
        };
        if !self.color_enabled {
            return text.to_string();
        }

        match state {
            IndicatorState::Common => text.truecolor(161, 0, 241).bold().to_string(),
            IndicatorState::Uncommon => text.dimmed().to_string(),
            IndicatorState::Fetching => text.yellow().to_string(),
            IndicatorState::Hidden => text.to_string(),
        }
    }

    /// One line per indicator transition, used by `watch`.
    pub fn transition(&self, state: IndicatorState) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
                "state": state,
                "class": state.css_class(),
                "label": state.label(),
            }))?),
            OutputFormat::Table => Ok(format!("indicator: {}", self.indicator(state))),
            OutputFormat::Quiet => Ok(state.css_class().to_string()),
        }
    }

    /// Announce an item change read by `watch`.
    pub fn item_changed(&self, session: SessionKind, word: Option<&str>) -> String {
        let what = word.unwrap_or("(not vocabulary)");
        self.colorize(&format!("→ {} [{}]", what, session.as_str()), "cyan")
    }

    /// Format the controller metrics; empty in quiet mode.
    ///
    /// JSON stays on one line so `watch` output remains valid JSON lines.
    pub fn metrics(&self, metrics: &ControllerMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
                "metrics": metrics
            }))?),
            OutputFormat::Table => Ok(metrics.summary()),
            OutputFormat::Quiet => Ok(String::new()),
        }
    }

    /// Format a cached verdict lookup.
    pub fn cached_verdict(&self, word: &str, verdict: Option<CommonalityVerdict>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "word": word,
                "cached": verdict.is_some(),
                "is_common": verdict,
            }))?),
            OutputFormat::Quiet => Ok(match verdict {
                Some(v) => IndicatorState::from_verdict(v).css_class().to_string(),
                None => String::new(),
            }),
            OutputFormat::Table => Ok(match verdict {
                Some(v) => format!("{}: {}", word, self.indicator(IndicatorState::from_verdict(v))),
                None => self.info(&format!("{} is not cached", word)),
            }),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Indicator view that prints every transition to stdout.
#[derive(Debug, Clone, Copy)]
pub struct TerminalView {
    formatter: Formatter,
}

impl TerminalView {
    /// Create a view printing with `formatter`.
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }

    fn print(&self, state: IndicatorState) {
        match self.formatter.transition(state) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Failed to render indicator state: {}", e),
        }
    }
}

impl IndicatorView for TerminalView {
    fn show_hidden(&self) {
        self.print(IndicatorState::Hidden);
    }

    fn show_fetching(&self) {
        self.print(IndicatorState::Fetching);
    }

    fn show_verdict(&self, verdict: CommonalityVerdict) {
        self.print(IndicatorState::from_verdict(verdict));
    }
}
