//! In-memory indicator view

use std::sync::{Arc, Mutex, PoisonError};
use wkcommon_domain::traits::IndicatorView;
use wkcommon_domain::{CommonalityVerdict, IndicatorState};

/// View that records every state it is asked to show
///
/// Clones share the same history. Useful for tests and for headless runs
/// where the final state is read back after handling.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    history: Arc<Mutex<Vec<IndicatorState>>>,
}

impl RecordingView {
    /// Create a view in the Hidden state with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently displayed state
    pub fn current(&self) -> IndicatorState {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
            .unwrap_or_default()
    }

    /// Every state shown so far, oldest first
    pub fn history(&self) -> Vec<IndicatorState> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, state: IndicatorState) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state);
    }
}

impl IndicatorView for RecordingView {
    fn show_hidden(&self) {
        self.push(IndicatorState::Hidden);
    }

    fn show_fetching(&self) {
        self.push(IndicatorState::Fetching);
    }

    fn show_verdict(&self, verdict: CommonalityVerdict) {
        self.push(IndicatorState::from_verdict(verdict));
    }
}
