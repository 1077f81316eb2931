//! Indicator state module - the four visual states of the widget

use crate::CommonalityVerdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual state of the commonality indicator
///
/// Purely derived; held by the view and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorState {
    /// Nothing shown (non-vocabulary item)
    #[default]
    Hidden,

    /// Lookup in flight
    Fetching,

    /// Word is common
    Common,

    /// Word is not common, or unknown
    Uncommon,
}

impl IndicatorState {
    /// Map a verdict to its display state
    pub fn from_verdict(verdict: CommonalityVerdict) -> Self {
        if verdict {
            IndicatorState::Common
        } else {
            IndicatorState::Uncommon
        }
    }

    /// CSS class applied to the widget
    pub fn css_class(&self) -> &'static str {
        match self {
            IndicatorState::Hidden => "hide",
            IndicatorState::Fetching => "fetching",
            IndicatorState::Common => "common",
            IndicatorState::Uncommon => "uncommon",
        }
    }

    /// Label text rendered inside the widget
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorState::Hidden => "",
            IndicatorState::Fetching => "...",
            IndicatorState::Common => "common",
            IndicatorState::Uncommon => "not common",
        }
    }

    /// The verdict this state displays, if any
    pub fn verdict(&self) -> Option<CommonalityVerdict> {
        match self {
            IndicatorState::Common => Some(true),
            IndicatorState::Uncommon => Some(false),
            IndicatorState::Hidden | IndicatorState::Fetching => None,
        }
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}
