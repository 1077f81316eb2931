//! wkcommon Domain Layer
//!
//! Core vocabulary and capability traits for the common-vocabulary indicator.
//! Infrastructure (storage, HTTP, rendering) lives in other crates and plugs in
//! through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **VocabularyToken**: the word being looked up; also the cache key
//! - **CommonalityVerdict**: `true` if the word is common, `false` otherwise
//! - **DisplayedItem**: what the host is currently showing, decided once at the
//!   boundary as either a vocabulary drill or not
//! - **IndicatorState**: the four visual states of the indicator widget
//!
//! ## Architecture
//!
//! - Pure domain types, no I/O
//! - Trait definitions for all external capabilities (`traits`, `clock`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod indicator;
pub mod item;
pub mod token;
pub mod traits;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use indicator::IndicatorState;
pub use item::{DisplayedItem, HostItem, ItemChanged, SessionKind};
pub use token::VocabularyToken;

/// Whether a vocabulary token is common.
///
/// "Unknown" results are collapsed to `false` before they reach this type.
pub type CommonalityVerdict = bool;
