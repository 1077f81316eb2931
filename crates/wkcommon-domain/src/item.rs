//! Displayed item module - what the host application is currently showing

use crate::VocabularyToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which host session announced the item change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Review session (`currentItem` key)
    #[default]
    Review,

    /// Lesson session (`l/currentLesson` key)
    Lesson,
}

impl SessionKind {
    /// Host storage key that announces item changes for this session
    pub fn storage_key(&self) -> &'static str {
        match self {
            SessionKind::Review => "currentItem",
            SessionKind::Lesson => "l/currentLesson",
        }
    }

    /// Get the session name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Review => "review",
            SessionKind::Lesson => "lesson",
        }
    }
}

/// Raw item payload as published by the host application.
///
/// Only the fields relevant to eligibility are modelled; everything else in
/// the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostItem {
    /// Vocabulary field, present on vocabulary drills
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voc: Option<String>,

    /// On'yomi reading field, present on kanji (reading) drills
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Value>,

    /// Kun'yomi reading field, present on kanji (reading) drills
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kun: Option<Value>,
}

impl HostItem {
    /// Whether the payload carries a reading-only field
    pub fn has_reading_fields(&self) -> bool {
        is_set(self.on.as_ref()) || is_set(self.kun.as_ref())
    }
}

/// A reading field counts as present unless it is null, false or an empty string.
fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// The currently displayed item, classified once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DisplayedItem {
    /// A vocabulary drill; eligible for lookup
    Vocabulary(VocabularyToken),

    /// Anything else (kanji reading drill, radical, empty payload)
    NonVocabulary,
}

impl DisplayedItem {
    /// Token to look up, if the item is lookupable
    pub fn token(&self) -> Option<&VocabularyToken> {
        match self {
            DisplayedItem::Vocabulary(token) => Some(token),
            DisplayedItem::NonVocabulary => None,
        }
    }

    /// Whether this item is eligible for a commonality lookup
    pub fn is_lookupable(&self) -> bool {
        self.token().is_some()
    }
}

impl From<&HostItem> for DisplayedItem {
    fn from(item: &HostItem) -> Self {
        if item.has_reading_fields() {
            return DisplayedItem::NonVocabulary;
        }
        match item.voc.as_deref().map(VocabularyToken::new) {
            Some(Ok(token)) => DisplayedItem::Vocabulary(token),
            _ => DisplayedItem::NonVocabulary,
        }
    }
}

impl From<HostItem> for DisplayedItem {
    fn from(item: HostItem) -> Self {
        DisplayedItem::from(&item)
    }
}

/// One navigation event: the host switched to a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChanged {
    /// Session that published the change
    pub session: SessionKind,

    /// Classified item
    pub item: DisplayedItem,
}

impl ItemChanged {
    /// Create a new event
    pub fn new(session: SessionKind, item: DisplayedItem) -> Self {
        Self { session, item }
    }

    /// Classify a raw host payload into an event
    pub fn from_host(session: SessionKind, item: &HostItem) -> Self {
        Self::new(session, DisplayedItem::from(item))
    }
}
