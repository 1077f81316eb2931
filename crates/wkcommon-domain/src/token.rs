//! Vocabulary token - the lookup key

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque vocabulary string, e.g. `大人`.
///
/// Used verbatim as both the cache key and the lookup query parameter.
/// Equality is exact string equality; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabularyToken(String);

impl VocabularyToken {
    /// Create a new token.
    ///
    /// # Errors
    /// Returns error if the token is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.is_empty() {
            return Err("Vocabulary token cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Get token as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VocabularyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for VocabularyToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
