//! Jisho commonality lookup
//!
//! Issues `GET {endpoint}?keyword={token}` and reads `data[0].is_common`.

use crate::{LookupError, Transport};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use wkcommon_domain::{CommonalityVerdict, VocabularyToken};

/// Default word search API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://jisho.org/api/v1/search/words";

/// Default human-facing search page
pub const DEFAULT_SEARCH_PAGE: &str = "https://jisho.org/search/";

/// Result of a single lookup before unknowns are collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The top-ranked record carried a commonality flag
    Found {
        /// Whether the word is common
        is_common: bool,
    },

    /// No usable record in the response
    NotFound,
}

impl LookupOutcome {
    /// Collapse to a verdict; not found means not common
    pub fn verdict(&self) -> CommonalityVerdict {
        match self {
            LookupOutcome::Found { is_common } => *is_common,
            LookupOutcome::NotFound => false,
        }
    }
}

/// Response shape of the word search API
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Value>,
}

/// Normalize a response body
///
/// Only the first record is ever consulted.
pub fn normalize(body: &Value) -> LookupOutcome {
    let response = match SearchResponse::deserialize(body) {
        Ok(response) => response,
        Err(_) => return LookupOutcome::NotFound,
    };

    match response.data.first() {
        None | Some(Value::Null) => LookupOutcome::NotFound,
        Some(record) => LookupOutcome::Found {
            is_common: truthy(record.get("is_common")),
        },
    }
}

/// Loose boolean reading of a JSON flag
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Commonality lookup service
///
/// Cache-agnostic: callers decide what to do with the verdict.
pub struct JishoLookup<T> {
    transport: T,
    endpoint: String,
    search_page: String,
}

impl<T: Transport> JishoLookup<T> {
    /// Create a lookup service against `endpoint`
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            search_page: DEFAULT_SEARCH_PAGE.to_string(),
        }
    }

    /// Set the base URL used by `search_page_url`
    pub fn with_search_page(mut self, search_page: impl Into<String>) -> Self {
        self.search_page = search_page.into();
        self
    }

    /// Build the API request URL for `token`
    pub fn request_url(&self, token: &VocabularyToken) -> Result<Url, LookupError> {
        Url::parse_with_params(&self.endpoint, &[("keyword", token.as_str())])
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", self.endpoint, e)))
    }

    /// Link to the human-facing search page for `token`
    pub fn search_page_url(&self, token: &VocabularyToken) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.search_page)
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", self.search_page, e)))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidUrl(self.search_page.clone()))?
            .pop_if_empty()
            .push(token.as_str());
        Ok(url)
    }

    /// Look up whether `token` is common
    ///
    /// A token the service does not know comes back as `NotFound`, whose
    /// verdict is `false`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or times out. No retry is attempted.
    pub async fn lookup(&self, token: &VocabularyToken) -> Result<LookupOutcome, LookupError> {
        let url = self.request_url(token)?;
        tracing::debug!(%token, %url, "querying dictionary");

        let body = self.transport.request(url.as_str()).await?;
        let outcome = normalize(&body);
        if outcome == LookupOutcome::NotFound {
            tracing::warn!(%token, "word not found, defaulting to not common");
        }
        Ok(outcome)
    }
}
