//! wkcommon Lookup Layer
//!
//! Queries the Jisho dictionary API for whether a vocabulary word is common.
//!
//! # Architecture
//!
//! The lookup service never touches the cache; it is a pure query primitive
//! over an injected `Transport`. Exactly one request is made per lookup and
//! failures are never retried.
//!
//! # Transports
//!
//! - `ReqwestTransport`: HTTP GET via reqwest with a request timeout
//! - `MockTransport`: Deterministic canned responses for testing
//!
//! # Examples
//!
//! ```
//! use wkcommon_lookup::{JishoLookup, MockTransport};
//! use wkcommon_domain::VocabularyToken;
//!
//! # tokio_test_block_on(async {
//! let transport = MockTransport::default();
//! transport.add_response("大人", MockTransport::search_body(&[true]));
//!
//! let lookup = JishoLookup::new(transport, "https://jisho.org/api/v1/search/words");
//! let token = VocabularyToken::new("大人").unwrap();
//! assert!(lookup.lookup(&token).await.unwrap().verdict());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod jisho;
pub mod mock;
pub mod transport;

pub use jisho::{JishoLookup, LookupOutcome, DEFAULT_ENDPOINT, DEFAULT_SEARCH_PAGE};
pub use mock::MockTransport;
pub use transport::{ReqwestTransport, DEFAULT_TIMEOUT_SECS};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network or connection failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request did not complete within the timeout
    #[error("Request timed out")]
    Timeout,

    /// Server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// Body was not valid JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Errors that can occur during a lookup
#[derive(Error, Debug)]
pub enum LookupError {
    /// The request could not be completed
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The configured endpoint is not a valid URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// GET-only JSON transport capability
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and parse the body as JSON
    async fn request(&self, url: &str) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, url: &str) -> Result<Value, TransportError> {
        (**self).request(url).await
    }
}
