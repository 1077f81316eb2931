//! HTTP transport via reqwest

use crate::{Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Default timeout for dictionary requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// reqwest-backed `Transport`
///
/// Issues a single GET per request. The client-level timeout is the only
/// cancellation path; there is no retry.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wkcommon/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Communication(format!("Failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create a transport with the default timeout
    pub fn default_timeout() -> Result<Self, TransportError> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_decode() {
        TransportError::InvalidBody(error.to_string())
    } else {
        TransportError::Communication(error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, url: &str) -> Result<Value, TransportError> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(classify)
    }
}
