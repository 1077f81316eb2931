//! Deterministic transport for testing
//!
//! Returns canned bodies keyed by the `keyword` query parameter, without
//! making any network calls.

use crate::{Transport, TransportError};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Canned {
    Body(Value),
    Error(TransportError),
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, Canned>,
    delays: HashMap<String, Duration>,
    calls: Vec<String>,
}

/// Mock transport for deterministic testing
///
/// Unknown keywords get an empty search result. Clones share state, so a test
/// can keep a handle to inspect calls after moving one into a lookup service.
///
/// # Examples
///
/// ```
/// use wkcommon_lookup::{MockTransport, TransportError};
///
/// let transport = MockTransport::default();
/// transport.add_response("大人", MockTransport::search_body(&[true]));
/// transport.add_error("一人", TransportError::Timeout);
/// assert_eq!(transport.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Build a search API body whose records carry the given flags
    pub fn search_body(flags: &[bool]) -> Value {
        let data: Vec<Value> = flags
            .iter()
            .enumerate()
            .map(|(i, flag)| json!({"slug": format!("result-{}", i), "is_common": flag}))
            .collect();
        json!({"meta": {"status": 200}, "data": data})
    }

    /// Respond to `keyword` with `body`
    pub fn add_response(&self, keyword: impl Into<String>, body: Value) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(keyword.into(), Canned::Body(body));
    }

    /// Fail requests for `keyword` with `error`
    pub fn add_error(&self, keyword: impl Into<String>, error: TransportError) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(keyword.into(), Canned::Error(error));
    }

    /// Delay responses for `keyword`
    pub fn add_delay(&self, keyword: impl Into<String>, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(keyword.into(), delay);
    }

    /// Number of requests made so far
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Keywords requested, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Forget recorded calls
    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

fn keyword_of(url: &str) -> Result<String, TransportError> {
    let url = Url::parse(url).map_err(|e| TransportError::Communication(e.to_string()))?;
    Ok(url
        .query_pairs()
        .find(|(name, _)| name == "keyword")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default())
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, url: &str) -> Result<Value, TransportError> {
        let keyword = keyword_of(url)?;

        let (canned, delay) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(keyword.clone());
            (
                state.responses.get(&keyword).cloned(),
                state.delays.get(&keyword).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Error(error)) => Err(error),
            None => Ok(Self::search_body(&[])),
        }
    }
}
