//! Mock terminology client for testing
//!
//! Serves canned documents per endpoint and input without network access and
//! counts calls so tests can assert cache behavior.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Endpoint, FetchResult, TerminologyApi};
use crate::error::ApiError;

/// Canned reply for one request
#[derive(Debug, Clone)]
enum MockReply {
    Json(Value),
    Status(u16),
    Timeout,
}

impl MockReply {
    fn to_result(&self) -> FetchResult {
        match self {
            MockReply::Json(doc) => Ok(doc.clone()),
            MockReply::Status(status) => Err(ApiError::Status { status: *status }),
            MockReply::Timeout => Err(ApiError::Timeout),
        }
    }
}

/// Mock API client for testing.
///
/// Requests with no configured reply get a 404, like RxNav for an unknown path.
///
/// # Example
/// ```ignore
/// let mock = MockTerminologyClient::new()
///     .with_status("123", status_response("Active"))
///     .await;
/// ```
#[derive(Default)]
pub struct MockTerminologyClient {
    /// Replies keyed by endpoint and exact input
    replies: Arc<Mutex<HashMap<(Endpoint, String), MockReply>>>,
    /// Replies for any input on an endpoint
    fallbacks: Arc<Mutex<HashMap<Endpoint, MockReply>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CallCounts {
    pub drugs: usize,
    pub history_status: usize,
    pub status: usize,
    pub properties: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.drugs + self.history_status + self.status + self.properties
    }
}

impl MockTerminologyClient {
    pub fn new() -> Self {
        Self::default()
    }

    async fn reply(self, endpoint: Endpoint, input: &str, reply: MockReply) -> Self {
        self.replies
            .lock()
            .await
            .insert((endpoint, input.to_string()), reply);
        self
    }

    /// Configure the `drugs.json` document for a search name.
    pub async fn with_drugs(self, name: &str, doc: Value) -> Self {
        self.reply(Endpoint::Drugs, name, MockReply::Json(doc)).await
    }

    /// Configure the `historystatus.json` document for an rxcui.
    pub async fn with_history(self, rxcui: &str, doc: Value) -> Self {
        self.reply(Endpoint::HistoryStatus, rxcui, MockReply::Json(doc))
            .await
    }

    /// Configure the `status.json` document for an rxcui.
    pub async fn with_status(self, rxcui: &str, doc: Value) -> Self {
        self.reply(Endpoint::Status, rxcui, MockReply::Json(doc)).await
    }

    /// Configure the `properties.json` document for an rxcui.
    pub async fn with_properties(self, rxcui: &str, doc: Value) -> Self {
        self.reply(Endpoint::Properties, rxcui, MockReply::Json(doc))
            .await
    }

    /// Answer every input on `endpoint` with `doc`.
    pub async fn with_fallback(self, endpoint: Endpoint, doc: Value) -> Self {
        self.fallbacks
            .lock()
            .await
            .insert(endpoint, MockReply::Json(doc));
        self
    }

    /// Fail `endpoint` for `input` with an HTTP status.
    pub async fn with_http_error(self, endpoint: Endpoint, input: &str, status: u16) -> Self {
        self.reply(endpoint, input, MockReply::Status(status)).await
    }

    /// Fail `endpoint` for `input` with a timeout.
    pub async fn with_timeout(self, endpoint: Endpoint, input: &str) -> Self {
        self.reply(endpoint, input, MockReply::Timeout).await
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    async fn respond(&self, endpoint: Endpoint, input: &str) -> FetchResult {
        {
            let mut counts = self.call_count.lock().await;
            match endpoint {
                Endpoint::Drugs => counts.drugs += 1,
                Endpoint::HistoryStatus => counts.history_status += 1,
                Endpoint::Status => counts.status += 1,
                Endpoint::Properties => counts.properties += 1,
            }
        }

        let exact = self
            .replies
            .lock()
            .await
            .get(&(endpoint, input.to_string()))
            .cloned();
        let reply = match exact {
            Some(reply) => Some(reply),
            None => self.fallbacks.lock().await.get(&endpoint).cloned(),
        };

        reply
            .map(|r| r.to_result())
            .unwrap_or(Err(ApiError::Status { status: 404 }))
    }
}

#[async_trait]
impl TerminologyApi for MockTerminologyClient {
    async fn fetch_drugs_by_name(&self, name: &str) -> FetchResult {
        self.respond(Endpoint::Drugs, name).await
    }

    async fn fetch_history_status(&self, rxcui: &str) -> FetchResult {
        self.respond(Endpoint::HistoryStatus, rxcui).await
    }

    async fn fetch_status(&self, rxcui: &str) -> FetchResult {
        self.respond(Endpoint::Status, rxcui).await
    }

    async fn fetch_properties(&self, rxcui: &str) -> FetchResult {
        self.respond(Endpoint::Properties, rxcui).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::status_response;

    #[tokio::test]
    async fn test_mock_returns_configured_document() {
        let mock = MockTerminologyClient::new()
            .with_status("1", status_response("Active"))
            .await;

        let doc = mock.fetch_status("1").await.unwrap();
        assert_eq!(doc["rxcuiStatus"]["status"], "Active");
    }

    #[tokio::test]
    async fn test_mock_unconfigured_is_not_found() {
        let mock = MockTerminologyClient::new();
        let err = mock.fetch_properties("1").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn test_mock_fallback_and_exact_precedence() {
        let mock = MockTerminologyClient::new()
            .with_fallback(Endpoint::Status, status_response("Retired"))
            .await
            .with_status("2", status_response("Active"))
            .await;

        assert_eq!(mock.fetch_status("1").await.unwrap()["rxcuiStatus"]["status"], "Retired");
        assert_eq!(mock.fetch_status("2").await.unwrap()["rxcuiStatus"]["status"], "Active");
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockTerminologyClient::new()
            .with_timeout(Endpoint::Drugs, "x")
            .await;

        let _ = mock.fetch_drugs_by_name("x").await;
        let _ = mock.fetch_status("1").await;
        let _ = mock.fetch_status("1").await;

        let counts = mock.call_counts().await;
        assert_eq!(counts.drugs, 1);
        assert_eq!(counts.status, 2);
        assert_eq!(counts.total(), 3);
    }
}
