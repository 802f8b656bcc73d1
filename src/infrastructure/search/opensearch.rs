//! Search adapter executing hybrid queries against an OpenSearch-compatible
//! vector store.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::application::services::LogSearcher;
use crate::domain::{DomainError, LogRecord, SearchRequest, MISSING_FIELD};
use crate::infrastructure::auth::CredentialProvider;

/// Executes shaped search requests against the store's `_search` endpoint
/// and decodes raw hits into typed records.
///
/// Results come back in the store's native ranking order; no re-ranking
/// happens here.
pub struct OpenSearchClient {
    endpoint: String,
    index: String,
    credentials: Arc<dyn CredentialProvider>,
    agent: ureq::Agent,
}

impl OpenSearchClient {
    pub fn new(
        endpoint: impl Into<String>,
        index: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Self {
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint,
            index: index.into(),
            credentials,
            agent,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.endpoint, self.index)
    }

    fn decode_hits(body: &Value) -> Result<Vec<LogRecord>, DomainError> {
        let hits = body["hits"]["hits"]
            .as_array()
            .ok_or_else(|| DomainError::retrieval("search response missing hits"))?;
        hits.iter().map(Self::decode_hit).collect()
    }

    fn decode_hit(hit: &Value) -> Result<LogRecord, DomainError> {
        let source = &hit["_source"];
        Ok(LogRecord {
            score: hit["_score"].as_f64().unwrap_or(0.0),
            timestamp: optional_text(source, "timestamp"),
            message: required_text(source, "message")?,
            service: required_text(source, "service")?,
            error_code: required_text(source, "error_code")?,
            vehicle_id: optional_text(source, "vehicle_id"),
            vehicle_state: optional_text(source, "vehicle_state"),
            sensor_readings: optional_object(source, "sensor_readings"),
            diagnostic_info: optional_object(source, "diagnostic_info"),
        })
    }
}

impl LogSearcher for OpenSearchClient {
    fn search(&self, request: &SearchRequest) -> Result<Vec<LogRecord>, DomainError> {
        debug!(
            k = request.k,
            filtered = request.window.is_some(),
            "executing vector search"
        );

        // Credentials are applied per call so rotated secrets take effect
        // on the next request.
        let http_request = self.credentials.apply(self.agent.post(&self.search_url()))?;
        let response = http_request
            .send_json(request.to_body())
            .map_err(|err| DomainError::retrieval(format!("search request failed: {err}")))?;

        let body: Value = response
            .into_json()
            .map_err(|err| DomainError::retrieval(format!("malformed search response: {err}")))?;

        let records = Self::decode_hits(&body)?;
        debug!(hits = records.len(), "search returned");
        Ok(records)
    }
}

fn required_text(source: &Value, field: &str) -> Result<String, DomainError> {
    source
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DomainError::retrieval(format!("hit missing required field `{field}`")))
}

fn optional_text(source: &Value, field: &str) -> String {
    source
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or(MISSING_FIELD)
        .to_string()
}

fn optional_object(source: &Value, field: &str) -> Value {
    source
        .get(field)
        .filter(|value| !value.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()))
}
