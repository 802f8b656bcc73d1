//! HTTP client for a hosted embedding model.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::application::services::EmbeddingEngine;
use crate::domain::{DomainError, EmbeddingRole};

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Client for an embedding endpoint speaking the `{texts, input_type}` wire
/// shape. Embeds one text per call; batching belongs to callers that need it.
pub struct RemoteEmbeddingClient {
    endpoint: String,
    dimensions: Option<usize>,
    agent: ureq::Agent,
}

impl RemoteEmbeddingClient {
    pub fn new(endpoint: impl Into<String>, dimensions: Option<usize>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint: endpoint.into(),
            dimensions,
            agent,
        }
    }
}

impl EmbeddingEngine for RemoteEmbeddingClient {
    fn embed(&self, text: &str, role: EmbeddingRole) -> Result<Vec<f32>, DomainError> {
        let payload = json!({
            "texts": [text],
            "input_type": role.as_str(),
        });

        let response = self
            .agent
            .post(&self.endpoint)
            .send_json(payload)
            .map_err(|err| DomainError::embedding(format!("embedding request failed: {err}")))?;

        let parsed: EmbeddingResponse = response
            .into_json()
            .map_err(|err| DomainError::embedding(format!("malformed embedding response: {err}")))?;

        let vector = parsed
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::embedding("embedding response contained no vectors"))?;
        if vector.is_empty() {
            return Err(DomainError::embedding("embedding model returned an empty vector"));
        }

        debug!(dimensions = vector.len(), "generated embedding");
        Ok(vector)
    }

    fn dims(&self) -> Option<usize> {
        self.dimensions
    }
}
