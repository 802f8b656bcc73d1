use serde::{Deserialize, Serialize};

use crate::domain::LogRecord;

/// Inbound payload for a retrieval-augmented question.
///
/// `query` stays optional at the wire level so a missing field surfaces as a
/// domain validation error (HTTP 400) instead of a deserializer rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
        }
    }
}

/// Successful answer envelope returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub llm_response: String,
    /// Top supporting records in retrieval order, bounded to three.
    pub similar_documents: Vec<LogRecord>,
    /// Wall-clock seconds from receipt to response.
    pub processing_time: f64,
}

/// Failure envelope paired with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
