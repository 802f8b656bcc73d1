use thiserror::Error;

/// Domain-level errors shared across application components.
///
/// Each remote stage of the pipeline owns one variant so callers can assert
/// on exactly which stage failed. Temporal-parse anomalies never surface
/// here; the parser degrades to "no filter" instead.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The incoming payload missed a required field or violated invariants.
    #[error("validation error: {0}")]
    Validation(String),

    /// The embedding model call failed or returned an unusable vector.
    #[error("embedding failure: {0}")]
    Embedding(String),

    /// The vector store search failed (transport, auth, missing index).
    #[error("retrieval failure: {0}")]
    Retrieval(String),

    /// The generation model call failed or returned no answer.
    #[error("generation failure: {0}")]
    Generation(String),

    /// The service was started with an unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other unexpected failure.
    #[error("unexpected error: {0}")]
    Other(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether the failure is the caller's fault rather than a pipeline stage's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}
