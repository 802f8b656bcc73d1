//! Per-request credential application for outbound store calls.
//!
//! The vector store may sit behind rotating credentials, so providers are
//! consulted on every call rather than once at client construction.

use base64::Engine;

use crate::domain::DomainError;

/// Attaches credentials to an outbound request.
pub trait CredentialProvider: Send + Sync {
    /// Attach fresh credentials to `request`. Invoked once per call so
    /// rotated credentials are picked up without restarting the service.
    fn apply(&self, request: ureq::Request) -> Result<ureq::Request, DomainError>;
}

/// No authentication (local or network-policied deployments).
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn apply(&self, request: ureq::Request) -> Result<ureq::Request, DomainError> {
        Ok(request)
    }
}

/// Static bearer token, e.g. an API key.
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for BearerToken {
    fn apply(&self, request: ureq::Request) -> Result<ureq::Request, DomainError> {
        Ok(request.set("Authorization", &format!("Bearer {}", self.token)))
    }
}

/// HTTP basic credentials for stores exposing username/password auth.
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialProvider for BasicCredentials {
    fn apply(&self, request: ureq::Request) -> Result<ureq::Request, DomainError> {
        let raw = format!("{}:{}", self.username, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
        Ok(request.set("Authorization", &format!("Basic {encoded}")))
    }
}
