//! Infrastructure layer wiring concrete adapters (embeddings, search,
//! generation, credentials).

pub mod auth;
pub mod embeddings;
pub mod generation;
pub mod search;

pub use auth::{Anonymous, BasicCredentials, BearerToken, CredentialProvider};
pub use embeddings::{RemoteEmbeddingClient, SimpleEmbedEngine};
pub use generation::ChatCompletionsClient;
pub use search::OpenSearchClient;
