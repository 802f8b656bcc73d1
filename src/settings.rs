use std::str::FromStr;
use std::time::Duration;

/// Default dimension of the dense vector field; must match the index mapping.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 60;
const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Embedding backends compiled into the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Hosted embedding model reachable over HTTP.
    Remote { endpoint: String, dimensions: usize },
    /// Lightweight deterministic hash embedder (always available).
    Simple { dimensions: usize },
}

impl Default for EmbeddingBackend {
    fn default() -> Self {
        EmbeddingBackend::Simple {
            dimensions: DEFAULT_EMBEDDING_DIM,
        }
    }
}

/// Runtime configuration resolved from environment variables.
///
/// Every field has a default suitable for a local single-node setup, so the
/// binary starts with no configuration at all.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bind address for the HTTP service (`FLEETRAG_SERVICE_HOST`).
    pub host: String,
    /// Bind port (`FLEETRAG_SERVICE_PORT`).
    pub port: u16,

    /// Vector store base URL (`FLEETRAG_SEARCH_URL`).
    pub search_endpoint: String,
    /// Index holding the log documents (`FLEETRAG_SEARCH_INDEX`).
    pub search_index: String,
    /// Bearer token for the store (`FLEETRAG_SEARCH_API_KEY`).
    pub search_api_key: Option<String>,
    /// Basic-auth pair (`FLEETRAG_SEARCH_USERNAME` / `FLEETRAG_SEARCH_PASSWORD`).
    pub search_username: Option<String>,
    pub search_password: Option<String>,
    pub search_timeout: Duration,

    /// Embedding backend; `FLEETRAG_EMBEDDING_URL` selects the remote one.
    pub embedding: EmbeddingBackend,
    pub embedding_timeout: Duration,

    /// Generation endpoint base URL (`FLEETRAG_GENERATION_URL`).
    pub generation_url: String,
    /// Model name sent with every completion request
    /// (`FLEETRAG_GENERATION_MODEL`).
    pub generation_model: String,
    pub generation_timeout: Duration,

    /// Candidates retrieved per query (`FLEETRAG_SEARCH_K`).
    pub k: usize,
    /// Dense vector field in the index mapping (`FLEETRAG_VECTOR_FIELD`).
    pub vector_field: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            search_endpoint: "http://127.0.0.1:9200".into(),
            search_index: "error-logs".into(),
            search_api_key: None,
            search_username: None,
            search_password: None,
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            embedding: EmbeddingBackend::default(),
            embedding_timeout: Duration::from_secs(DEFAULT_EMBEDDING_TIMEOUT_SECS),
            generation_url: "http://127.0.0.1:8000".into(),
            generation_model: "NousResearch/Meta-Llama-3-8B-Instruct".into(),
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            k: 5,
            vector_field: "message_embedding".into(),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Settings::default();

        let dimensions = env_parse("FLEETRAG_EMBEDDING_DIM", DEFAULT_EMBEDDING_DIM);
        let embedding = match env_var("FLEETRAG_EMBEDDING_URL") {
            Some(endpoint) => EmbeddingBackend::Remote {
                endpoint,
                dimensions,
            },
            None => EmbeddingBackend::Simple { dimensions },
        };

        Self {
            host: env_var("FLEETRAG_SERVICE_HOST").unwrap_or(defaults.host),
            port: env_parse("FLEETRAG_SERVICE_PORT", defaults.port),
            search_endpoint: env_var("FLEETRAG_SEARCH_URL").unwrap_or(defaults.search_endpoint),
            search_index: env_var("FLEETRAG_SEARCH_INDEX").unwrap_or(defaults.search_index),
            search_api_key: env_var("FLEETRAG_SEARCH_API_KEY"),
            search_username: env_var("FLEETRAG_SEARCH_USERNAME"),
            search_password: env_var("FLEETRAG_SEARCH_PASSWORD"),
            search_timeout: Duration::from_secs(env_parse(
                "FLEETRAG_SEARCH_TIMEOUT_SECS",
                DEFAULT_SEARCH_TIMEOUT_SECS,
            )),
            embedding,
            embedding_timeout: Duration::from_secs(env_parse(
                "FLEETRAG_EMBEDDING_TIMEOUT_SECS",
                DEFAULT_EMBEDDING_TIMEOUT_SECS,
            )),
            generation_url: env_var("FLEETRAG_GENERATION_URL").unwrap_or(defaults.generation_url),
            generation_model: env_var("FLEETRAG_GENERATION_MODEL")
                .unwrap_or(defaults.generation_model),
            generation_timeout: Duration::from_secs(env_parse(
                "FLEETRAG_GENERATION_TIMEOUT_SECS",
                DEFAULT_GENERATION_TIMEOUT_SECS,
            )),
            k: env_parse("FLEETRAG_SEARCH_K", defaults.k).max(1),
            vector_field: env_var("FLEETRAG_VECTOR_FIELD").unwrap_or(defaults.vector_field),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr + Copy>(name: &str, default: T) -> T {
    env_var(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
