use std::sync::Arc;

use anyhow::{Context, Result};

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod settings;

use application::services::{EmbeddingEngine, GenerationEngine, LogSearcher, ServiceConfig};
use application::QueryService;
use infrastructure::{
    Anonymous, BasicCredentials, BearerToken, ChatCompletionsClient, CredentialProvider,
    OpenSearchClient, RemoteEmbeddingClient, SimpleEmbedEngine,
};
use settings::{EmbeddingBackend, Settings};
use tracing::info;

/// Fully-wired handles shared with the HTTP layer.
pub struct AppHandles {
    pub service: Arc<QueryService>,
    pub settings: Settings,
}

/// Construct the query service and its adapters from `settings`.
pub fn build_environment(settings: Settings) -> Result<AppHandles> {
    let embedder = init_embedder(&settings).context("failed to initialise embedding backend")?;
    let credentials = init_credentials(&settings);

    let searcher: Arc<dyn LogSearcher> = Arc::new(OpenSearchClient::new(
        settings.search_endpoint.as_str(),
        settings.search_index.as_str(),
        credentials,
        settings.search_timeout,
    ));
    let generator: Arc<dyn GenerationEngine> = Arc::new(ChatCompletionsClient::new(
        settings.generation_url.as_str(),
        settings.generation_model.as_str(),
        settings.generation_timeout,
    ));

    let config = ServiceConfig {
        vector_field: settings.vector_field.clone(),
        k: settings.k,
        ..ServiceConfig::default()
    };
    let service = Arc::new(QueryService::new(embedder, searcher, generator, config));
    if let Some(dimensions) = service.embedding_dimensions() {
        info!(dimensions, "embedding backend ready");
    }

    Ok(AppHandles { service, settings })
}

fn init_embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingEngine>> {
    match &settings.embedding {
        EmbeddingBackend::Remote {
            endpoint,
            dimensions,
        } => {
            info!(endpoint = %endpoint, "using remote embedding backend");
            Ok(Arc::new(RemoteEmbeddingClient::new(
                endpoint.as_str(),
                Some(*dimensions),
                settings.embedding_timeout,
            )))
        }
        EmbeddingBackend::Simple { dimensions } => {
            info!(dimensions, "using deterministic hash embedding backend");
            Ok(Arc::new(SimpleEmbedEngine::try_new(*dimensions)?))
        }
    }
}

fn init_credentials(settings: &Settings) -> Arc<dyn CredentialProvider> {
    if let Some(token) = &settings.search_api_key {
        return Arc::new(BearerToken::new(token.as_str()));
    }
    if let (Some(username), Some(password)) =
        (&settings.search_username, &settings.search_password)
    {
        return Arc::new(BasicCredentials::new(username.as_str(), password.as_str()));
    }
    Arc::new(Anonymous)
}

/// Install the global tracing subscriber once, honoring `FLEETRAG_LOG`.
pub fn init_tracing() {
    static INIT: std::sync::OnceLock<()> = std::sync::OnceLock::new();

    let _ = INIT.get_or_init(|| {
        let filter = std::env::var("FLEETRAG_LOG").unwrap_or_else(|_| "info".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init();
    });
}
