use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::dtos::{QueryRequest, QueryResponse};
use crate::application::services::context::assemble_context;
use crate::domain::{parse_temporal_window, DomainError, EmbeddingRole, LogRecord, SearchRequest};

/// High level configuration shared by the service and its adapters.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Name of the dense vector field in the index.
    pub vector_field: String,
    /// How many candidates the store returns per query.
    pub k: usize,
    /// How many records are echoed back to the caller.
    pub top_documents: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vector_field: "message_embedding".into(),
            k: 5,
            top_documents: 3,
        }
    }
}

/// Abstraction over any embedding backend (remote model endpoint, offline
/// hash engine, test fakes).
pub trait EmbeddingEngine: Send + Sync {
    fn embed(&self, text: &str, role: EmbeddingRole) -> Result<Vec<f32>, DomainError>;

    fn dims(&self) -> Option<usize> {
        None
    }
}

/// Contract for executing a shaped search request against the vector store.
pub trait LogSearcher: Send + Sync {
    fn search(&self, request: &SearchRequest) -> Result<Vec<LogRecord>, DomainError>;
}

/// Contract for producing the grounded natural-language answer.
pub trait GenerationEngine: Send + Sync {
    fn generate(&self, question: &str, context: &str) -> Result<String, DomainError>;
}

/// The orchestrator running one question through the full pipeline:
/// temporal parse, embedding, hybrid retrieval, context assembly, and
/// generation. The first stage failure short-circuits the query; nothing is
/// retried here.
pub struct QueryService {
    embedder: Arc<dyn EmbeddingEngine>,
    searcher: Arc<dyn LogSearcher>,
    generator: Arc<dyn GenerationEngine>,
    config: ServiceConfig,
}

impl QueryService {
    pub fn new(
        embedder: Arc<dyn EmbeddingEngine>,
        searcher: Arc<dyn LogSearcher>,
        generator: Arc<dyn GenerationEngine>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            embedder,
            searcher,
            generator,
            config,
        }
    }

    pub fn answer(&self, request: QueryRequest) -> Result<QueryResponse, DomainError> {
        let started = Instant::now();

        let query = request
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| DomainError::validation("missing query parameter"))?;
        info!(query = %log_excerpt(&query), "processing query");

        let window = parse_temporal_window(&query);
        match &window {
            Some(window) => info!(lower_bound = %window.lower_bound, "temporal filter detected"),
            None => info!("no temporal filter detected, using semantic search only"),
        }

        let vector = self.embedder.embed(&query, EmbeddingRole::SearchQuery)?;
        debug!(dimensions = vector.len(), "generated query embedding");

        let search_request =
            SearchRequest::new(self.config.vector_field.as_str(), vector, self.config.k)
                .with_window(window);
        let records = self.searcher.search(&search_request)?;
        info!(hits = records.len(), "retrieved supporting records");

        let context = assemble_context(&records);
        let llm_response = self.generator.generate(&query, &context)?;

        let mut similar_documents = records;
        similar_documents.truncate(self.config.top_documents);

        Ok(QueryResponse {
            query,
            llm_response,
            similar_documents,
            processing_time: started.elapsed().as_secs_f64(),
        })
    }

    pub fn embedding_dimensions(&self) -> Option<usize> {
        self.embedder.dims()
    }
}

fn log_excerpt(text: &str) -> String {
    text.chars().take(50).collect()
}
