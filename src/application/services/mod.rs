//! Service layer orchestrating domain operations and infrastructure adapters.

mod context;
mod query_service;

pub use context::assemble_context;
pub use query_service::{
    EmbeddingEngine, GenerationEngine, LogSearcher, QueryService, ServiceConfig,
};
