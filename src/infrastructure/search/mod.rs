//! Vector store adapters.

pub mod opensearch;

pub use opensearch::OpenSearchClient;
