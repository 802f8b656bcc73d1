//! Domain layer: core entities, value objects, and typed errors.

pub mod errors;
pub mod models;
pub mod temporal;

pub use errors::DomainError;
pub use models::{
    EmbeddingRole, LogRecord, SearchRequest, TemporalWindow, TimeUnit, MISSING_FIELD,
    SOURCE_FIELDS,
};
pub use temporal::parse_temporal_window;
