//! Application layer wiring DTOs and services for the query pipeline.

pub mod dtos;
pub mod services;

pub use dtos::{ErrorResponse, QueryRequest, QueryResponse};
pub use services::QueryService;
