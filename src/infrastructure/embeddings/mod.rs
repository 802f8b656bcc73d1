pub mod remote_engine;
pub mod simple_engine;

pub use remote_engine::RemoteEmbeddingClient;
pub use simple_engine::SimpleEmbedEngine;
