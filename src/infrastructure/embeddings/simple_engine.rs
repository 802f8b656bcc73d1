use ahash::AHasher;
use std::hash::{Hash, Hasher};

use crate::{
    application::services::EmbeddingEngine,
    domain::{DomainError, EmbeddingRole},
};

/// A lightweight, deterministic embedding engine that hashes tokens into a
/// fixed-size vector. This is not meant for production-grade semantic
/// search, but it keeps the service runnable without a hosted embedding
/// model, and gives tests stable vectors.
pub struct SimpleEmbedEngine {
    dimensions: usize,
}

impl SimpleEmbedEngine {
    pub fn try_new(dimensions: usize) -> Result<Self, DomainError> {
        if dimensions == 0 {
            return Err(DomainError::config(
                "embedding dimensions must be greater than zero",
            ));
        }
        let dims = dimensions.clamp(8, 4096);
        Ok(Self { dimensions: dims })
    }

    fn tokenize<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> {
        text.split(|c: char| c.is_ascii_whitespace() || c.is_ascii_punctuation())
            .filter(move |token| !token.is_empty())
    }

    fn hash_token(&self, token: &str) -> usize {
        let mut hasher = AHasher::default();
        token.hash(&mut hasher);
        hasher.finish() as usize
    }

    fn embed_internal(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let tokens: Vec<&str> = self.tokenize(text).collect();
        if tokens.is_empty() {
            return vector;
        }

        for token in tokens {
            let hash = self.hash_token(token);
            let idx = hash % self.dimensions;
            vector[idx] += 1.0;
        }

        // L2 normalize to keep scores in [-1, 1]
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

impl Default for SimpleEmbedEngine {
    fn default() -> Self {
        Self::try_new(1024).expect("default simple embedder configuration is valid")
    }
}

impl EmbeddingEngine for SimpleEmbedEngine {
    // The role distinction only matters for models trained with asymmetric
    // query/document encoders; the hash engine ignores it.
    fn embed(&self, text: &str, _role: EmbeddingRole) -> Result<Vec<f32>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::embedding("text payload cannot be empty"));
        }
        Ok(self.embed_internal(text))
    }

    fn dims(&self) -> Option<usize> {
        Some(self.dimensions)
    }
}
