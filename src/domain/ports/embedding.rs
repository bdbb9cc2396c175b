//! Embedding provider port for semantic vector generation.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Trait for embedding providers that convert text into dense vectors for
/// similarity search. Used by knowledge backends that do not embed
/// server-side.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "ollama").
    fn name(&self) -> &'static str;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>>;
}
