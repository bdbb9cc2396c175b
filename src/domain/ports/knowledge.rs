//! Knowledge store port for the two document collections.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{KnowledgeFragment, MetadataFilter};

/// Trait for vector-similarity document stores.
///
/// Collections are addressed by name. Querying an empty collection, or one
/// with fewer matches than `n_results`, returns whatever subset exists --
/// no padding, no error.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    /// Backend name (e.g., "chroma", "memory").
    fn name(&self) -> &'static str;

    /// Create the collection if it does not exist yet. Idempotent.
    async fn ensure_collection(&self, collection: &str) -> DomainResult<()>;

    /// Insert or replace fragments by ID.
    async fn upsert(
        &self,
        collection: &str,
        fragments: Vec<KnowledgeFragment>,
    ) -> DomainResult<()>;

    /// Similarity search, best match first. Ties are backend-defined.
    async fn query(
        &self,
        collection: &str,
        text: &str,
        n_results: usize,
        filter: Option<&MetadataFilter>,
    ) -> DomainResult<Vec<String>>;
}
