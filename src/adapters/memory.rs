//! In-process knowledge store with token-overlap ranking.
//!
//! Deterministic and dependency-free: the default backend for tests and
//! offline runs. Ranking counts shared lower-cased alphanumeric tokens
//! between the query and each document; ties keep insertion order.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::{KnowledgeFragment, MetadataFilter};
use crate::domain::ports::KnowledgeBackend;

/// In-memory implementation of the knowledge-store port.
pub struct InMemoryKnowledgeStore {
    collections: RwLock<HashMap<String, Vec<KnowledgeFragment>>>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of fragments currently held in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

impl Default for InMemoryKnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn overlap_score(query_tokens: &[String], document: &str) -> usize {
    let doc_tokens = tokens(document);
    query_tokens
        .iter()
        .filter(|t| doc_tokens.contains(t))
        .count()
}

#[async_trait]
impl KnowledgeBackend for InMemoryKnowledgeStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ensure_collection(&self, collection: &str) -> DomainResult<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default();
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        fragments: Vec<KnowledgeFragment>,
    ) -> DomainResult<()> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();
        for fragment in fragments {
            // Replace-by-id keeps the original insertion position.
            if let Some(existing) = stored.iter_mut().find(|f| f.id == fragment.id) {
                *existing = fragment;
            } else {
                stored.push(fragment);
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        text: &str,
        n_results: usize,
        filter: Option<&MetadataFilter>,
    ) -> DomainResult<Vec<String>> {
        let collections = self.collections.read().await;
        let Some(stored) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let query_tokens = tokens(text);
        let mut candidates: Vec<(usize, &KnowledgeFragment)> = stored
            .iter()
            .filter(|f| filter.is_none_or(|flt| flt.matches(&f.metadata)))
            .map(|f| (overlap_score(&query_tokens, &f.text), f))
            .collect();

        // Stable sort: equal scores preserve insertion order.
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates.truncate(n_results);

        Ok(candidates
            .into_iter()
            .map(|(_, f)| f.text.clone())
            .collect())
    }
}
