//! Knowledge service: domain operations over the two named collections.
//!
//! Wraps the [`KnowledgeBackend`] port with the collection names pinned
//! from config and exposes what the orchestrator actually needs: expert
//! context retrieval, host pattern retrieval with topic bias, success
//! pattern write-back, and snippet/fragment ingestion.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::models::{KnowledgeConfig, KnowledgeFragment, MetadataFilter};
use crate::domain::ports::KnowledgeBackend;
use crate::services::prompt;

/// Metadata value tagging success-pattern records.
const PATTERN_TYPE: &str = "successful_pattern";

/// Metadata value tagging simulated-search snippets.
const SNIPPET_SOURCE: &str = "simulated_web_search";

/// High-level operations over host pattern memory and the expert knowledge
/// base.
pub struct KnowledgeService {
    backend: Arc<dyn KnowledgeBackend>,
    config: KnowledgeConfig,
    web_search_template: String,
}

impl KnowledgeService {
    pub fn new(
        backend: Arc<dyn KnowledgeBackend>,
        config: KnowledgeConfig,
        web_search_template: String,
    ) -> Self {
        Self {
            backend,
            config,
            web_search_template,
        }
    }

    /// Create both collections if they do not exist yet.
    pub async fn initialize(&self) -> DomainResult<()> {
        self.backend
            .ensure_collection(&self.config.host_collection)
            .await?;
        self.backend
            .ensure_collection(&self.config.expert_collection)
            .await?;
        Ok(())
    }

    /// Retrieve knowledge relevant to `query` from the expert collection,
    /// joined into a single context block. An empty result means "no
    /// relevant knowledge" and yields an empty string, never an error.
    pub async fn expert_context(&self, query: &str) -> DomainResult<String> {
        let documents = self
            .backend
            .query(
                &self.config.expert_collection,
                query,
                self.config.context_results,
                None,
            )
            .await?;
        debug!(results = documents.len(), "expert knowledge query");
        Ok(documents.join("\n\n"))
    }

    /// Retrieve up to `pattern_examples` successful challenge patterns,
    /// topic matches first, padded with generic top patterns when the
    /// topic-filtered query comes up short.
    pub async fn host_patterns(&self, topic: &str) -> DomainResult<Vec<String>> {
        let limit = self.config.pattern_examples;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let topic_filter = MetadataFilter::equals("topic", topic);
        let mut patterns = self
            .backend
            .query(
                &self.config.host_collection,
                topic,
                limit,
                Some(&topic_filter),
            )
            .await?;

        if patterns.len() < limit {
            let generic = self
                .backend
                .query(&self.config.host_collection, topic, limit, None)
                .await?;
            for doc in generic {
                if patterns.len() >= limit {
                    break;
                }
                if !patterns.contains(&doc) {
                    patterns.push(doc);
                }
            }
        }

        debug!(topic, results = patterns.len(), "host pattern query");
        Ok(patterns)
    }

    /// Record a depth-3-achieving challenge sequence into host pattern
    /// memory, tagged by topic and depth for later retrieval.
    pub async fn record_success_pattern(
        &self,
        topic: &str,
        question: &str,
        answer: &str,
        rationale: &str,
        sequence: usize,
    ) -> DomainResult<()> {
        let id = format!("{}{}", self.config.pattern_id_prefix, sequence);
        let text = format!(
            "Successful challenge pattern on '{topic}'.\nQuestion: {question}\nAnswer: {answer}\nWhy it worked: {rationale}"
        );
        let fragment = KnowledgeFragment::new(id.clone(), text)
            .with_metadata("type", PATTERN_TYPE)
            .with_metadata("topic", topic)
            .with_metadata("depth", "3");

        self.backend
            .upsert(&self.config.host_collection, vec![fragment])
            .await?;
        info!(topic, id = %id, "recorded success pattern");
        Ok(())
    }

    /// Render a simulated web-search snippet for `query`.
    pub fn simulated_snippet(&self, query: &str) -> String {
        prompt::render(&self.web_search_template, &[("query", query)])
    }

    /// Store an externally sourced snippet into the expert collection,
    /// tagged with its source and originating query.
    pub async fn ingest_snippet(
        &self,
        query: &str,
        snippet: &str,
        sequence: usize,
    ) -> DomainResult<()> {
        let id = format!("{}{}", self.config.snippet_id_prefix, sequence);
        let fragment = KnowledgeFragment::new(id.clone(), snippet)
            .with_metadata("source", SNIPPET_SOURCE)
            .with_metadata("query", query);
        self.backend
            .upsert(&self.config.expert_collection, vec![fragment])
            .await?;
        debug!(query, id = %id, "ingested external snippet");
        Ok(())
    }

    /// Bulk-load fragments into the expert knowledge base.
    pub async fn seed_fragments(&self, fragments: Vec<KnowledgeFragment>) -> DomainResult<usize> {
        let count = fragments.len();
        if count > 0 {
            self.backend
                .upsert(&self.config.expert_collection, fragments)
                .await?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryKnowledgeStore;
    use crate::domain::models::PromptsConfig;

    fn service() -> KnowledgeService {
        KnowledgeService::new(
            Arc::new(InMemoryKnowledgeStore::new()),
            KnowledgeConfig::default(),
            PromptsConfig::default().web_search_placeholder,
        )
    }

    #[tokio::test]
    async fn unseeded_collection_yields_empty_context() {
        let svc = service();
        svc.initialize().await.unwrap();
        let context = svc.expert_context("anything at all").await.unwrap();
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn expert_context_joins_documents() {
        let svc = service();
        svc.initialize().await.unwrap();
        svc.seed_fragments(vec![
            KnowledgeFragment::new("d1", "trust is earned slowly"),
            KnowledgeFragment::new("d2", "institutions drift toward self-preservation"),
        ])
        .await
        .unwrap();

        let context = svc.expert_context("how is trust earned").await.unwrap();
        assert!(context.contains("trust is earned slowly"));
    }

    #[tokio::test]
    async fn host_patterns_prefer_topic_matches_then_pad() {
        let svc = service();
        svc.initialize().await.unwrap();
        svc.record_success_pattern("trust", "q-trust", "a-trust", "direct", 1)
            .await
            .unwrap();
        svc.record_success_pattern("power", "q-power", "a-power", "direct", 2)
            .await
            .unwrap();

        let patterns = svc.host_patterns("trust").await.unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns[0].contains("q-trust"));
        assert!(patterns[1].contains("q-power"));
    }

    #[tokio::test]
    async fn re_upsert_replaces_by_id() {
        let svc = service();
        svc.initialize().await.unwrap();
        svc.seed_fragments(vec![KnowledgeFragment::new("d1", "first version of the fact")])
            .await
            .unwrap();
        svc.seed_fragments(vec![KnowledgeFragment::new("d1", "second version of the fact")])
            .await
            .unwrap();

        let context = svc.expert_context("version of the fact").await.unwrap();
        assert!(context.contains("second version"));
        assert!(!context.contains("first version"));
    }

    #[test]
    fn simulated_snippet_embeds_query() {
        let snippet = service().simulated_snippet("algorithmic bias");
        assert!(snippet.contains("algorithmic bias"));
    }
}
