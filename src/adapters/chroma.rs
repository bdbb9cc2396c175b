//! Chroma knowledge backend over the HTTP API.
//!
//! Embeddings are generated client-side through an [`EmbeddingProvider`]
//! (the server stores and searches the vectors), matching how the persona
//! pipeline originally ran against a local Chroma instance.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{KnowledgeFragment, MetadataFilter};
use crate::domain::ports::{EmbeddingProvider, KnowledgeBackend};

/// Chroma HTTP client implementing the knowledge-store port.
pub struct ChromaBackend {
    endpoint: String,
    client: reqwest::Client,
    embedder: Arc<dyn EmbeddingProvider>,
    /// Collection name -> server-side collection id.
    collection_ids: RwLock<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    /// One inner list per query text; we always send exactly one.
    documents: Option<Vec<Vec<String>>>,
}

impl ChromaBackend {
    pub fn new(
        endpoint: impl Into<String>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::Knowledge(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
            embedder,
            collection_ids: RwLock::new(HashMap::new()),
        })
    }

    /// Resolve (and cache) the server-side id for a collection name.
    async fn collection_id(&self, collection: &str) -> DomainResult<String> {
        if let Some(id) = self.collection_ids.read().await.get(collection) {
            return Ok(id.clone());
        }

        let url = format!("{}/api/v1/collections", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "name": collection, "get_or_create": true }))
            .send()
            .await
            .map_err(|e| DomainError::Knowledge(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::Knowledge(format!(
                "get_or_create '{collection}' returned {status}: {detail}"
            )));
        }

        let parsed: CollectionResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Knowledge(format!("malformed collection response: {e}")))?;

        self.collection_ids
            .write()
            .await
            .insert(collection.to_string(), parsed.id.clone());
        Ok(parsed.id)
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> DomainResult<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Knowledge(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::Knowledge(format!(
                "{url} returned {status}: {detail}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl KnowledgeBackend for ChromaBackend {
    fn name(&self) -> &'static str {
        "chroma"
    }

    async fn ensure_collection(&self, collection: &str) -> DomainResult<()> {
        self.collection_id(collection).await.map(|_| ())
    }

    async fn upsert(
        &self,
        collection: &str,
        fragments: Vec<KnowledgeFragment>,
    ) -> DomainResult<()> {
        if fragments.is_empty() {
            return Ok(());
        }

        let id = self.collection_id(collection).await?;

        let mut embeddings = Vec::with_capacity(fragments.len());
        for fragment in &fragments {
            embeddings.push(self.embedder.embed(&fragment.text).await?);
        }

        let ids: Vec<&str> = fragments.iter().map(|f| f.id.as_str()).collect();
        let documents: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        let metadatas: Vec<&_> = fragments.iter().map(|f| &f.metadata).collect();

        let url = format!("{}/api/v1/collections/{id}/upsert", self.endpoint);
        self.post_json(
            &url,
            &json!({
                "ids": ids,
                "embeddings": embeddings,
                "documents": documents,
                "metadatas": metadatas,
            }),
        )
        .await
        .map(|_| ())
    }

    async fn query(
        &self,
        collection: &str,
        text: &str,
        n_results: usize,
        filter: Option<&MetadataFilter>,
    ) -> DomainResult<Vec<String>> {
        if n_results == 0 {
            return Ok(Vec::new());
        }

        let id = self.collection_id(collection).await?;
        let embedding = self.embedder.embed(text).await?;

        let mut body = json!({
            "query_embeddings": [embedding],
            "n_results": n_results,
            "include": ["documents"],
        });
        if let Some(filter) = filter {
            let mut clause = serde_json::Map::new();
            clause.insert(
                filter.key.clone(),
                serde_json::Value::String(filter.value.clone()),
            );
            body["where"] = serde_json::Value::Object(clause);
        }

        let url = format!("{}/api/v1/collections/{id}/query", self.endpoint);
        let response = self.post_json(&url, &body).await?;

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Knowledge(format!("malformed query response: {e}")))?;

        // No documents is "no relevant knowledge", not a failure.
        Ok(parsed
            .documents
            .and_then(|mut lists| {
                if lists.is_empty() {
                    None
                } else {
                    Some(lists.remove(0))
                }
            })
            .unwrap_or_default())
    }
}
