//! Shared construction of backends and services from configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::{ChromaBackend, InMemoryKnowledgeStore, OllamaBackend};
use crate::domain::models::{Config, KnowledgeBackendKind};
use crate::domain::ports::{GenerationBackend, KnowledgeBackend};
use crate::infrastructure::config::ConfigLoader;
use crate::services::KnowledgeService;

/// Load config from an explicit file or the hierarchical default chain.
pub fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Construct the configured generation backend.
pub fn generation_backend(config: &Config) -> Result<Arc<dyn GenerationBackend>> {
    let backend = OllamaBackend::new(&config.generation, config.knowledge.embedding_model.clone())
        .context("Failed to construct generation backend")?;
    Ok(Arc::new(backend))
}

/// Construct the configured knowledge backend and wrap it in the service.
pub fn knowledge_service(config: &Config) -> Result<KnowledgeService> {
    let backend: Arc<dyn KnowledgeBackend> = match config.knowledge.backend {
        KnowledgeBackendKind::Memory => Arc::new(InMemoryKnowledgeStore::new()),
        KnowledgeBackendKind::Chroma => {
            let embedder = Arc::new(
                OllamaBackend::new(&config.generation, config.knowledge.embedding_model.clone())
                    .context("Failed to construct embedding provider")?,
            );
            Arc::new(
                ChromaBackend::new(config.knowledge.endpoint.clone(), embedder)
                    .context("Failed to construct Chroma backend")?,
            )
        }
    };

    Ok(KnowledgeService::new(
        backend,
        config.knowledge.clone(),
        config.prompts.web_search_placeholder.clone(),
    ))
}
