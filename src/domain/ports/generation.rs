//! Generation backend port.
//!
//! Abstracts the language-model inference service behind a single async
//! call. The core issues strictly sequential requests and never assumes
//! anything about the backend beyond "one call completes before the next
//! begins".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;

/// Sampling options forwarded to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingOptions {
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: f32,
}

impl SamplingOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self { temperature }
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self { temperature: 0.7 }
    }
}

/// Typed wrapper around the backend's response. Never assume key presence
/// on raw backend payloads; adapters must convert to this before returning.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub text: String,
}

/// Trait for text-generation backends.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend name (e.g., "ollama", "scripted").
    fn name(&self) -> &'static str;

    /// Generate a completion for `prompt` with the given model and options.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &SamplingOptions,
    ) -> DomainResult<GeneratedText>;
}
