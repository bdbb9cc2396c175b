//! Ollama adapter: text generation and embeddings over the local HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::GenerationConfig;
use crate::domain::ports::{EmbeddingProvider, GeneratedText, GenerationBackend, SamplingOptions};

/// Client for an Ollama-compatible server.
pub struct OllamaBackend {
    endpoint: String,
    embedding_model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(config: &GenerationConfig, embedding_model: impl Into<String>) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Backend(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            embedding_model: embedding_model.into(),
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &SamplingOptions,
    ) -> DomainResult<GeneratedText> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: options.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Backend(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::Backend(format!(
                "generate returned {status}: {detail}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Backend(format!("malformed generate response: {e}")))?;
        Ok(GeneratedText {
            text: parsed.response,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let body = EmbeddingsRequest {
            model: &self.embedding_model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Knowledge(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::Knowledge(format!(
                "embeddings returned {status}: {detail}"
            )));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Knowledge(format!("malformed embeddings response: {e}")))?;
        Ok(parsed.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_serializes_non_streaming() {
        let body = GenerateRequest {
            model: "qwen3:4b",
            prompt: "a prompt",
            stream: false,
            options: GenerateOptions { temperature: 0.85 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "qwen3:4b");
        assert_eq!(json["stream"], false);
        assert!((json["options"]["temperature"].as_f64().unwrap() - 0.85).abs() < 1e-6);
    }

    #[test]
    fn generate_response_parses_text_field() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"model":"m","response":"hello","done":true}"#).unwrap();
        assert_eq!(parsed.response, "hello");
    }

    #[test]
    fn embeddings_response_parses_vector() {
        let parsed: EmbeddingsResponse =
            serde_json::from_str(r#"{"embedding":[0.1,0.2,0.3]}"#).unwrap();
        assert_eq!(parsed.embedding.len(), 3);
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let mut config = GenerationConfig::default();
        config.endpoint = "http://localhost:11434/".to_string();
        let backend = OllamaBackend::new(&config, "nomic-embed-text").unwrap();
        assert_eq!(backend.endpoint, "http://localhost:11434");
    }
}
