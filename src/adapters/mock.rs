//! Scripted generation backend for testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{GeneratedText, GenerationBackend, SamplingOptions};

/// One scripted response.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Text(String),
    Failure(String),
}

/// A recorded generation call, for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

/// Generation backend that replays queued responses in order.
///
/// When the queue is empty the default text is returned, so tests only
/// script the calls they care about.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
    default_text: String,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            default_text: "Scripted default response.".to_string(),
        }
    }

    pub fn with_default_text(default_text: impl Into<String>) -> Self {
        Self {
            default_text: default_text.into(),
            ..Self::new()
        }
    }

    /// Queue a successful response.
    pub async fn push_text(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(ScriptedResponse::Text(text.into()));
    }

    /// Queue several successful responses in order.
    pub async fn push_texts<I, S>(&self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue = self.responses.lock().await;
        for text in texts {
            queue.push_back(ScriptedResponse::Text(text.into()));
        }
    }

    /// Queue a backend failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .await
            .push_back(ScriptedResponse::Failure(message.into()));
    }

    /// All calls made so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &SamplingOptions,
    ) -> DomainResult<GeneratedText> {
        self.calls.lock().await.push(RecordedCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            temperature: options.temperature,
        });

        let next = self.responses.lock().await.pop_front();
        match next {
            Some(ScriptedResponse::Text(text)) => Ok(GeneratedText { text }),
            Some(ScriptedResponse::Failure(message)) => Err(DomainError::Backend(message)),
            None => Ok(GeneratedText {
                text: self.default_text.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_falls_back_to_default() {
        let backend = ScriptedBackend::new();
        backend.push_texts(["first", "second"]).await;

        let opts = SamplingOptions::default();
        assert_eq!(backend.generate("m", "p", &opts).await.unwrap().text, "first");
        assert_eq!(backend.generate("m", "p", &opts).await.unwrap().text, "second");
        assert_eq!(
            backend.generate("m", "p", &opts).await.unwrap().text,
            "Scripted default response."
        );
        assert_eq!(backend.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn scripted_failure_surfaces_as_backend_error() {
        let backend = ScriptedBackend::new();
        backend.push_failure("boom").await;
        let err = backend
            .generate("m", "p", &SamplingOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
