//! Generation gateway: instrumented wrapper over the generation backend.
//!
//! Single attempt, fail-fast. No retries, no backoff: the caller decides
//! continuation policy. Every request and response is logged with purpose
//! tag, sizes, truncated previews, and elapsed time.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{GenerationBackend, SamplingOptions};

/// Longest prompt/response preview emitted to the log.
const PREVIEW_CHARS: usize = 80;

/// Uniform failure contract and instrumentation around a
/// [`GenerationBackend`].
pub struct GenerationGateway {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerationGateway {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Dispatch one generation request.
    ///
    /// `purpose` tags the call for observability and error reporting
    /// (e.g., `"opening_question"`, `"depth_evaluation"`). On backend
    /// failure the returned [`DomainError::Generation`] carries the purpose,
    /// the elapsed time, and the backend's message.
    pub async fn generate(
        &self,
        purpose: &str,
        model: &str,
        prompt: &str,
        options: &SamplingOptions,
    ) -> DomainResult<String> {
        debug!(
            purpose,
            model,
            backend = self.backend.name(),
            prompt_len = prompt.len(),
            prompt_preview = %preview(prompt),
            temperature = options.temperature,
            "dispatching generation request"
        );

        let started = Instant::now();
        match self.backend.generate(model, prompt, options).await {
            Ok(generated) => {
                debug!(
                    purpose,
                    elapsed_ms = elapsed_ms(started),
                    response_len = generated.text.len(),
                    response_preview = %preview(&generated.text),
                    "generation complete"
                );
                Ok(generated.text)
            }
            Err(err) => {
                let elapsed = elapsed_ms(started);
                warn!(purpose, elapsed_ms = elapsed, error = %err, "generation failed");
                Err(DomainError::Generation {
                    purpose: purpose.to_string(),
                    elapsed_ms: elapsed,
                    message: err.to_string(),
                })
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::ScriptedBackend;

    #[tokio::test]
    async fn returns_backend_text() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_text("a generated question").await;
        let gateway = GenerationGateway::new(backend);

        let text = gateway
            .generate("opening_question", "test-model", "prompt", &SamplingOptions::default())
            .await
            .expect("scripted call should succeed");
        assert_eq!(text, "a generated question");
    }

    #[tokio::test]
    async fn failure_carries_purpose_and_message() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_failure("backend unreachable").await;
        let gateway = GenerationGateway::new(backend);

        let err = gateway
            .generate("depth_evaluation", "test-model", "prompt", &SamplingOptions::default())
            .await
            .unwrap_err();
        match err {
            DomainError::Generation { purpose, message, .. } => {
                assert_eq!(purpose, "depth_evaluation");
                assert!(message.contains("backend unreachable"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn preview_truncates_long_text() {
        let text = "p".repeat(200);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }
}
