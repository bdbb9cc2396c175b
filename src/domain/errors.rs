//! Domain errors for the interview orchestration core.

use thiserror::Error;

/// Domain-level errors that can occur during an interview run.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A generation call failed at the gateway. Fatal to the run: the
    /// orchestrator never retries a generation or evaluation step.
    #[error("generation call '{purpose}' failed after {elapsed_ms}ms: {message}")]
    Generation {
        purpose: String,
        elapsed_ms: u64,
        message: String,
    },

    /// The generation backend itself failed (transport, status, decode).
    /// Wrapped into [`DomainError::Generation`] by the gateway.
    #[error("generation backend error: {0}")]
    Backend(String),

    /// A knowledge-store operation failed. An empty query result is not an
    /// error; only transport/backend failures surface here.
    #[error("knowledge store error: {0}")]
    Knowledge(String),

    /// A prompt template is missing a required placeholder. Raised at
    /// config-load time, never at format time.
    #[error("prompt template '{template}' is missing required placeholder '{{{placeholder}}}'")]
    TemplatePlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("transcript persistence failed: {0}")]
    Transcript(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Transcript(err.to_string())
    }
}
