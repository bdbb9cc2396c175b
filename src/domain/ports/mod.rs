//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters must implement:
//! - [`GenerationBackend`]: language-model text completion
//! - [`KnowledgeBackend`]: vector-similarity document collections
//! - [`EmbeddingProvider`]: text-to-vector embedding
//! - [`TranscriptSink`]: transcript persistence
//!
//! These contracts keep the orchestration core independent of the specific
//! inference and storage services behind it.

pub mod embedding;
pub mod generation;
pub mod knowledge;
pub mod transcript;

pub use embedding::EmbeddingProvider;
pub use generation::{GeneratedText, GenerationBackend, SamplingOptions};
pub use knowledge::KnowledgeBackend;
pub use transcript::TranscriptSink;
