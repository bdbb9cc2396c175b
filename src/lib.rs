//! Socratic - Retrieval-Augmented Interview Orchestrator
//!
//! Socratic runs simulated multi-turn interviews between a scripted Host
//! and a persona-driven Expert, using a language model for generation and a
//! vector-similarity knowledge store for context retrieval. The core is a
//! depth-gated follow-up state machine with a retrieval-augmented pattern
//! feedback loop and a structured-text evaluation parser.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models and port traits
//! - **Service Layer** (`services`): orchestration and coordination logic
//! - **Adapters** (`adapters`): Ollama, Chroma, in-memory, and file sinks
//! - **Infrastructure Layer** (`infrastructure`): configuration loading
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use socratic::services::InterviewOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Wire backends, then orchestrator.run().await
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Breakthrough, Config, DepthScore, EvaluationResult, InterviewSession, KnowledgeFragment,
    ParseOutcome, Role, TranscriptRecord, Turn,
};
pub use domain::ports::{
    EmbeddingProvider, GenerationBackend, KnowledgeBackend, SamplingOptions, TranscriptSink,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    GenerationGateway, InterviewOrchestrator, KnowledgeService, PersonaIngestor, ScoreParser,
    TextNormalizer, TranscriptAssembler,
};
