//! Concrete implementations of the domain ports.

pub mod chroma;
pub mod memory;
pub mod mock;
pub mod ollama;
pub mod transcript_file;

pub use chroma::ChromaBackend;
pub use memory::InMemoryKnowledgeStore;
pub use mock::ScriptedBackend;
pub use ollama::OllamaBackend;
pub use transcript_file::JsonFileTranscriptSink;
