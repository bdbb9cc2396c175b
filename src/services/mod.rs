pub mod gateway;
pub mod ingestion;
pub mod knowledge;
pub mod normalizer;
pub mod orchestrator;
pub mod prompt;
pub mod score_parser;
pub mod transcript;

pub use gateway::GenerationGateway;
pub use ingestion::PersonaIngestor;
pub use knowledge::KnowledgeService;
pub use normalizer::TextNormalizer;
pub use orchestrator::InterviewOrchestrator;
pub use score_parser::ScoreParser;
pub use transcript::TranscriptAssembler;
