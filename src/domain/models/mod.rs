pub mod config;
pub mod evaluation;
pub mod knowledge;
pub mod session;
pub mod transcript;

pub use config::{
    Config, EvaluationFallbacks, GenerationConfig, InterviewConfig, KnowledgeBackendKind,
    KnowledgeConfig, LoggingConfig, ModelProfile, PersonaConfig, PromptsConfig, TranscriptConfig,
};
pub use evaluation::{DepthScore, EvaluationResult, ParseOutcome};
pub use knowledge::{KnowledgeFragment, MetadataFilter};
pub use session::{Breakthrough, InterviewSession, Role, Turn};
pub use transcript::{TranscriptMetadata, TranscriptRecord};
