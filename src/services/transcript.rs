//! Transcript assembly: session state into the persisted record.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::{InterviewSession, TranscriptMetadata, TranscriptRecord};
use crate::domain::ports::TranscriptSink;

/// Serializes a finished session and hands it to the configured sink.
pub struct TranscriptAssembler {
    sink: Arc<dyn TranscriptSink>,
}

impl TranscriptAssembler {
    pub fn new(sink: Arc<dyn TranscriptSink>) -> Self {
        Self { sink }
    }

    /// Build the transcript record for a session.
    pub fn assemble(session: &InterviewSession) -> TranscriptRecord {
        TranscriptRecord {
            timestamp: Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            turns: session.turns().to_vec(),
            metadata: TranscriptMetadata {
                total_exchanges: session.exchanges(),
                expert_name: session.expert_name.clone(),
                topics: session.topics.clone(),
                topic_depth_scores: session
                    .depth_map()
                    .iter()
                    .map(|(topic, depth)| (topic.clone(), depth.value()))
                    .collect(),
                comfort_zone_summary: session.comfort_hits().clone(),
                breakthroughs: session.breakthroughs().to_vec(),
            },
        }
    }

    /// Assemble and persist; returns the sink's identifier for the record.
    pub async fn finalize(&self, session: &InterviewSession) -> DomainResult<String> {
        let record = Self::assemble(session);
        let location = self.sink.persist(&record).await?;
        info!(location = %location, turns = record.turns.len(), "transcript persisted");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DepthScore, Role};

    #[test]
    fn assemble_captures_session_summary() {
        let topics = vec!["alpha".to_string()];
        let mut session = InterviewSession::new("Test Expert", &topics);
        session.record_turn(Role::Host, "q", "alpha");
        session.record_turn(Role::Expert, "a", "alpha");
        session.spend_exchange();
        session.record_depth("alpha", DepthScore::Profound);
        session.record_comfort_hit("we must remember");

        let record = TranscriptAssembler::assemble(&session);
        assert_eq!(record.turns.len(), 2);
        assert_eq!(record.metadata.total_exchanges, 1);
        assert_eq!(record.metadata.expert_name, "Test Expert");
        assert_eq!(record.metadata.topic_depth_scores.get("alpha"), Some(&3));
        assert_eq!(
            record.metadata.comfort_zone_summary.get("we must remember"),
            Some(&1)
        );
    }
}
