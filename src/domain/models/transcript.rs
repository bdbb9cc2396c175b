//! Serializable transcript artifact handed to the transcript sink.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::session::{Breakthrough, Turn};

/// Summary metadata serialized alongside the turn log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMetadata {
    pub total_exchanges: u32,
    pub expert_name: String,
    pub topics: Vec<String>,
    /// Best depth achieved per topic, keyed by topic string.
    pub topic_depth_scores: BTreeMap<String, u8>,
    /// Comfort-zone phrase hit counts observed across the session.
    pub comfort_zone_summary: BTreeMap<String, u32>,
    #[serde(default)]
    pub breakthroughs: Vec<Breakthrough>,
}

/// The complete persisted record of one interview run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Filesystem-friendly timestamp, e.g. `20250301_142233`.
    pub timestamp: String,
    pub turns: Vec<Turn>,
    pub metadata: TranscriptMetadata,
}
