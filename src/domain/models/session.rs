//! The session aggregate owning all mutable interview state.
//!
//! Counters and accumulators (exchange count, depth map, comfort-phrase
//! multiset) live on this single owned value, passed by mutable reference to
//! the orchestrator. No ambient global state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::evaluation::DepthScore;

/// Speaker role for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Host,
    Expert,
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Host => write!(f, "HOST"),
            Role::Expert => write!(f, "EXPERT"),
            Role::System => write!(f, "SYSTEM"),
        }
    }
}

/// One utterance in the interview. Append-only; index implies chronology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Role,
    pub text: String,
    pub topic: String,
}

/// A sharp positive jump in depth attributed to a specific follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakthrough {
    pub topic: String,
    pub depth_before: DepthScore,
    pub depth_after: DepthScore,
    pub question: String,
    pub response: String,
    pub rationale: String,
}

/// Owns the full ordered turn sequence plus per-topic depth records,
/// comfort-zone phrase counts, breakthrough events, and the global exchange
/// counter. Created at session start, mutated only by the orchestrator,
/// serialized into the transcript and discarded at session end.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub id: Uuid,
    pub expert_name: String,
    pub topics: Vec<String>,
    pub started_at: DateTime<Utc>,
    turns: Vec<Turn>,
    best_depth: BTreeMap<String, DepthScore>,
    comfort_hits: BTreeMap<String, u32>,
    breakthroughs: Vec<Breakthrough>,
    exchanges: u32,
}

impl InterviewSession {
    pub fn new(expert_name: impl Into<String>, topics: &[String]) -> Self {
        Self {
            id: Uuid::new_v4(),
            expert_name: expert_name.into(),
            topics: topics.to_vec(),
            started_at: Utc::now(),
            turns: Vec::new(),
            best_depth: BTreeMap::new(),
            comfort_hits: BTreeMap::new(),
            breakthroughs: Vec::new(),
            exchanges: 0,
        }
    }

    /// Append a turn. Turns are never mutated after this.
    pub fn record_turn(&mut self, speaker: Role, text: impl Into<String>, topic: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            text: text.into(),
            topic: topic.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Count one question+answer pair against the exchange budget.
    pub fn spend_exchange(&mut self) {
        self.exchanges += 1;
    }

    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    /// Record an evaluation for a topic, keeping the running maximum.
    ///
    /// A regression after a breakthrough must not erase credit for it, so
    /// the stored value only ever goes up.
    pub fn record_depth(&mut self, topic: &str, score: DepthScore) {
        let entry = self
            .best_depth
            .entry(topic.to_string())
            .or_insert(score);
        if score > *entry {
            *entry = score;
        }
    }

    pub fn best_depth(&self, topic: &str) -> Option<DepthScore> {
        self.best_depth.get(topic).copied()
    }

    pub fn depth_map(&self) -> &BTreeMap<String, DepthScore> {
        &self.best_depth
    }

    /// Whether every topic in `topics` has a recorded best depth at or
    /// above `threshold`.
    pub fn all_topics_at_depth(&self, topics: &[String], threshold: DepthScore) -> bool {
        topics
            .iter()
            .all(|t| self.best_depth.get(t).is_some_and(|d| *d >= threshold))
    }

    /// Record one comfort-zone phrase hit.
    pub fn record_comfort_hit(&mut self, phrase: &str) {
        *self.comfort_hits.entry(phrase.to_string()).or_insert(0) += 1;
    }

    pub fn comfort_hits(&self) -> &BTreeMap<String, u32> {
        &self.comfort_hits
    }

    /// The `k` most frequent comfort-zone phrases, most frequent first.
    /// Ties break alphabetically so output is deterministic.
    pub fn top_comfort_phrases(&self, k: usize) -> Vec<(String, u32)> {
        let mut entries: Vec<(String, u32)> = self
            .comfort_hits
            .iter()
            .map(|(phrase, count)| (phrase.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(k);
        entries
    }

    pub fn record_breakthrough(&mut self, breakthrough: Breakthrough) {
        self.breakthroughs.push(breakthrough);
    }

    pub fn breakthroughs(&self) -> &[Breakthrough] {
        &self.breakthroughs
    }

    /// Mean of the recorded best depths, `0.0` when no topic was evaluated.
    pub fn average_best_depth(&self) -> f64 {
        if self.best_depth.is_empty() {
            return 0.0;
        }
        let total: u32 = self.best_depth.values().map(|d| u32::from(d.value())).sum();
        f64::from(total) / self.best_depth.len() as f64
    }

    /// The last `window` turns formatted as `SPEAKER: text` lines, in
    /// chronological order. Truncation keeps the most recent turns.
    pub fn history_window(&self, window: usize) -> String {
        let start = self.turns.len().saturating_sub(window);
        self.turns[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker, turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> InterviewSession {
        InterviewSession::new("Test Expert", &["alpha".to_string(), "beta".to_string()])
    }

    #[test]
    fn best_depth_is_monotone() {
        let mut s = session();
        s.record_depth("alpha", DepthScore::Shallow);
        s.record_depth("alpha", DepthScore::Profound);
        s.record_depth("alpha", DepthScore::Partial);
        assert_eq!(s.best_depth("alpha"), Some(DepthScore::Profound));
    }

    #[test]
    fn history_window_keeps_most_recent_in_order() {
        let mut s = session();
        for i in 0..5 {
            s.record_turn(Role::Host, format!("q{i}"), "alpha");
            s.record_turn(Role::Expert, format!("a{i}"), "alpha");
        }
        let history = s.history_window(3);
        assert_eq!(history, "EXPERT: a3\nHOST: q4\nEXPERT: a4");
    }

    #[test]
    fn history_window_handles_short_sessions() {
        let mut s = session();
        s.record_turn(Role::Host, "only question", "alpha");
        assert_eq!(s.history_window(6), "HOST: only question");
        assert_eq!(session().history_window(6), "");
    }

    #[test]
    fn top_comfort_phrases_sorted_by_frequency_then_alpha() {
        let mut s = session();
        for _ in 0..3 {
            s.record_comfort_hit("we must remember");
        }
        s.record_comfort_hit("as i always say");
        s.record_comfort_hit("in my experience");
        let top = s.top_comfort_phrases(2);
        assert_eq!(top[0], ("we must remember".to_string(), 3));
        assert_eq!(top[1], ("as i always say".to_string(), 1));
    }

    #[test]
    fn all_topics_at_depth_requires_full_coverage() {
        let mut s = session();
        let topics = s.topics.clone();
        s.record_depth("alpha", DepthScore::Profound);
        assert!(!s.all_topics_at_depth(&topics, DepthScore::Profound));
        s.record_depth("beta", DepthScore::Profound);
        assert!(s.all_topics_at_depth(&topics, DepthScore::Profound));
    }

    #[test]
    fn average_best_depth() {
        let mut s = session();
        assert!((s.average_best_depth() - 0.0).abs() < f64::EPSILON);
        s.record_depth("alpha", DepthScore::Shallow);
        s.record_depth("beta", DepthScore::Profound);
        assert!((s.average_best_depth() - 2.0).abs() < f64::EPSILON);
    }
}
