//! Depth evaluation results produced by the structured-score parser.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordinal judgment of how substantively a response engaged with a question.
///
/// Variant order gives the natural ordering: `Shallow < Partial < Profound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepthScore {
    /// Surface-level or evasive. A strong follow-up is warranted.
    Shallow,
    /// Partially deep, misses some nuance. A follow-up is recommended.
    Partial,
    /// Genuinely profound and direct. No follow-up needed on this point.
    Profound,
}

impl DepthScore {
    /// The maximum achievable depth.
    pub const MAX: DepthScore = DepthScore::Profound;

    /// Numeric value in `1..=3`.
    pub fn value(self) -> u8 {
        match self {
            DepthScore::Shallow => 1,
            DepthScore::Partial => 2,
            DepthScore::Profound => 3,
        }
    }

    /// Parse from a numeric value; `None` outside `1..=3`.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(DepthScore::Shallow),
            2 => Some(DepthScore::Partial),
            3 => Some(DepthScore::Profound),
            _ => None,
        }
    }

    /// Human-readable label used in console output.
    pub fn label(self) -> &'static str {
        match self {
            DepthScore::Shallow => "shallow",
            DepthScore::Partial => "moderate",
            DepthScore::Profound => "profound",
        }
    }
}

impl std::fmt::Display for DepthScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

// Serialized as the bare ordinal so transcripts read `"depth": 3`.
impl Serialize for DepthScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for DepthScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        DepthScore::from_value(value)
            .ok_or_else(|| D::Error::custom(format!("depth score out of range: {value}")))
    }
}

/// Which rung of the parser's fallback ladder produced a result.
///
/// Surfaced alongside the score so the degradation path is observable and
/// independently testable, rather than buried in nested error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Both `Score:` and `Rationale:` tokens were found.
    Exact,
    /// Only a `Score:` token was found; rationale is a fixed placeholder.
    ScoreOnly,
    /// The entire text was a single digit 1-3.
    BareDigit,
    /// Nothing matched; neutral score with an excerpt of the raw text.
    Unparsed,
    /// Parsing itself failed; neutral score with the error message.
    ParserFailure,
}

/// Result of evaluating one (question, response) pair.
///
/// Produced once per generated response and never retried. The rationale is
/// always non-empty: fallback placeholders fill in when the evaluator
/// produced none.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub score: DepthScore,
    pub rationale: String,
    pub outcome: ParseOutcome,
}

impl EvaluationResult {
    pub fn new(score: DepthScore, rationale: impl Into<String>, outcome: ParseOutcome) -> Self {
        Self {
            score,
            rationale: rationale.into(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_score_ordering() {
        assert!(DepthScore::Shallow < DepthScore::Partial);
        assert!(DepthScore::Partial < DepthScore::Profound);
        assert_eq!(DepthScore::MAX, DepthScore::Profound);
    }

    #[test]
    fn depth_score_round_trips_through_value() {
        for value in 1..=3 {
            let score = DepthScore::from_value(value).unwrap();
            assert_eq!(score.value(), value);
        }
        assert!(DepthScore::from_value(0).is_none());
        assert!(DepthScore::from_value(4).is_none());
    }

    #[test]
    fn depth_score_serializes_as_number() {
        let json = serde_json::to_string(&DepthScore::Profound).unwrap();
        assert_eq!(json, "3");
        let back: DepthScore = serde_json::from_str("2").unwrap();
        assert_eq!(back, DepthScore::Partial);
        assert!(serde_json::from_str::<DepthScore>("5").is_err());
    }
}
