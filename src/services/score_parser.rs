//! Structured-score parser for evaluator output.
//!
//! The evaluator is asked for `Score: <1|2|3>` and `Rationale: <text>`, but
//! free-form model output drifts. Parsing is a layered, explicitly ordered
//! fallback chain ([`ParseOutcome`]) rather than nested error handling, so
//! the degradation ladder is independently testable. The interview flow is
//! never blocked on unparseable evaluator output.

use anyhow::Context;
use regex::Regex;

use crate::domain::models::config::EvaluationFallbacks;
use crate::domain::models::{DepthScore, EvaluationResult, ParseOutcome};

/// Longest excerpt of raw evaluator output embedded in fallback rationales.
const EXCERPT_CHARS: usize = 100;

/// Parses a bounded ordinal score plus rationale out of evaluator text.
pub struct ScoreParser {
    score_re: Regex,
    rationale_re: Regex,
    bare_digit_re: Regex,
    fallbacks: EvaluationFallbacks,
}

impl ScoreParser {
    pub fn new(fallbacks: EvaluationFallbacks) -> Self {
        Self {
            score_re: Regex::new(r"(?i)Score:\s*([1-3])").expect("score pattern is valid"),
            // (?s) lets the rationale span to the end of the text.
            rationale_re: Regex::new(r"(?is)Rationale:\s*(.+)")
                .expect("rationale pattern is valid"),
            bare_digit_re: Regex::new(r"^[1-3]$").expect("bare-digit pattern is valid"),
            fallbacks,
        }
    }

    /// Run the fallback ladder over normalized evaluator text.
    ///
    /// Never fails: any internal parse failure degrades to the neutral
    /// score with a diagnostic rationale ([`ParseOutcome::ParserFailure`]).
    pub fn parse(&self, text: &str) -> EvaluationResult {
        match self.try_parse(text) {
            Ok(result) => result,
            Err(err) => EvaluationResult::new(
                DepthScore::Partial,
                format!(
                    "{} {}. Raw output: '{}'",
                    self.fallbacks.rationale_exception_prefix,
                    err,
                    excerpt(text)
                ),
                ParseOutcome::ParserFailure,
            ),
        }
    }

    /// Ladder steps 1-4. Steps that can fail internally bubble an error so
    /// [`Self::parse`] can apply step 5.
    fn try_parse(&self, text: &str) -> anyhow::Result<EvaluationResult> {
        let score_match = self.score_re.captures(text);
        let rationale_match = self.rationale_re.captures(text);

        // 1. Both tokens present: exact pair, trimmed. A rationale that
        // trims to nothing counts as absent so the result never carries an
        // empty rationale.
        if let (Some(score_caps), Some(rationale_caps)) = (&score_match, &rationale_match) {
            let rationale = rationale_caps[1].trim();
            if !rationale.is_empty() {
                let score = parse_score(&score_caps[1])?;
                return Ok(EvaluationResult::new(
                    score,
                    rationale.to_string(),
                    ParseOutcome::Exact,
                ));
            }
        }

        // 2. Score token only.
        if let Some(score_caps) = &score_match {
            let score = parse_score(&score_caps[1])?;
            return Ok(EvaluationResult::new(
                score,
                self.fallbacks.rationale_not_articulated.clone(),
                ParseOutcome::ScoreOnly,
            ));
        }

        // 3. The entire text is a single digit 1-3.
        if self.bare_digit_re.is_match(text) {
            let score = parse_score(text)?;
            return Ok(EvaluationResult::new(
                score,
                self.fallbacks.rationale_no_rationale.clone(),
                ParseOutcome::BareDigit,
            ));
        }

        // 4. Nothing matched: neutral score, excerpt of the raw text.
        Ok(EvaluationResult::new(
            DepthScore::Partial,
            format!(
                "{} '{}'",
                self.fallbacks.rationale_parse_error_prefix,
                excerpt(text)
            ),
            ParseOutcome::Unparsed,
        ))
    }
}

fn parse_score(digits: &str) -> anyhow::Result<DepthScore> {
    let value: u8 = digits
        .trim()
        .parse()
        .with_context(|| format!("score token '{digits}' is not a number"))?;
    DepthScore::from_value(value)
        .with_context(|| format!("score {value} outside the 1-3 ordinal range"))
}

/// First `EXCERPT_CHARS` characters, with an ellipsis when truncated.
/// Char-based so multi-byte input never splits a boundary.
fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ScoreParser {
        ScoreParser::new(EvaluationFallbacks::default())
    }

    #[test]
    fn exact_score_and_rationale() {
        let result = parser().parse("Score: 3\nRationale: Engaged with the premise directly.");
        assert_eq!(result.score, DepthScore::Profound);
        assert_eq!(result.rationale, "Engaged with the premise directly.");
        assert_eq!(result.outcome, ParseOutcome::Exact);
    }

    #[test]
    fn tokens_are_case_insensitive() {
        let result = parser().parse("score: 1 rationale: evasive and generic");
        assert_eq!(result.score, DepthScore::Shallow);
        assert_eq!(result.rationale, "evasive and generic");
        assert_eq!(result.outcome, ParseOutcome::Exact);
    }

    #[test]
    fn rationale_spans_to_end_of_text() {
        let result = parser().parse("Score: 2 Rationale: first sentence. second sentence.");
        assert_eq!(result.rationale, "first sentence. second sentence.");
    }

    #[test]
    fn blank_rationale_counts_as_absent() {
        let result = parser().parse("Score: 2 Rationale:   ");
        assert_eq!(result.score, DepthScore::Partial);
        assert_eq!(result.outcome, ParseOutcome::ScoreOnly);
        assert!(!result.rationale.is_empty());
    }

    #[test]
    fn score_only_uses_placeholder() {
        let result = parser().parse("Score: 2 -- the rest is commentary");
        assert_eq!(result.score, DepthScore::Partial);
        assert_eq!(
            result.rationale,
            EvaluationFallbacks::default().rationale_not_articulated
        );
        assert_eq!(result.outcome, ParseOutcome::ScoreOnly);
    }

    #[test]
    fn bare_digit() {
        let result = parser().parse("3");
        assert_eq!(result.score, DepthScore::Profound);
        assert_eq!(result.outcome, ParseOutcome::BareDigit);
        assert_eq!(
            result.rationale,
            EvaluationFallbacks::default().rationale_no_rationale
        );
    }

    #[test]
    fn digit_outside_range_is_unparsed() {
        let result = parser().parse("4");
        assert_eq!(result.score, DepthScore::Partial);
        assert_eq!(result.outcome, ParseOutcome::Unparsed);
    }

    #[test]
    fn unparseable_embeds_truncated_excerpt() {
        let long_input = "x".repeat(250);
        let result = parser().parse(&long_input);
        assert_eq!(result.score, DepthScore::Partial);
        assert_eq!(result.outcome, ParseOutcome::Unparsed);
        let embedded = format!("{}...", "x".repeat(100));
        assert!(result.rationale.contains(&embedded));
        assert!(!result.rationale.contains(&"x".repeat(101)));
    }

    #[test]
    fn short_unparseable_is_not_truncated() {
        let result = parser().parse("the model rambled");
        assert!(result.rationale.contains("the model rambled"));
        assert!(!result.rationale.contains("..."));
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        let input = "日本語の長い評価テキスト".repeat(30);
        let result = parser().parse(&input);
        assert_eq!(result.outcome, ParseOutcome::Unparsed);
    }

    #[test]
    fn empty_input_is_unparsed() {
        let result = parser().parse("");
        assert_eq!(result.score, DepthScore::Partial);
        assert_eq!(result.outcome, ParseOutcome::Unparsed);
    }
}
