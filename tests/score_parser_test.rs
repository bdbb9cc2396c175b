//! Integration tests for the evaluator score parser's fallback ladder.

use socratic::domain::models::config::EvaluationFallbacks;
use socratic::domain::models::{DepthScore, ParseOutcome};
use socratic::ScoreParser;

fn parser() -> ScoreParser {
    ScoreParser::new(EvaluationFallbacks::default())
}

#[test]
fn exact_pair_is_returned_trimmed() {
    let result = parser().parse("Score: 2   Rationale:   misses the systemic angle.  ");
    assert_eq!(result.score, DepthScore::Partial);
    assert_eq!(result.rationale, "misses the systemic angle.");
    assert_eq!(result.outcome, ParseOutcome::Exact);
}

#[test]
fn exact_pair_survives_surrounding_prose() {
    let text = "After careful consideration of the criteria, here is my verdict. \
Score: 3 Rationale: the expert named the cost of their own position.";
    let result = parser().parse(text);
    assert_eq!(result.score, DepthScore::Profound);
    assert_eq!(
        result.rationale,
        "the expert named the cost of their own position."
    );
}

#[test]
fn bare_digit_gets_fixed_placeholder() {
    for digit in ["1", "2", "3"] {
        let result = parser().parse(digit);
        assert_eq!(result.score.value().to_string(), digit);
        assert_eq!(result.outcome, ParseOutcome::BareDigit);
        assert_eq!(
            result.rationale,
            EvaluationFallbacks::default().rationale_no_rationale
        );
    }
}

#[test]
fn score_without_rationale_gets_articulation_placeholder() {
    let result = parser().parse("Score: 1");
    assert_eq!(result.score, DepthScore::Shallow);
    assert_eq!(result.outcome, ParseOutcome::ScoreOnly);
    assert_eq!(
        result.rationale,
        EvaluationFallbacks::default().rationale_not_articulated
    );
}

#[test]
fn unmatched_input_degrades_to_neutral_with_excerpt() {
    let raw = "The response demonstrates a remarkable quality that resists numerical \
categorization, and I would rather discuss the weather.";
    let result = parser().parse(raw);
    assert_eq!(result.score, DepthScore::Partial);
    assert_eq!(result.outcome, ParseOutcome::Unparsed);
    // 100 chars + ellipsis at most.
    let excerpt: String = raw.chars().take(100).collect();
    assert!(result.rationale.contains(&excerpt));
}

#[test]
fn excerpt_is_capped_at_one_hundred_chars_plus_ellipsis() {
    let raw = "y".repeat(400);
    let result = parser().parse(&raw);
    let expected = format!("{}...", "y".repeat(100));
    assert!(result.rationale.contains(&expected));
    assert!(!result.rationale.contains(&"y".repeat(104)));
}

#[test]
fn custom_fallback_strings_are_used() {
    let fallbacks = EvaluationFallbacks {
        rationale_not_articulated: "custom: not articulated".to_string(),
        rationale_no_rationale: "custom: bare digit".to_string(),
        rationale_parse_error_prefix: "custom parse prefix:".to_string(),
        rationale_exception_prefix: "custom exception prefix:".to_string(),
    };
    let parser = ScoreParser::new(fallbacks);

    assert_eq!(parser.parse("Score: 2").rationale, "custom: not articulated");
    assert_eq!(parser.parse("1").rationale, "custom: bare digit");
    assert!(parser.parse("???").rationale.starts_with("custom parse prefix:"));
}
