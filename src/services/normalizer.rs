//! Text normalization for generated output.
//!
//! Models emit reasoning blocks and uneven whitespace around the text we
//! actually want. Everything that reaches the session log or the score
//! parser goes through here first.

use regex::Regex;

/// Strips reasoning markup and redundant whitespace from generated text.
pub struct TextNormalizer {
    think_block: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            // (?s) so the block may span lines; non-greedy so multiple
            // blocks in one response are each removed.
            think_block: Regex::new(r"(?s)<think>.*?</think>")
                .expect("think-block pattern is valid"),
        }
    }

    /// Remove `<think>...</think>` blocks and collapse all whitespace runs
    /// to single spaces.
    pub fn normalize(&self, raw: &str) -> String {
        let stripped = self.think_block.replace_all(raw, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_think_blocks() {
        let normalizer = TextNormalizer::new();
        let raw = "<think>the user wants depth, let me deflect</think>The answer is trust.";
        assert_eq!(normalizer.normalize(raw), "The answer is trust.");
    }

    #[test]
    fn strips_multiple_think_blocks() {
        let normalizer = TextNormalizer::new();
        let raw = "<think>one</think>First.<think>two\nacross lines</think> Second.";
        assert_eq!(normalizer.normalize(raw), "First. Second.");
    }

    #[test]
    fn collapses_whitespace() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("  a\n\n response \t with   gaps  "),
            "a response with gaps"
        );
    }

    #[test]
    fn unterminated_block_is_left_alone() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("<think>never closed... An answer."),
            "<think>never closed... An answer."
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(TextNormalizer::new().normalize(""), "");
    }
}
