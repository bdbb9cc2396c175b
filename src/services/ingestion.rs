//! Persona knowledge ingestion.
//!
//! Parses a semi-structured persona document (paragraph-separated, with
//! speaker tags and section headers) into discrete knowledge fragments and
//! loads them into the expert knowledge base. A missing source document
//! degrades to a built-in minimal fragment set; the expert collection is
//! never left completely empty.

use regex::Regex;
use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{KnowledgeFragment, PersonaConfig};
use crate::services::knowledge::KnowledgeService;

/// Parses persona documents into expert knowledge fragments.
pub struct PersonaIngestor {
    config: PersonaConfig,
    heading: Regex,
    blank_runs: Regex,
}

impl PersonaIngestor {
    pub fn new(config: PersonaConfig) -> Self {
        Self {
            config,
            heading: Regex::new(r"(?m)^#+ ?").expect("heading pattern is valid"),
            blank_runs: Regex::new(r"\n+").expect("blank-run pattern is valid"),
        }
    }

    /// Read the persona file and load its fragments. Falls back to the
    /// built-in minimal set when the source cannot be read.
    pub async fn ingest(&self, knowledge: &KnowledgeService) -> DomainResult<usize> {
        let path = &self.config.persona_file;
        let fragments = match tokio::fs::read_to_string(path).await {
            Ok(content) => self.parse_fragments(&content),
            Err(err) => {
                warn!(path = %path, error = %err, "persona source unreadable, using built-in fallback");
                self.fallback_fragments()
            }
        };

        let count = knowledge.seed_fragments(fragments).await?;
        info!(path = %path, count, "expert knowledge initialized");
        Ok(count)
    }

    /// Split `content` into paragraphs and apply the cleanup rules in order:
    /// drop host-authored paragraphs, strip speaker tags and heading
    /// markers, drop section labels and separators, collapse blank runs,
    /// and drop fragments shorter than the minimum length.
    pub fn parse_fragments(&self, content: &str) -> Vec<KnowledgeFragment> {
        let host_markers = [
            format!("**{}:", self.config.host_tag),
            format!("{}:", self.config.host_tag),
        ];
        let expert_bold_tag = format!("**{}:** ", self.config.expert_tag);
        let expert_plain_tag = format!("{}: ", self.config.expert_tag);

        let mut fragments = Vec::new();
        for chunk in content.split("\n\n") {
            let mut text = chunk.trim().to_string();

            if host_markers.iter().any(|marker| text.starts_with(marker)) {
                continue;
            }

            if let Some(rest) = text.strip_prefix(&expert_bold_tag) {
                text = rest.to_string();
            } else if let Some(rest) = text.strip_prefix(&expert_plain_tag) {
                text = rest.to_string();
            }

            text = self.heading.replace_all(&text, "").to_string();

            if text.starts_with("---") {
                continue;
            }
            let lowered = text.to_lowercase();
            if self
                .config
                .section_label_prefixes
                .iter()
                .any(|prefix| lowered.starts_with(prefix))
            {
                continue;
            }

            text = self.blank_runs.replace_all(&text, "\n").trim().to_string();

            if text.chars().count() < self.config.min_fragment_len {
                continue;
            }

            let id = format!("{}{}", self.config.fragment_id_prefix, fragments.len() + 1);
            fragments.push(
                KnowledgeFragment::new(id, text)
                    .with_metadata("source", self.config.persona_file.as_str()),
            );
        }
        fragments
    }

    /// Minimal built-in knowledge used when the persona source is missing,
    /// tagged with the same (unreachable) source path.
    fn fallback_fragments(&self) -> Vec<KnowledgeFragment> {
        let texts = [
            format!(
                "I am {}, and I have had {} years to test my convictions against events I never \
expected to witness. My core values have held; my sense of what they demand has not stood still.",
                self.config.expert_name, self.config.years_evolved
            ),
            "Experience has taught me to distrust any answer that arrives too quickly. The \
questions that matter are the ones that stay uncomfortable after the applause ends."
                .to_string(),
        ];
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                KnowledgeFragment::new(
                    format!("{}{}", self.config.fragment_id_prefix, i + 1),
                    text,
                )
                .with_metadata("source", self.config.persona_file.as_str())
            })
            .collect()
    }
}
