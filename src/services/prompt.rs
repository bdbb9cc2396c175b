//! Prompt template rendering with named placeholders.
//!
//! Templates come from the loosely typed config tree; the contract is
//! `{name}` substitution. Presence of required placeholders is validated at
//! config-load time (see `REQUIRED_PLACEHOLDERS`), so rendering itself is
//! infallible.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PromptsConfig;

/// Required placeholders per template, checked at load time.
pub const REQUIRED_PLACEHOLDERS: &[(&str, &[&str])] = &[
    ("host_introduction", &["expert_name", "years_evolved", "core_theme"]),
    ("opening_question", &["host_persona", "topic"]),
    (
        "follow_up_question",
        &[
            "host_persona",
            "conversation_history",
            "expert_response",
            "pattern_examples",
        ],
    ),
    (
        "expert_response",
        &[
            "expert_name",
            "expert_age",
            "years_evolved",
            "relevant_knowledge",
            "conversation_history",
            "question",
            "max_words",
        ],
    ),
    ("evaluation", &["question", "response"]),
    (
        "conclusion",
        &[
            "host_persona",
            "total_exchanges",
            "average_depth",
            "comfort_summary",
            "breakthrough_summary",
        ],
    ),
    ("web_search_placeholder", &["query"]),
];

/// Substitute `{name}` placeholders. Unknown placeholders are left as-is;
/// missing ones were already rejected at load time.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{name}}}"), value);
    }
    rendered
}

/// Validate that every template in the config carries its required
/// placeholders. Called by the config loader.
pub fn validate_templates(prompts: &PromptsConfig) -> DomainResult<()> {
    for (name, required) in REQUIRED_PLACEHOLDERS {
        let template = template_by_name(prompts, name);
        for placeholder in *required {
            if !template.contains(&format!("{{{placeholder}}}")) {
                return Err(DomainError::TemplatePlaceholder {
                    template: (*name).to_string(),
                    placeholder: (*placeholder).to_string(),
                });
            }
        }
    }
    Ok(())
}

fn template_by_name<'a>(prompts: &'a PromptsConfig, name: &str) -> &'a str {
    match name {
        "host_introduction" => &prompts.host_introduction,
        "opening_question" => &prompts.opening_question,
        "follow_up_question" => &prompts.follow_up_question,
        "expert_response" => &prompts.expert_response,
        "evaluation" => &prompts.evaluation,
        "conclusion" => &prompts.conclusion,
        "web_search_placeholder" => &prompts.web_search_placeholder,
        _ => unreachable!("unknown template name in REQUIRED_PLACEHOLDERS"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_named_placeholders() {
        let out = render("Topic: {topic}, again {topic} for {name}", &[
            ("topic", "trust"),
            ("name", "Ada"),
        ]);
        assert_eq!(out, "Topic: trust, again trust for Ada");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        assert_eq!(render("{known} {unknown}", &[("known", "v")]), "v {unknown}");
    }

    #[test]
    fn default_templates_pass_validation() {
        validate_templates(&PromptsConfig::default()).expect("defaults must validate");
    }

    #[test]
    fn missing_placeholder_is_rejected() {
        let mut prompts = PromptsConfig::default();
        prompts.opening_question = "no placeholders at all".to_string();
        let err = validate_templates(&prompts).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("opening_question"));
        assert!(message.contains("host_persona"));
    }
}
