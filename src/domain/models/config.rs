//! Configuration tree for the interview system.
//!
//! Every knob has a documented default so a bare config file (or none at
//! all) yields a runnable system. Prompt templates use `{name}` placeholders;
//! required placeholders are validated when the config is loaded, not when a
//! prompt is formatted.

use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub interview: InterviewConfig,

    #[serde(default)]
    pub persona: PersonaConfig,

    #[serde(default)]
    pub prompts: PromptsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub transcript: TranscriptConfig,
}

/// Model id plus sampling temperature for one generation role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelProfile {
    pub model: String,
    pub temperature: f32,
}

/// Generation backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Base URL of the Ollama-compatible generation endpoint.
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,

    /// Model and temperature used for host question generation.
    #[serde(default = "default_host_profile")]
    pub host: ModelProfile,

    /// Model and temperature used for expert responses.
    #[serde(default = "default_expert_profile")]
    pub expert: ModelProfile,

    /// Model and temperature used for depth evaluation. Runs cold so the
    /// structured output stays parseable.
    #[serde(default = "default_evaluator_profile")]
    pub evaluator: ModelProfile,

    /// Soft word cap stated in the expert prompt.
    #[serde(default = "default_expert_response_max_words")]
    pub expert_response_max_words: u32,
}

fn default_generation_endpoint() -> String {
    "http://localhost:11434".to_string()
}

const fn default_generation_timeout_secs() -> u64 {
    300
}

fn default_host_profile() -> ModelProfile {
    ModelProfile {
        model: "qwen3:4b".to_string(),
        temperature: 0.85,
    }
}

fn default_expert_profile() -> ModelProfile {
    ModelProfile {
        model: "qwen3:4b".to_string(),
        temperature: 0.7,
    }
}

fn default_evaluator_profile() -> ModelProfile {
    ModelProfile {
        model: "qwen3:4b".to_string(),
        temperature: 0.1,
    }
}

const fn default_expert_response_max_words() -> u32 {
    200
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            timeout_secs: default_generation_timeout_secs(),
            host: default_host_profile(),
            expert: default_expert_profile(),
            evaluator: default_evaluator_profile(),
            expert_response_max_words: default_expert_response_max_words(),
        }
    }
}

/// Which knowledge-store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeBackendKind {
    /// In-process store with token-overlap ranking. No external service.
    Memory,
    /// Chroma over HTTP, with embeddings generated via the Ollama
    /// embeddings endpoint.
    Chroma,
}

/// Knowledge-store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_backend")]
    pub backend: KnowledgeBackendKind,

    /// Base URL of the Chroma server (used when `backend = chroma`).
    #[serde(default = "default_knowledge_endpoint")]
    pub endpoint: String,

    /// Embedding model passed to the Ollama embeddings endpoint.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Collection holding previously successful challenge sequences.
    #[serde(default = "default_host_collection")]
    pub host_collection: String,

    /// Collection holding persona facts and ingested snippets.
    #[serde(default = "default_expert_collection")]
    pub expert_collection: String,

    /// Fragments retrieved as context for an expert answer.
    #[serde(default = "default_context_results")]
    pub context_results: usize,

    /// Pattern records injected as worked examples into follow-up prompts.
    #[serde(default = "default_pattern_examples")]
    pub pattern_examples: usize,

    /// ID prefix for success-pattern records.
    #[serde(default = "default_pattern_id_prefix")]
    pub pattern_id_prefix: String,

    /// ID prefix for ingested external snippets.
    #[serde(default = "default_snippet_id_prefix")]
    pub snippet_id_prefix: String,

    /// When true and a knowledge query comes back empty, a simulated web
    /// search snippet is ingested and used as context instead.
    #[serde(default = "default_simulated_search")]
    pub simulated_search: bool,
}

const fn default_knowledge_backend() -> KnowledgeBackendKind {
    KnowledgeBackendKind::Memory
}

fn default_knowledge_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_host_collection() -> String {
    "host_knowledge".to_string()
}

fn default_expert_collection() -> String {
    "expert_knowledge".to_string()
}

const fn default_context_results() -> usize {
    3
}

const fn default_pattern_examples() -> usize {
    2
}

fn default_pattern_id_prefix() -> String {
    "pattern_".to_string()
}

fn default_snippet_id_prefix() -> String {
    "web_doc_".to_string()
}

const fn default_simulated_search() -> bool {
    true
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            backend: default_knowledge_backend(),
            endpoint: default_knowledge_endpoint(),
            embedding_model: default_embedding_model(),
            host_collection: default_host_collection(),
            expert_collection: default_expert_collection(),
            context_results: default_context_results(),
            pattern_examples: default_pattern_examples(),
            pattern_id_prefix: default_pattern_id_prefix(),
            snippet_id_prefix: default_snippet_id_prefix(),
            simulated_search: default_simulated_search(),
        }
    }
}

/// Budgets and pacing for the interview loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InterviewConfig {
    /// Global cap on question+answer pairs, conclusion included.
    #[serde(default = "default_max_exchanges")]
    pub max_exchanges: u32,

    /// Follow-ups allowed per topic regardless of returned depth.
    #[serde(default = "default_max_follow_ups")]
    pub max_follow_ups: u32,

    /// Recent turns included in conversation history prompts.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Once every topic's best depth reaches this value, the topic loop may
    /// end without opening further topics.
    #[serde(default = "default_early_conclusion_min_depth")]
    pub early_conclusion_min_depth: u8,

    /// Topics to cover, in order.
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
}

const fn default_max_exchanges() -> u32 {
    15
}

const fn default_max_follow_ups() -> u32 {
    2
}

const fn default_history_window() -> usize {
    6
}

const fn default_early_conclusion_min_depth() -> u8 {
    3
}

fn default_topics() -> Vec<String> {
    vec![
        "Artificial intelligence and institutional power".to_string(),
        "Whether technology deepens or erodes public trust".to_string(),
        "What genuine accountability looks like in practice".to_string(),
    ]
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_exchanges: default_max_exchanges(),
            max_follow_ups: default_max_follow_ups(),
            history_window: default_history_window(),
            early_conclusion_min_depth: default_early_conclusion_min_depth(),
            topics: default_topics(),
        }
    }
}

/// Expert persona defaults and ingestion rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PersonaConfig {
    #[serde(default = "default_expert_name")]
    pub expert_name: String,

    #[serde(default = "default_expert_age")]
    pub expert_age: u32,

    /// Years the persona has had to evolve its thinking.
    #[serde(default = "default_years_evolved")]
    pub years_evolved: u32,

    /// Theme the scripted introduction steers toward.
    #[serde(default = "default_core_theme")]
    pub core_theme: String,

    /// Path of the persona document to ingest.
    #[serde(default = "default_persona_file")]
    pub persona_file: String,

    /// ID prefix for ingested persona fragments.
    #[serde(default = "default_fragment_id_prefix")]
    pub fragment_id_prefix: String,

    /// Fragments shorter than this (after cleanup) are dropped as noise.
    #[serde(default = "default_min_fragment_len")]
    pub min_fragment_len: usize,

    /// Speaker tag marking host-authored paragraphs, which are dropped.
    #[serde(default = "default_host_tag")]
    pub host_tag: String,

    /// Speaker tag stripped from the front of expert paragraphs.
    #[serde(default = "default_expert_tag")]
    pub expert_tag: String,

    /// Lower-cased prefixes marking section-label paragraphs to drop.
    #[serde(default = "default_section_label_prefixes")]
    pub section_label_prefixes: Vec<String>,

    /// Phrases signaling a retreat to rehearsed, low-depth answers.
    #[serde(default = "default_comfort_zone_phrases")]
    pub comfort_zone_phrases: Vec<String>,
}

fn default_expert_name() -> String {
    "The Expert".to_string()
}

const fn default_expert_age() -> u32 {
    70
}

const fn default_years_evolved() -> u32 {
    30
}

fn default_core_theme() -> String {
    "the arc of their life's work".to_string()
}

fn default_persona_file() -> String {
    ".socratic/persona.md".to_string()
}

fn default_fragment_id_prefix() -> String {
    "persona_doc_".to_string()
}

const fn default_min_fragment_len() -> usize {
    20
}

fn default_host_tag() -> String {
    "HOST".to_string()
}

fn default_expert_tag() -> String {
    "EXPERT".to_string()
}

fn default_section_label_prefixes() -> Vec<String> {
    [
        "featured persona:",
        "theme:",
        "background evolution",
        "core unchanging values",
        "evolutionary developments",
        "style evolution",
        "recursive questioning triggers",
        "self-correction moments",
        "modern issues synthesis",
        "failsafes",
        "voice synthesis notes",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_comfort_zone_phrases() -> Vec<String> {
    [
        "as i have always said",
        "my core values",
        "we must remember",
        "history teaches us",
        "at the end of the day",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            expert_name: default_expert_name(),
            expert_age: default_expert_age(),
            years_evolved: default_years_evolved(),
            core_theme: default_core_theme(),
            persona_file: default_persona_file(),
            fragment_id_prefix: default_fragment_id_prefix(),
            min_fragment_len: default_min_fragment_len(),
            host_tag: default_host_tag(),
            expert_tag: default_expert_tag(),
            section_label_prefixes: default_section_label_prefixes(),
            comfort_zone_phrases: default_comfort_zone_phrases(),
        }
    }
}

/// Fixed rationale strings used by the score parser's fallback ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluationFallbacks {
    #[serde(default = "default_rationale_not_articulated")]
    pub rationale_not_articulated: String,

    #[serde(default = "default_rationale_no_rationale")]
    pub rationale_no_rationale: String,

    #[serde(default = "default_rationale_parse_error_prefix")]
    pub rationale_parse_error_prefix: String,

    #[serde(default = "default_rationale_exception_prefix")]
    pub rationale_exception_prefix: String,
}

fn default_rationale_not_articulated() -> String {
    "Rationale not clearly articulated by evaluator.".to_string()
}

fn default_rationale_no_rationale() -> String {
    "No rationale provided (single number response).".to_string()
}

fn default_rationale_parse_error_prefix() -> String {
    "Default score due to parsing error. Raw output:".to_string()
}

fn default_rationale_exception_prefix() -> String {
    "Default score due to exception during parsing:".to_string()
}

impl Default for EvaluationFallbacks {
    fn default() -> Self {
        Self {
            rationale_not_articulated: default_rationale_not_articulated(),
            rationale_no_rationale: default_rationale_no_rationale(),
            rationale_parse_error_prefix: default_rationale_parse_error_prefix(),
            rationale_exception_prefix: default_rationale_exception_prefix(),
        }
    }
}

/// Prompt templates with named `{placeholder}` substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PromptsConfig {
    /// Fixed persona preamble for host question generation.
    #[serde(default = "default_host_persona")]
    pub host_persona: String,

    /// Scripted introduction appended as the opening Host turn.
    /// Placeholders: `{expert_name}`, `{years_evolved}`, `{core_theme}`.
    #[serde(default = "default_host_introduction")]
    pub host_introduction: String,

    /// Opening question prompt. Placeholders: `{host_persona}`, `{topic}`.
    #[serde(default = "default_opening_question")]
    pub opening_question: String,

    /// Follow-up question prompt. Placeholders: `{host_persona}`,
    /// `{conversation_history}`, `{expert_response}`, `{pattern_examples}`.
    #[serde(default = "default_follow_up_question")]
    pub follow_up_question: String,

    /// Expert answer prompt. Placeholders: `{expert_name}`, `{expert_age}`,
    /// `{years_evolved}`, `{relevant_knowledge}`, `{conversation_history}`,
    /// `{question}`, `{max_words}`.
    #[serde(default = "default_expert_response")]
    pub expert_response: String,

    /// Depth evaluation prompt. Placeholders: `{question}`, `{response}`.
    #[serde(default = "default_evaluation")]
    pub evaluation: String,

    /// Closing synthesis prompt. Placeholders: `{host_persona}`,
    /// `{total_exchanges}`, `{average_depth}`, `{comfort_summary}`,
    /// `{breakthrough_summary}`.
    #[serde(default = "default_conclusion")]
    pub conclusion: String,

    /// Simulated web search result. Placeholder: `{query}`.
    #[serde(default = "default_web_search_placeholder")]
    pub web_search_placeholder: String,

    /// Sentinel substituted when a follow-up has no prior answer text.
    #[serde(default = "default_missing_answer_sentinel")]
    pub missing_answer_sentinel: String,

    #[serde(default)]
    pub evaluation_fallbacks: EvaluationFallbacks,
}

fn default_host_persona() -> String {
    "You are the host of a long-form interview program dedicated to philosophical inquiry and \
the pursuit of uncomfortable truths.\n\
Your questioning philosophy employs the Socratic method and relentless investigative \
persistence. You are respectfully aggressive in your pursuit of clarity.\n\
Your primary function is comfort disruption: you actively guide conversations beyond safe, \
superficial territory into areas of genuine intellectual discomfort and potential growth.\n\
While you challenge rigorously, you also embody intellectual humility: you acknowledge when \
the expert introduces a genuinely new perspective that expands understanding.\n\
Every question must serve the goal of deep understanding rather than mere entertainment."
        .to_string()
}

fn default_host_introduction() -> String {
    "Welcome. Tonight we sit down with {expert_name}, who has had {years_evolved} years to \
revise, defend, and sometimes abandon their convictions. We begin, as always, with \
{core_theme} -- and we will not settle for the rehearsed version."
        .to_string()
}

fn default_opening_question() -> String {
    "{host_persona}\n\n\
Topic: {topic}\n\
Your job is to create an opening question that seems comfortable but sets up future \
challenging. Ensure the question is open-ended and invites a detailed response, not a \
simple yes/no. The question should subtly guide the expert towards the core themes you \
intend to explore, without revealing your hand too early.\n\n\
Opening question:"
        .to_string()
}

fn default_follow_up_question() -> String {
    "{host_persona}\n\n\
Review the following conversation history and the expert's latest response:\n\
<conversation_history>\n{conversation_history}\n</conversation_history>\n\n\
<expert_response>\n{expert_response}\n</expert_response>\n\n\
Challenge sequences that worked in past interviews:\n{pattern_examples}\n\n\
Your mission is to formulate a follow-up question that challenges the expert and pushes \
for deeper insight. Specifically consider:\n\
- Assumptions Uncovered: what unstated assumptions might underlie the response?\n\
- Contradictions: does this response contradict previous statements or known facts?\n\
- Evidence: where is the expert's support for their claims thin?\n\
- Evasion: is the expert engaging with the core of the question, or answering safely?\n\
- Path to Deeper Understanding: what question would force the foundational principles, \
implications, or unexplored facets into the open?\n\n\
Generate a single, concise, powerful follow-up question that moves the expert into \
uncomfortable but insightful territory.\n\
Follow-up question:"
        .to_string()
}

fn default_expert_response() -> String {
    "You are {expert_name}, age {expert_age}. You have had {years_evolved} years to evolve \
your thinking while holding on to your core values.\n\n\
Your relevant knowledge:\n{relevant_knowledge}\n\n\
Conversation so far:\n{conversation_history}\n\n\
Current question: {question}\n\n\
Respond authentically, with the wisdom of the additional years and the weight of having \
seen both progress and regression. Keep the response focused and under {max_words} words.\n\n\
Your response:"
        .to_string()
}

fn default_evaluation() -> String {
    "You are an evaluation AI for an interview system. Assess the depth and quality of an \
expert's response.\n\n\
Question: {question}\n\
Expert's Response: {response}\n\n\
Evaluate the response on these criteria:\n\
- Depth & Insight: surface-level, or offering profound insight beyond common knowledge?\n\
- Directness & Evasion: does it address the core of the question, or deflect?\n\
- Completeness & Nuance: does it explore the topic, or leave obvious gaps?\n\
- Authenticity: does it sound like a thoughtful expert, or generic output?\n\n\
Based on this evaluation, provide:\n\
1. A numerical score:\n\
   1: Surface-level, evasive, or significantly lacking depth. Requires a strong follow-up.\n\
   2: Partially deep or adequate, but could be pushed further. A follow-up is recommended.\n\
   3: Genuinely profound, insightful, and direct. No immediate follow-up needed.\n\
2. A brief rationale (1-2 sentences) explaining your score.\n\n\
Format your output as:\n\
Score: [1, 2, or 3]\n\
Rationale: [Your brief rationale]"
        .to_string()
}

fn default_conclusion() -> String {
    "{host_persona}\n\n\
The interview is over. Compose a brief closing synthesis for the audience.\n\n\
Session facts:\n\
- Total exchanges: {total_exchanges}\n\
- Average depth achieved across topics (1-3): {average_depth}\n\
- Phrases the expert retreated to most often: {comfort_summary}\n\
- Breakthrough moments: {breakthrough_summary}\n\n\
Name where the conversation broke through to something real, and where the expert stayed \
inside rehearsed territory. Close with one question the audience should keep asking.\n\n\
Closing synthesis:"
        .to_string()
}

fn default_web_search_placeholder() -> String {
    "Placeholder search result: recent analysis on '{query}' suggests ongoing debate, \
particularly around its broader implications and future trends. Some studies point to \
emerging complexities, while public discourse reveals a spectrum of perspectives."
        .to_string()
}

fn default_missing_answer_sentinel() -> String {
    "[Expert's previous response was not provided for analysis]".to_string()
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            host_persona: default_host_persona(),
            host_introduction: default_host_introduction(),
            opening_question: default_opening_question(),
            follow_up_question: default_follow_up_question(),
            expert_response: default_expert_response(),
            evaluation: default_evaluation(),
            conclusion: default_conclusion(),
            web_search_placeholder: default_web_search_placeholder(),
            missing_answer_sentinel: default_missing_answer_sentinel(),
            evaluation_fallbacks: EvaluationFallbacks::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Transcript file sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TranscriptConfig {
    /// Directory transcripts are written into.
    #[serde(default = "default_transcript_dir")]
    pub dir: String,

    #[serde(default = "default_transcript_prefix")]
    pub filename_prefix: String,

    #[serde(default = "default_transcript_suffix")]
    pub filename_suffix: String,
}

fn default_transcript_dir() -> String {
    ".".to_string()
}

fn default_transcript_prefix() -> String {
    "interview_".to_string()
}

fn default_transcript_suffix() -> String {
    ".json".to_string()
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            dir: default_transcript_dir(),
            filename_prefix: default_transcript_prefix(),
            filename_suffix: default_transcript_suffix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = Config::default();
        assert_eq!(config.interview.max_exchanges, 15);
        assert_eq!(config.interview.max_follow_ups, 2);
        assert_eq!(config.interview.history_window, 6);
        assert_eq!(config.knowledge.context_results, 3);
        assert_eq!(config.persona.min_fragment_len, 20);
        assert!(config.prompts.opening_question.contains("{topic}"));
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: Config = serde_yaml::from_str("{}").expect("empty mapping should parse");
        assert_eq!(config.generation.host.model, "qwen3:4b");
        assert_eq!(config.knowledge.backend, KnowledgeBackendKind::Memory);
    }

    #[test]
    fn partial_yaml_overrides_merge_with_defaults() {
        let yaml = r"
interview:
  max_exchanges: 5
  topics:
    - only topic
knowledge:
  backend: chroma
";
        let config: Config = serde_yaml::from_str(yaml).expect("yaml should parse");
        assert_eq!(config.interview.max_exchanges, 5);
        assert_eq!(config.interview.topics, vec!["only topic".to_string()]);
        assert_eq!(config.interview.max_follow_ups, 2);
        assert_eq!(config.knowledge.backend, KnowledgeBackendKind::Chroma);
        assert_eq!(config.knowledge.host_collection, "host_knowledge");
    }
}
