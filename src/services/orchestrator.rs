//! Dialogue orchestrator: the depth-gated interview state machine.
//!
//! Drives topic iteration, opening and follow-up question generation,
//! expert response generation, depth evaluation, escalation policy,
//! comfort-pattern detection, breakthrough detection, and pattern feedback
//! write-back. Strictly sequential: every generation call completes before
//! the next step proceeds.

use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Breakthrough, Config, DepthScore, EvaluationResult, InterviewSession, ModelProfile, Role,
};
use crate::domain::ports::SamplingOptions;
use crate::services::gateway::GenerationGateway;
use crate::services::knowledge::KnowledgeService;
use crate::services::normalizer::TextNormalizer;
use crate::services::prompt;
use crate::services::score_parser::ScoreParser;

/// Topic string attached to the scripted introduction turn.
const INTRODUCTION_TOPIC: &str = "introduction";

/// Topic string attached to the closing synthesis turn.
const CONCLUSION_TOPIC: &str = "conclusion";

/// Runs one complete interview session.
pub struct InterviewOrchestrator {
    gateway: GenerationGateway,
    knowledge: KnowledgeService,
    normalizer: TextNormalizer,
    parser: ScoreParser,
    config: Config,
}

impl InterviewOrchestrator {
    pub fn new(gateway: GenerationGateway, knowledge: KnowledgeService, config: Config) -> Self {
        let parser = ScoreParser::new(config.prompts.evaluation_fallbacks.clone());
        Self {
            gateway,
            knowledge,
            normalizer: TextNormalizer::new(),
            parser,
            config,
        }
    }

    /// Run the full state machine:
    /// `Opening -> {TopicQuestion -> ExpertAnswer -> Evaluate -> FollowUp*}*
    /// -> Conclusion`.
    ///
    /// A generation or evaluation failure aborts the run; evaluator output
    /// that merely fails to parse never does.
    pub async fn run(&self) -> DomainResult<InterviewSession> {
        let topics = self.config.interview.topics.clone();
        let mut session =
            InterviewSession::new(self.config.persona.expert_name.as_str(), &topics);
        info!(
            expert = %session.expert_name,
            topics = topics.len(),
            max_exchanges = self.config.interview.max_exchanges,
            "interview starting"
        );

        self.open_session(&mut session);

        for topic in &topics {
            if !self.budget_allows_exchange(&session) {
                info!("remaining budget reserved for conclusion, closing topic loop");
                break;
            }
            if self.early_conclusion_reached(&session) {
                info!("every topic at target depth, concluding early");
                break;
            }
            self.run_topic(&mut session, topic).await?;
        }

        self.conclude(&mut session).await?;
        Ok(session)
    }

    /// Append the scripted host introduction. No generation call, no
    /// exchange spent.
    fn open_session(&self, session: &mut InterviewSession) {
        let persona = &self.config.persona;
        let introduction = prompt::render(
            &self.config.prompts.host_introduction,
            &[
                ("expert_name", persona.expert_name.as_str()),
                ("years_evolved", &persona.years_evolved.to_string()),
                ("core_theme", persona.core_theme.as_str()),
            ],
        );
        session.record_turn(Role::Host, introduction, INTRODUCTION_TOPIC);
    }

    /// One topic: opening question, answer, evaluation, then the
    /// escalation loop and (possibly) pattern write-back.
    async fn run_topic(&self, session: &mut InterviewSession, topic: &str) -> DomainResult<()> {
        info!(topic, "opening topic");

        let question = self.opening_question(topic).await?;
        let answer = self.expert_answer(session, &question).await?;
        self.commit_exchange(session, topic, &question, &answer);

        let evaluation = self.evaluate(&question, &answer).await?;
        debug!(
            topic,
            depth = %evaluation.score,
            outcome = ?evaluation.outcome,
            rationale = %evaluation.rationale,
            "opening answer evaluated"
        );
        session.record_depth(topic, evaluation.score);

        let mut depth = evaluation.score;
        let mut last_answer = answer;
        let mut last_rationale = evaluation.rationale;
        let mut last_follow_up: Option<String> = None;
        let mut follow_ups = 0u32;

        while depth < DepthScore::MAX
            && follow_ups < self.config.interview.max_follow_ups
            && self.budget_allows_exchange(session)
        {
            debug!(topic, follow_ups, "pushing deeper");

            // Exactly one generation call per follow-up turn; the same
            // question string feeds the turn log, the breakthrough event,
            // and the pattern write-back.
            let follow_up = self.follow_up_question(session, topic, &last_answer).await?;
            let answer = self.expert_answer(session, &follow_up).await?;
            self.commit_exchange(session, topic, &follow_up, &answer);

            let evaluation = self.evaluate(&follow_up, &answer).await?;
            debug!(
                topic,
                depth = %evaluation.score,
                outcome = ?evaluation.outcome,
                rationale = %evaluation.rationale,
                "follow-up answer evaluated"
            );

            if is_breakthrough(depth, evaluation.score) {
                info!(
                    topic,
                    from = %depth,
                    to = %evaluation.score,
                    "breakthrough detected"
                );
                session.record_breakthrough(Breakthrough {
                    topic: topic.to_string(),
                    depth_before: depth,
                    depth_after: evaluation.score,
                    question: follow_up.clone(),
                    response: answer.clone(),
                    rationale: evaluation.rationale.clone(),
                });
            }

            session.record_depth(topic, evaluation.score);
            depth = evaluation.score;
            last_answer = answer;
            last_rationale = evaluation.rationale;
            last_follow_up = Some(follow_up);
            follow_ups += 1;
        }

        // The only form of learning: a depth-3 reached through at least one
        // follow-up writes the eliciting sequence back into host memory.
        if session.best_depth(topic) == Some(DepthScore::MAX) {
            if let Some(question) = last_follow_up {
                self.knowledge
                    .record_success_pattern(
                        topic,
                        &question,
                        &last_answer,
                        &last_rationale,
                        session.turns().len(),
                    )
                    .await?;
            }
        }

        Ok(())
    }

    /// Opening question from the persona preamble plus the topic string.
    /// No prior-answer context.
    async fn opening_question(&self, topic: &str) -> DomainResult<String> {
        let prompt_text = prompt::render(
            &self.config.prompts.opening_question,
            &[
                ("host_persona", self.config.prompts.host_persona.as_str()),
                ("topic", topic),
            ],
        );
        let raw = self
            .generate("opening_question", &self.config.generation.host, &prompt_text)
            .await?;
        Ok(self.normalizer.normalize(&raw))
    }

    /// Follow-up question referencing the verbatim prior expert answer,
    /// with retrieved success patterns injected as worked examples.
    async fn follow_up_question(
        &self,
        session: &InterviewSession,
        topic: &str,
        last_answer: &str,
    ) -> DomainResult<String> {
        let prior_answer = if last_answer.is_empty() {
            self.config.prompts.missing_answer_sentinel.clone()
        } else {
            last_answer.to_string()
        };

        let patterns = self.knowledge.host_patterns(topic).await?;
        let examples = if patterns.is_empty() {
            "(none recorded yet)".to_string()
        } else {
            patterns
                .iter()
                .enumerate()
                .map(|(i, pattern)| format!("{}. {pattern}", i + 1))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let history = session.history_window(self.config.interview.history_window);
        let prompt_text = prompt::render(
            &self.config.prompts.follow_up_question,
            &[
                ("host_persona", self.config.prompts.host_persona.as_str()),
                ("conversation_history", history.as_str()),
                ("expert_response", prior_answer.as_str()),
                ("pattern_examples", examples.as_str()),
            ],
        );
        let raw = self
            .generate("follow_up_question", &self.config.generation.host, &prompt_text)
            .await?;
        Ok(self.normalizer.normalize(&raw))
    }

    /// Expert answer conditioned on retrieved knowledge and the bounded
    /// history window. An empty retrieval is "no relevant knowledge"; when
    /// simulated search is enabled it is backfilled with an ingested
    /// snippet.
    async fn expert_answer(
        &self,
        session: &InterviewSession,
        question: &str,
    ) -> DomainResult<String> {
        let mut relevant_knowledge = self.knowledge.expert_context(question).await?;
        if relevant_knowledge.is_empty() && self.config.knowledge.simulated_search {
            let snippet = self.knowledge.simulated_snippet(question);
            self.knowledge
                .ingest_snippet(question, &snippet, session.turns().len())
                .await?;
            relevant_knowledge = snippet;
        }

        let persona = &self.config.persona;
        let history = session.history_window(self.config.interview.history_window);
        let prompt_text = prompt::render(
            &self.config.prompts.expert_response,
            &[
                ("expert_name", persona.expert_name.as_str()),
                ("expert_age", &persona.expert_age.to_string()),
                ("years_evolved", &persona.years_evolved.to_string()),
                ("relevant_knowledge", relevant_knowledge.as_str()),
                ("conversation_history", history.as_str()),
                ("question", question),
                (
                    "max_words",
                    &self.config.generation.expert_response_max_words.to_string(),
                ),
            ],
        );
        let raw = self
            .generate("expert_response", &self.config.generation.expert, &prompt_text)
            .await?;
        Ok(self.normalizer.normalize(&raw))
    }

    /// Evaluate one (question, answer) pair. The gateway call can fail the
    /// run; the parse never does.
    async fn evaluate(&self, question: &str, response: &str) -> DomainResult<EvaluationResult> {
        let prompt_text = prompt::render(
            &self.config.prompts.evaluation,
            &[("question", question), ("response", response)],
        );
        let raw = self
            .generate("depth_evaluation", &self.config.generation.evaluator, &prompt_text)
            .await?;
        let normalized = self.normalizer.normalize(&raw);
        Ok(self.parser.parse(&normalized))
    }

    /// Closing synthesis: total exchanges, top comfort phrases, average
    /// depth, breakthroughs. Consumes the reserved exchange.
    async fn conclude(&self, session: &mut InterviewSession) -> DomainResult<()> {
        let comfort_summary = {
            let top = session.top_comfort_phrases(3);
            if top.is_empty() {
                "none observed".to_string()
            } else {
                top.iter()
                    .map(|(phrase, count)| format!("\"{phrase}\" ({count}x)"))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        };

        let breakthrough_summary = if session.breakthroughs().is_empty() {
            "none".to_string()
        } else {
            session
                .breakthroughs()
                .iter()
                .map(|b| {
                    format!(
                        "{}: depth {} -> {} after \"{}\"",
                        b.topic, b.depth_before, b.depth_after, b.question
                    )
                })
                .collect::<Vec<_>>()
                .join("; ")
        };

        let prompt_text = prompt::render(
            &self.config.prompts.conclusion,
            &[
                ("host_persona", self.config.prompts.host_persona.as_str()),
                ("total_exchanges", &session.exchanges().to_string()),
                ("average_depth", &format!("{:.1}", session.average_best_depth())),
                ("comfort_summary", comfort_summary.as_str()),
                ("breakthrough_summary", breakthrough_summary.as_str()),
            ],
        );
        let raw = self
            .generate("conclusion", &self.config.generation.host, &prompt_text)
            .await?;
        let synthesis = self.normalizer.normalize(&raw);

        session.record_turn(Role::Host, synthesis, CONCLUSION_TOPIC);
        session.spend_exchange();
        info!(exchanges = session.exchanges(), "interview complete");
        Ok(())
    }

    async fn generate(
        &self,
        purpose: &str,
        profile: &ModelProfile,
        prompt_text: &str,
    ) -> DomainResult<String> {
        self.gateway
            .generate(
                purpose,
                &profile.model,
                prompt_text,
                &SamplingOptions::with_temperature(profile.temperature),
            )
            .await
    }

    /// Record the question+answer pair, scan the answer for comfort-zone
    /// phrases, and count the exchange. Runs after generation, never
    /// mid-generation.
    fn commit_exchange(
        &self,
        session: &mut InterviewSession,
        topic: &str,
        question: &str,
        answer: &str,
    ) {
        session.record_turn(Role::Host, question, topic);
        session.record_turn(Role::Expert, answer, topic);
        self.scan_comfort_phrases(session, answer);
        session.spend_exchange();
    }

    fn scan_comfort_phrases(&self, session: &mut InterviewSession, answer: &str) {
        let lowered = answer.to_lowercase();
        for phrase in &self.config.persona.comfort_zone_phrases {
            if lowered.contains(&phrase.to_lowercase()) {
                debug!(phrase = %phrase, "comfort-zone phrase detected");
                session.record_comfort_hit(phrase);
            }
        }
    }

    /// Whether one more question+answer pair still leaves room for the
    /// mandatory conclusion.
    fn budget_allows_exchange(&self, session: &InterviewSession) -> bool {
        session.exchanges() + 1 < self.config.interview.max_exchanges
    }

    /// Whether every configured topic already reached the early-conclusion
    /// depth threshold.
    fn early_conclusion_reached(&self, session: &InterviewSession) -> bool {
        let Some(threshold) =
            DepthScore::from_value(self.config.interview.early_conclusion_min_depth)
        else {
            return false;
        };
        !session.depth_map().is_empty() && session.all_topics_at_depth(&session.topics, threshold)
    }
}

/// A breakthrough is a jump of more than one level, or reaching the
/// maximum from below it.
fn is_breakthrough(previous: DepthScore, current: DepthScore) -> bool {
    current.value() > previous.value() + 1
        || (current == DepthScore::MAX && previous < DepthScore::MAX)
}
