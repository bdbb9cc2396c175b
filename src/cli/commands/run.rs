//! Implementation of the `socratic run` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::JsonFileTranscriptSink;
use crate::cli::wiring;
use crate::domain::models::{InterviewSession, Role};
use crate::services::{
    GenerationGateway, InterviewOrchestrator, PersonaIngestor, TranscriptAssembler,
};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Expert name (overrides the configured persona name)
    #[arg(long)]
    pub expert: Option<String>,

    /// Topics to cover, in order (overrides the configured list)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Cap on question+answer exchanges, conclusion included
    #[arg(long)]
    pub max_exchanges: Option<u32>,

    /// Skip persona ingestion (use whatever the knowledge store holds)
    #[arg(long)]
    pub no_ingest: bool,
}

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = wiring::load_config(config_path)?;
    if let Some(expert) = args.expert {
        config.persona.expert_name = expert;
    }
    if !args.topics.is_empty() {
        config.interview.topics = args.topics.clone();
    }
    if let Some(max_exchanges) = args.max_exchanges {
        config.interview.max_exchanges = max_exchanges;
    }

    let knowledge = wiring::knowledge_service(&config)?;
    knowledge
        .initialize()
        .await
        .context("Failed to initialize knowledge collections")?;

    if args.no_ingest {
        println!("{} Skipping persona ingestion", style("·").dim());
    } else {
        let ingestor = PersonaIngestor::new(config.persona.clone());
        let count = ingestor
            .ingest(&knowledge)
            .await
            .context("Persona ingestion failed")?;
        println!(
            "{} Expert knowledge ready ({count} fragment(s))",
            style("✓").green().bold()
        );
    }

    println!(
        "\n{}  Interview with {}\n{}",
        style("🎙").bold(),
        style(&config.persona.expert_name).cyan().bold(),
        style("=".repeat(60)).dim()
    );

    let gateway = GenerationGateway::new(wiring::generation_backend(&config)?);
    let transcript_config = config.transcript.clone();
    let orchestrator = InterviewOrchestrator::new(gateway, knowledge, config);

    let session = orchestrator
        .run()
        .await
        .context("Interview aborted by a backend failure")?;

    print_session(&session);

    let assembler =
        TranscriptAssembler::new(Arc::new(JsonFileTranscriptSink::new(transcript_config)));
    let location = assembler
        .finalize(&session)
        .await
        .context("Failed to persist transcript")?;
    println!(
        "\n{} Transcript saved to {}",
        style("💾").bold(),
        style(location).cyan()
    );
    Ok(())
}

fn print_session(session: &InterviewSession) {
    let mut current_topic = "";
    for turn in session.turns() {
        if turn.topic != current_topic {
            current_topic = &turn.topic;
            println!(
                "\n{} {}\n{}",
                style("📋").bold(),
                style(current_topic.to_uppercase()).bold(),
                style("-".repeat(40)).dim()
            );
        }
        let speaker = match turn.speaker {
            Role::Host => style("HOST").magenta().bold(),
            Role::Expert => style(session.expert_name.as_str()).cyan().bold(),
            Role::System => style("SYSTEM").dim().bold(),
        };
        println!("\n{speaker}: {}", turn.text);
    }

    println!("\n{}", style("=".repeat(60)).dim());
    println!(
        "{} {} exchange(s), average depth {:.1}",
        style("📝").bold(),
        session.exchanges(),
        session.average_best_depth()
    );
    for (topic, depth) in session.depth_map() {
        println!("   {} {topic}: depth {depth}", style("·").dim());
    }
    for breakthrough in session.breakthroughs() {
        println!(
            "   {} breakthrough on '{}': {} → {}",
            style("⚡").yellow(),
            breakthrough.topic,
            breakthrough.depth_before,
            breakthrough.depth_after
        );
    }
    let comfort = session.top_comfort_phrases(3);
    if !comfort.is_empty() {
        let formatted = comfort
            .iter()
            .map(|(phrase, count)| format!("\"{phrase}\" ({count}x)"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("   {} comfort zones: {formatted}", style("·").dim());
    }
}
