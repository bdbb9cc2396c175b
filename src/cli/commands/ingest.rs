//! Implementation of the `socratic ingest` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use crate::cli::wiring;
use crate::services::PersonaIngestor;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Persona document to ingest (overrides the configured path)
    #[arg(long)]
    pub persona: Option<PathBuf>,
}

pub async fn execute(args: IngestArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = wiring::load_config(config_path)?;
    if let Some(persona) = args.persona {
        config.persona.persona_file = persona.display().to_string();
    }

    let knowledge = wiring::knowledge_service(&config)?;
    knowledge
        .initialize()
        .await
        .context("Failed to initialize knowledge collections")?;

    let ingestor = PersonaIngestor::new(config.persona.clone());
    let count = ingestor
        .ingest(&knowledge)
        .await
        .context("Persona ingestion failed")?;

    println!(
        "{} Ingested {} knowledge fragment(s) from {}",
        style("✓").green().bold(),
        count,
        config.persona.persona_file
    );
    Ok(())
}
