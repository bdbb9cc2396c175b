//! Command-line interface.

pub mod commands;
pub mod wiring;

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

/// Retrieval-augmented interview orchestrator.
#[derive(Parser, Debug)]
#[command(name = "socratic", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Load configuration from this file instead of `.socratic/config.yaml`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init(commands::init::InitArgs),

    /// Parse a persona document into the expert knowledge base
    Ingest(commands::ingest::IngestArgs),

    /// Run a complete interview session
    Run(commands::run::RunArgs),
}

/// Print an error chain and exit non-zero.
pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {err:#}", style("error:").red().bold());
    std::process::exit(1);
}
