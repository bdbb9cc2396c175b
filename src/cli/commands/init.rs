//! Implementation of the `socratic init` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use tokio::fs;

use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if a config already exists
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

pub async fn execute(args: InitArgs) -> Result<()> {
    let project_dir = args.path.join(".socratic");
    let config_path = project_dir.join("config.yaml");

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists. Use --force to overwrite.",
            style("!").yellow().bold(),
            config_path.display()
        );
        return Ok(());
    }

    fs::create_dir_all(&project_dir)
        .await
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    let rendered = serde_yaml::to_string(&Config::default())
        .context("Failed to serialize default configuration")?;
    fs::write(&config_path, rendered)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Wrote default configuration to {}",
        style("✓").green().bold(),
        config_path.display()
    );
    println!(
        "  Edit it, drop a persona document at {}, then run {}",
        style(".socratic/persona.md").cyan(),
        style("socratic run").cyan()
    );
    Ok(())
}
