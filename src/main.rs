//! Socratic CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use socratic::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => socratic::cli::commands::init::execute(args).await,
        Commands::Ingest(args) => socratic::cli::commands::ingest::execute(args, cli.config).await,
        Commands::Run(args) => socratic::cli::commands::run::execute(args, cli.config).await,
    };

    if let Err(err) = result {
        socratic::cli::handle_error(err);
    }
}
