//! Pulse CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "AI marketing insights for social post performance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Cache directory for persisted analyses
    #[arg(long, default_value = pulse_core::CACHE_DIR)]
    cache_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze posts and produce per-post plus overall insights
    Analyze {
        /// JSON file containing the post list
        #[arg(short, long)]
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Offline heuristic suggestions (no AI credential required)
    Suggest {
        /// JSON file containing the post list
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Clear the analysis cache
    Clear,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "pulse={log_level},pulse_core={log_level},pulse_ai={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Pulse v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze { input, output } => commands::analyze(input, cli.cache_dir, output).await,
        Commands::Suggest { input } => commands::suggest(input),
        Commands::Clear => commands::clear(cli.cache_dir),
        Commands::Version => {
            println!("Pulse v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
