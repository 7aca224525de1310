//! memo CLI - Entry point
//!
//! Usage: memo <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; --verbose raises our own level
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("memo=debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Run command
    match cli.command {
        Commands::Init(args) => memo::cli::init::run(args),
        Commands::Add(args) => memo::cli::add::run(args).await,
        Commands::List(args) => memo::cli::list::run(args).await,
        Commands::Show(args) => memo::cli::show::run(args).await,
        Commands::View(args) => memo::cli::view::run(args).await,
        Commands::Edit(args) => memo::cli::edit::run(args).await,
        Commands::Rm(args) => memo::cli::rm::run(args).await,
        Commands::Summarize(args) => memo::cli::summarize::run(args).await,
        Commands::Search(args) => memo::cli::search::run(args).await,
        Commands::Theme(args) => memo::cli::theme::run(args),
        Commands::Config(args) => memo::cli::config::run(args),
    }
}
