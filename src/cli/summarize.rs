//! `memo summarize` command
//!
//! Generates and stores a summary for a memo. Uses the configured
//! server when one is set, otherwise falls back to the offline
//! extractive engine.
//!
//! # Usage
//! ```bash
//! memo summarize 01jm4qca
//! memo summarize 01jm4qca --force      # Replace an existing summary
//! memo summarize 01jm4qca --offline    # Skip the server
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::utils::resolve_memo;
use crate::config::Config;
use crate::core::memo::MemoPatch;
use crate::core::store::{MemoStore, Store};
use crate::core::summarize::{ExtractiveSummarizer, SummaryEngine, Summarizer};

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Memo id (full ULID or unique prefix)
    pub id: String,

    /// Regenerate even if a summary already exists
    #[arg(short, long)]
    pub force: bool,

    /// Use the offline extractive engine
    #[arg(long)]
    pub offline: bool,
}

pub async fn run(args: SummarizeArgs) -> Result<()> {
    let config = Config::load()?;
    let store = Store::from_config(&config)?;
    let memo = resolve_memo(&store, &args.id).await?;

    if let Some(existing) = &memo.summary {
        if !args.force {
            println!("{}", existing);
            eprintln!("\nAlready summarized. Use --force to regenerate.");
            return Ok(());
        }
    }

    let engine = if args.offline {
        SummaryEngine::Extractive(ExtractiveSummarizer::new())
    } else {
        SummaryEngine::from_config(&config)?
    };

    let summary = engine.summarize(&memo).await?;

    let patch = MemoPatch {
        summary: Some(summary.clone()),
        ..Default::default()
    };
    store.update(&memo.id, patch).await?;

    println!(
        "✅ Summarized memo {} ({} engine)",
        memo.short_id().cyan().bold(),
        engine.name()
    );
    println!("\n{}", summary.italic());

    Ok(())
}
