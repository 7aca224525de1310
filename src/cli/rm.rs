//! `memo rm` command
//!
//! Deletes a memo after confirmation.
//!
//! # Usage
//! ```bash
//! memo rm 01jm4qca
//! memo rm 01jm4qca --force    # Skip confirmation
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;

use crate::cli::utils::resolve_memo;
use crate::config::Config;
use crate::core::store::{MemoStore, Store};

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Memo id (full ULID or unique prefix)
    pub id: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

pub async fn run(args: RmArgs) -> Result<()> {
    let config = Config::load()?;
    let store = Store::from_config(&config)?;
    let memo = resolve_memo(&store, &args.id).await?;

    if !args.force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete \"{}\"?", memo.title))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.delete(&memo.id).await?;
    println!(
        "🗑  Deleted memo {} {}",
        memo.short_id().cyan().bold(),
        memo.title.bold()
    );

    Ok(())
}
