//! `memo search` command
//!
//! Full-text search across titles, content, tags, and summaries.
//!
//! # Usage
//! ```bash
//! memo search "borrow checker"
//! memo search rust --category study
//! memo search rust --tag lang -n 5
//! memo search rust --json
//! ```
//!
//! Local search runs on FTS5 with BM25 ranking; remote search goes
//! through the server's search endpoint.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::utils::preview;
use crate::config::Config;
use crate::core::memo::{Category, Memo};
use crate::core::store::{MemoStore, Store};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Filter results by category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Filter results by tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Maximum results
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let store = Store::from_config(&config)?;

    let category = match &args.category {
        Some(raw) => match Category::parse_strict(raw) {
            Some(c) => Some(c),
            None => bail!(
                "Unknown category '{}'. Expected one of: {}",
                raw,
                Category::ALL.map(|c| c.as_str()).join(", ")
            ),
        },
        None => None,
    };

    let memos = store.search(&args.query, args.limit).await?;

    // Category and tag narrowing happen here, not in the backend
    let memos: Vec<Memo> = memos
        .into_iter()
        .filter(|m| {
            if let Some(cat) = category {
                if m.category != cat {
                    return false;
                }
            }
            if let Some(tag) = &args.tag {
                if !m.tags.iter().any(|t| t == tag) {
                    return false;
                }
            }
            true
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&memos)?);
        return Ok(());
    }

    if memos.is_empty() {
        println!("No memos matched '{}'.", args.query);
        return Ok(());
    }

    println!("Found {} memo(s):\n", memos.len());
    for memo in &memos {
        println!(
            "{} {} {}",
            memo.short_id().cyan().bold(),
            memo.title.bold(),
            format!("({})", memo.category).dimmed()
        );
        let line = memo
            .summary
            .as_deref()
            .map(|s| preview(s, 76))
            .unwrap_or_else(|| preview(&memo.content, 76));
        if !line.is_empty() {
            println!("  {}", line.dimmed());
        }
    }

    Ok(())
}
