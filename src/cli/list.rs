//! `memo list` command
//!
//! Lists memos, newest first.
//!
//! # Usage
//! ```bash
//! memo list                    # Most recent memos
//! memo list --category work    # Only one category
//! memo list --tag rust -n 10   # Only one tag, capped
//! memo list --json             # Machine-readable output
//! ```

use anyhow::{bail, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::utils::preview;
use crate::config::Config;
use crate::core::memo::Category;
use crate::core::storage::ListFilter;
use crate::core::store::{MemoStore, Store};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Filter by tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Maximum rows (0 = all, default from config)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct MemoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

pub async fn run(args: ListArgs) -> Result<()> {
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

    let filter = ListFilter {
        category,
        tag: args.tag.clone(),
        limit: args.limit.unwrap_or(config.ui.page_size),
    };

    let memos = store.list(&filter).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&memos)?);
        return Ok(());
    }

    if memos.is_empty() {
        println!("No memos found.");
        println!("\nAdd one with: memo add \"Title\" \"Content\"");
        return Ok(());
    }

    let rows: Vec<MemoRow> = memos
        .iter()
        .map(|m| MemoRow {
            id: m.short_id(),
            title: preview(&m.title, 40),
            category: m.category.label().to_string(),
            tags: m.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "),
            updated: m.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!("{} memo(s) in {} store", memos.len(), store.name());

    Ok(())
}
