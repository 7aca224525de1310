//! `memo add` command
//!
//! Adds a new memo to the notebook.
//!
//! # Usage
//! ```bash
//! memo add "Borrow checker notes" "Every value has a single owner."
//! memo add "Reading list" --file list.md
//! cat notes.md | memo add "Reading list" --file -
//! memo add "Standup" "Discussed the release" --category work --tags team,daily
//! ```

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::memo::{Category, MemoDraft};
use crate::core::store::{MemoStore, Store};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Memo title
    pub title: String,

    /// Markdown content (or use --file)
    #[arg(allow_hyphen_values = true)]
    pub content: Option<String>,

    /// Category: personal, work, study, idea, other
    #[arg(short, long)]
    pub category: Option<String>,

    /// Tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Read content from file (use - for stdin)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

pub async fn run(args: AddArgs) -> Result<()> {
    let config = Config::load()?;
    let store = Store::from_config(&config)?;

    // 1. Content comes from the positional argument, --file, or stdin
    let content = match (&args.content, &args.file) {
        (_, Some(path)) if path.as_os_str() == "-" => std::io::read_to_string(std::io::stdin())?,
        (_, Some(path)) => fs::read_to_string(path)?,
        (Some(content), None) => content.clone(),
        (None, None) => {
            bail!("Content is required. Pass it as the second argument or use --file.")
        }
    };

    // 2. Category falls back to the configured default, then to "other"
    let raw_category = args
        .category
        .as_deref()
        .unwrap_or(&config.ui.default_category);
    let category = Category::parse_lossy(raw_category);
    if category == Category::Other && Category::parse_strict(raw_category).is_none() {
        eprintln!("Unknown category '{}', filed under 'other'", raw_category);
    }

    let tags = args
        .tags
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let draft = MemoDraft::new(args.title, content)
        .with_category(category)
        .with_tags(tags);

    let memo = store.create(draft).await?;

    println!(
        "✅ Added memo {} {} ({})",
        memo.short_id().cyan().bold(),
        memo.title.bold(),
        memo.category
    );

    Ok(())
}
