//! `memo edit` command
//!
//! Edits a memo, either through flags or in `$EDITOR`.
//!
//! # Usage
//! ```bash
//! memo edit 01jm4qca                       # Open content in $EDITOR
//! memo edit 01jm4qca --title "New title"
//! memo edit 01jm4qca --category study --tags rust,lang
//! memo edit 01jm4qca --file notes.md       # Replace content from file
//! ```

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::cli::utils::resolve_memo;
use crate::config::Config;
use crate::core::memo::{Category, Memo, MemoPatch};
use crate::core::store::{MemoStore, Store};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Memo id (full ULID or unique prefix)
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New markdown content
    #[arg(long)]
    pub content: Option<String>,

    /// New category: personal, work, study, idea, other
    #[arg(short, long)]
    pub category: Option<String>,

    /// Replace tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Replace content from file
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

pub async fn run(args: EditArgs) -> Result<()> {
    let config = Config::load()?;
    let store = Store::from_config(&config)?;
    let memo = resolve_memo(&store, &args.id).await?;

    let has_flags = args.title.is_some()
        || args.content.is_some()
        || args.category.is_some()
        || args.tags.is_some()
        || args.file.is_some();

    // No flags: hand the content to the user's editor
    if !has_flags {
        return match edit_in_editor(&store, memo).await? {
            Some(updated) => {
                print_updated(&updated);
                Ok(())
            }
            None => {
                println!("No changes.");
                Ok(())
            }
        };
    }

    let content = match (&args.content, &args.file) {
        (_, Some(path)) => Some(fs::read_to_string(path)?),
        (Some(content), None) => Some(content.clone()),
        (None, None) => None,
    };

    let category = match &args.category {
        Some(raw) => {
            let parsed = Category::parse_lossy(raw);
            if parsed == Category::Other && Category::parse_strict(raw).is_none() {
                eprintln!("Unknown category '{}', filed under 'other'", raw);
            }
            Some(parsed)
        }
        None => None,
    };

    let patch = MemoPatch {
        title: args.title.clone(),
        content,
        category,
        tags: args.tags.clone(),
        summary: None,
    };

    if patch.is_empty() {
        println!("No changes.");
        return Ok(());
    }

    let updated = store.update(&memo.id, patch).await?;
    print_updated(&updated);
    Ok(())
}

/// Open the memo's content in `$VISUAL`/`$EDITOR` and persist the result.
///
/// Returns `None` when the content came back unchanged.
pub async fn edit_in_editor(store: &Store, memo: Memo) -> Result<Option<Memo>> {
    let tmp = std::env::temp_dir().join(format!("memo-edit-{}.md", memo.short_id()));
    fs::write(&tmp, &memo.content)?;

    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());

    let status = std::process::Command::new(&editor)
        .arg(&tmp)
        .status()
        .with_context(|| format!("Failed to open editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&tmp);
        bail!("Editor exited with an error; memo left unchanged");
    }

    let edited = fs::read_to_string(&tmp)?;
    let _ = fs::remove_file(&tmp);

    if edited == memo.content {
        return Ok(None);
    }

    let patch = MemoPatch {
        content: Some(edited),
        ..Default::default()
    };
    let updated = store.update(&memo.id, patch).await?;
    Ok(Some(updated))
}

fn print_updated(memo: &Memo) {
    println!(
        "✅ Updated memo {} {}",
        memo.short_id().cyan().bold(),
        memo.title.bold()
    );
}
