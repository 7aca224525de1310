//! `memo show` command
//!
//! Prints one memo, rendered for the terminal.
//!
//! # Usage
//! ```bash
//! memo show 01jm4qca          # Unique id prefix is enough
//! memo show 01jm4qca --raw    # Unstyled markdown
//! memo show 01jm4qca --json   # Machine-readable output
//! ```

use anyhow::Result;
use clap::Args;
use console::{Style, Term};

use crate::cli::utils::resolve_memo;
use crate::config::Config;
use crate::core::store::Store;
use crate::render::{render_markdown, Palette};
use crate::theme::ThemePreference;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Memo id (full ULID or unique prefix)
    pub id: String,

    /// Print raw markdown without styling
    #[arg(long)]
    pub raw: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ShowArgs) -> Result<()> {
    let config = Config::load()?;
    let store = Store::from_config(&config)?;
    let memo = resolve_memo(&store, &args.id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&memo)?);
        return Ok(());
    }

    if args.raw {
        println!("{}", memo.content);
        return Ok(());
    }

    // Apply the stored theme before any styled output
    let mut theme = ThemePreference::bootstrap();
    theme.initialize()?;

    let (_, cols) = Term::stdout().size();
    let width = (cols as usize).max(40);
    let palette = Palette::active();

    let id = palette.url.apply_to(format!("[{}]", memo.short_id()));
    let title = Style::new().bold().apply_to(&memo.title);
    println!("{} {}", id, title);

    let badge = Style::new()
        .fg(memo.category.color())
        .apply_to(memo.category.label());
    let mut meta = format!(
        "{}  created {}",
        badge,
        memo.created_at.format("%Y-%m-%d %H:%M")
    );
    if memo.is_edited() {
        meta.push_str(&format!(
            ", updated {}",
            memo.updated_at.format("%Y-%m-%d %H:%M")
        ));
    }
    if !memo.tags.is_empty() {
        let tags = memo
            .tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        meta.push_str(&format!("  {}", palette.url.apply_to(tags)));
    }
    println!("{}", meta);
    println!("{}", palette.rule.apply_to("─".repeat(width.min(60))));
    println!();
    println!("{}", render_markdown(&memo.content, &palette, width));

    if let Some(summary) = &memo.summary {
        println!();
        println!("{}", Style::new().bold().apply_to("Summary"));
        println!("{}", Style::new().italic().apply_to(summary));
    }

    Ok(())
}
