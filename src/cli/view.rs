//! `memo view` command
//!
//! Opens a memo in the interactive viewer. Keys inside the view:
//! `s` summarize, `e` edit, `d` delete, `Esc`/`q` close.
//!
//! # Usage
//! ```bash
//! memo view 01jm4qca
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::utils::resolve_memo;
use crate::config::Config;
use crate::core::store::Store;
use crate::core::summarize::SummaryEngine;
use crate::theme::ThemePreference;
use crate::view::{SessionOutcome, ViewSession};

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Memo id (full ULID or unique prefix)
    pub id: String,
}

pub async fn run(args: ViewArgs) -> Result<()> {
    let config = Config::load()?;
    let store = Store::from_config(&config)?;
    let memo = resolve_memo(&store, &args.id).await?;

    let mut theme = ThemePreference::bootstrap();
    theme.initialize()?;

    let summarizer = SummaryEngine::from_config(&config)?;
    let mut session = ViewSession::new(&store, &summarizer);

    match session.run(memo).await? {
        SessionOutcome::Closed => Ok(()),
        SessionOutcome::Deleted => {
            println!("🗑  Memo deleted.");
            Ok(())
        }
        SessionOutcome::Edit(memo) => {
            match crate::cli::edit::edit_in_editor(&store, memo).await? {
                Some(updated) => println!(
                    "✅ Updated memo {} {}",
                    updated.short_id().cyan().bold(),
                    updated.title.bold()
                ),
                None => println!("No changes."),
            }
            Ok(())
        }
    }
}
