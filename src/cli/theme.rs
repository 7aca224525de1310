//! `memo theme` command
//!
//! Shows or changes the terminal theme. The choice is stored per user
//! and re-applied by every styled command.
//!
//! # Usage
//! ```bash
//! memo theme             # Show the active theme
//! memo theme toggle      # light <-> dark
//! memo theme set dark    # Set explicitly
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::theme::{Theme, ThemePreference};

#[derive(Args, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: Option<ThemeCommands>,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Show the active theme
    Show,

    /// Switch between light and dark
    Toggle,

    /// Set the theme explicitly
    Set {
        /// "light" or "dark"
        theme: String,
    },
}

pub fn run(args: ThemeArgs) -> Result<()> {
    let mut pref = ThemePreference::bootstrap();
    pref.initialize()?;

    match args.command.unwrap_or(ThemeCommands::Show) {
        ThemeCommands::Show => {
            println!("Theme: {}", pref.theme().to_string().bold());
            if !pref.is_mounted() {
                println!("{}", "(no terminal attached; theme not applied)".dimmed());
            }
        }
        ThemeCommands::Toggle => {
            let theme = pref.toggle()?;
            println!("✅ Theme set to {}", theme.to_string().bold());
        }
        ThemeCommands::Set { theme } => {
            let theme: Theme = theme.parse()?;
            pref.set(theme)?;
            println!("✅ Theme set to {}", theme.to_string().bold());
        }
    }

    Ok(())
}
