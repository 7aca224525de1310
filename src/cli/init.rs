//! `memo init` command
//!
//! Initializes a new memo notebook.
//!
//! # Usage
//! ```bash
//! memo init                    # Initialize in current directory
//! memo init /path/to/notes     # Initialize in specific path
//! memo init --global           # Initialize global ~/.memo
//! ```

use anyhow::{bail, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::storage::LocalStore;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Initialize the global notebook (~/.memo)
    #[arg(long)]
    pub global: bool,

    /// Force re-initialization
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    // 1. Determine the notebook directory
    let memo_dir = if args.global {
        match std::env::var("MEMO_HOME") {
            Ok(home) => PathBuf::from(home),
            Err(_) => directories::UserDirs::new()
                .map(|u| u.home_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".memo"),
        }
    } else {
        args.path.unwrap_or_else(|| PathBuf::from(".")).join(".memo")
    };

    // 2. Refuse to clobber an existing notebook
    let config_path = memo_dir.join("config.toml");
    if config_path.exists() && !args.force {
        bail!(
            "{} already holds a memo notebook. Use --force to reinitialize.",
            memo_dir.display()
        );
    }

    println!("Initializing memo notebook in: {}", memo_dir.display());

    // 3. Create the directory and default config
    fs::create_dir_all(&memo_dir)?;
    let config = Config::default();
    config.save_to(&config_path)?;

    // 4. Create the database schema
    let db_path = memo_dir.join("memos.db");
    let _store = LocalStore::open(&db_path)?;

    println!("\n✅ Initialized memo notebook");
    println!("   Config:   {}", config_path.display());
    println!("   Database: {}", db_path.display());
    println!("\nNext steps:");
    println!("  memo add \"My first memo\" \"Some **markdown** content\"");
    println!("  memo list");
    println!("  memo view <id>");

    Ok(())
}
