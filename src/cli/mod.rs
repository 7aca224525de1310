//! CLI module - Command definitions and handlers

use clap::{Parser, Subcommand};

pub mod add;
pub mod config;
pub mod edit;
pub mod init;
pub mod list;
pub mod rm;
pub mod search;
pub mod show;
pub mod summarize;
pub mod theme;
pub mod utils;
pub mod view;

/// memo - Markdown notes in the terminal
///
/// Notes with categories, tags, full-text search, and generated
/// summaries. Stored locally in SQLite or on a memo server.
#[derive(Parser, Debug)]
#[command(name = "memo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new memo notebook
    Init(init::InitArgs),

    /// Add a new memo
    Add(add::AddArgs),

    /// List memos
    #[command(alias = "ls")]
    List(list::ListArgs),

    /// Show a memo rendered for the terminal
    Show(show::ShowArgs),

    /// Open a memo in the interactive viewer
    View(view::ViewArgs),

    /// Edit a memo
    Edit(edit::EditArgs),

    /// Delete a memo
    Rm(rm::RmArgs),

    /// Generate a summary for a memo
    Summarize(summarize::SummarizeArgs),

    /// Full-text search across memos
    Search(search::SearchArgs),

    /// Show or change the terminal theme
    Theme(theme::ThemeArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),
}
