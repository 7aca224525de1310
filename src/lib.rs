//! memo - Markdown notes in the terminal
//!
//! Notes with categories, tags, full-text search, and generated
//! summaries, shown through a themeable terminal renderer.
//!
//! ## Key Concepts
//!
//! - **Memos**: Markdown notes with a title, category, tags, and an
//!   optional generated summary
//! - **Closed categories**: personal, work, study, idea, other; unknown
//!   input always lands in `other`
//! - **Stores**: SQLite with FTS5 locally, or a memo server over HTTP
//! - **Detail view**: an interactive viewer state machine; summary
//!   requests are cancelled deterministically when the view closes
//! - **Theme**: a per-user light/dark preference, resolved from storage
//!   or the terminal and applied process-wide

pub mod cli;
pub mod config;
pub mod core;
pub mod remote;
pub mod render;
pub mod theme;
pub mod view;

pub use core::memo::{Category, Memo, MemoDraft, MemoPatch};
pub use core::storage::{ListFilter, LocalStore};
pub use core::store::{LocalMemos, MemoStore, RemoteMemos, Store};
pub use core::summarize::{ExtractiveSummarizer, SummaryEngine, Summarizer};
pub use remote::RemoteClient;
pub use theme::{Theme, ThemePreference};
pub use view::{DetailView, ViewState};
