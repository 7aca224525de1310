//! Remote server client module
//!
//! Provides the HTTP client for a remote memo server.

mod client;
mod types;

pub use client::RemoteClient;
pub use types::*;
