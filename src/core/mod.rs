//! Core module - Business logic
//!
//! Contains the core data structures and logic for memo.

pub mod memo;
pub mod storage;
pub mod store;
pub mod summarize;
