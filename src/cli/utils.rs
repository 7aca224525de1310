//! CLI utility functions
//!
//! Common helpers shared across commands: memo lookup by id prefix and
//! one-line previews for listings.

use anyhow::{bail, Result};

use crate::core::memo::Memo;
use crate::core::store::{MemoStore, Store};

/// Resolve a user-supplied id (full ULID or unique prefix) to one memo.
///
/// # Errors
/// Returns an error when nothing matches, and when the prefix matches
/// more than one memo; the ambiguous case lists the candidates so the
/// user can narrow down.
pub async fn resolve_memo(store: &Store, id: &str) -> Result<Memo> {
    let mut matches = store.find_by_prefix(id).await?;
    match matches.len() {
        0 => bail!("No memo found matching '{}'", id),
        1 => Ok(matches.remove(0)),
        n => {
            let listing = matches
                .iter()
                .map(|m| format!("  {}  {}", m.short_id(), m.title))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("Id '{}' is ambiguous ({} matches):\n{}", id, n, listing)
        }
    }
}

/// First non-empty content line, shortened for one-line listings
pub fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let line = line.trim();
    if line.chars().count() <= max_chars {
        line.to_string()
    } else {
        let shortened: String = line.chars().take(max_chars).collect();
        format!("{}...", shortened.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memo::MemoDraft;
    use crate::core::store::LocalMemos;

    #[test]
    fn test_preview_takes_first_nonempty_line() {
        assert_eq!(preview("\n\n  hello\nworld", 20), "hello");
        assert_eq!(preview("", 20), "");
    }

    #[test]
    fn test_preview_shortens_long_lines() {
        let out = preview("abcdefghij", 5);
        assert_eq!(out, "abcde...");
    }

    #[tokio::test]
    async fn test_resolve_by_unique_prefix() {
        let local = LocalMemos::open_memory().unwrap();
        let memo = local.create(MemoDraft::new("One", "content")).await.unwrap();
        let store = Store::Local(local);

        let prefix = memo.short_id();
        let found = resolve_memo(&store, &prefix).await.unwrap();
        assert_eq!(found.id, memo.id);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_fails() {
        let store = Store::Local(LocalMemos::open_memory().unwrap());
        let err = resolve_memo(&store, "zzzzzz").await.unwrap_err();
        assert!(err.to_string().contains("No memo found"));
    }
}
