//! Memo store abstraction
//!
//! Provides a unified interface over local (SQLite) and remote (HTTP)
//! memo stores.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │             Store                   │
//! │  ┌─────────────┬──------─────────┐  │
//! │  │ LocalMemos  │   RemoteMemos   │  │
//! │  │ (LocalStore)│   (HTTP API)    │  │
//! │  └─────────────┴──────────-----──┘  │
//! └─────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ulid::Ulid;

use super::memo::{Memo, MemoDraft, MemoPatch};
use super::storage::{ListFilter, LocalStore};

/// Backend trait for memo operations
///
/// Implemented by both LocalMemos (SQLite) and RemoteMemos (HTTP API).
/// Timestamps are store-assigned: `create` and `update` decide
/// `created_at`/`updated_at`, never the caller.
#[async_trait]
pub trait MemoStore: Send + Sync {
    /// List memos, newest first
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Memo>>;

    /// Get a memo by ID
    async fn get(&self, id: &Ulid) -> Result<Option<Memo>>;

    /// Create a memo from a draft
    async fn create(&self, draft: MemoDraft) -> Result<Memo>;

    /// Apply a partial update, returning the updated memo
    async fn update(&self, id: &Ulid, patch: MemoPatch) -> Result<Memo>;

    /// Delete a memo
    async fn delete(&self, id: &Ulid) -> Result<()>;

    /// Full-text search
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Memo>>;

    /// Find memos whose ID starts with the given prefix
    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Memo>>;

    /// Human-readable name
    fn name(&self) -> &str;
}

/// Local memo store (SQLite)
///
/// Uses Mutex to make LocalStore thread-safe for async operations
pub struct LocalMemos {
    storage: Mutex<LocalStore>,
    name: String,
}

impl LocalMemos {
    /// Open a local store from a database path
    pub fn open(path: PathBuf) -> Result<Self> {
        let storage = LocalStore::open(&path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("local")
            .to_string();

        Ok(Self {
            storage: Mutex::new(storage),
            name,
        })
    }

    /// In-memory store (for testing)
    pub fn open_memory() -> Result<Self> {
        Ok(Self {
            storage: Mutex::new(LocalStore::open_memory()?),
            name: "memory".to_string(),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LocalStore>> {
        self.storage
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))
    }
}

#[async_trait]
impl MemoStore for LocalMemos {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Memo>> {
        self.lock()?.list(filter)
    }

    async fn get(&self, id: &Ulid) -> Result<Option<Memo>> {
        self.lock()?.get(id)
    }

    async fn create(&self, draft: MemoDraft) -> Result<Memo> {
        let memo = draft.into_memo();
        self.lock()?.insert(&memo)?;
        Ok(memo)
    }

    async fn update(&self, id: &Ulid, patch: MemoPatch) -> Result<Memo> {
        self.lock()?.update(id, patch)
    }

    async fn delete(&self, id: &Ulid) -> Result<()> {
        self.lock()?.delete(id)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Memo>> {
        self.lock()?.search(query, limit as i64)
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Memo>> {
        self.lock()?.find_by_id_prefix(prefix)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Remote memo store (HTTP API)
pub struct RemoteMemos {
    client: crate::remote::RemoteClient,
    name: String,
}

impl RemoteMemos {
    /// Create a new remote store
    pub fn new(server_url: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = crate::remote::RemoteClient::new(server_url, token, timeout_secs)?;
        let name = client.host().to_string();
        Ok(Self { client, name })
    }

    /// Get the client for operations not in the trait
    pub fn client(&self) -> &crate::remote::RemoteClient {
        &self.client
    }
}

#[async_trait]
impl MemoStore for RemoteMemos {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Memo>> {
        let dtos = self.client.list_memos(filter).await?;
        Ok(dtos.into_iter().map(|d| d.into_memo()).collect())
    }

    async fn get(&self, id: &Ulid) -> Result<Option<Memo>> {
        match self.client.get_memo(&id.to_string()).await {
            Ok(dto) => Ok(Some(dto.into_memo())),
            Err(e) => {
                // 404 comes back as a "not found" message
                if e.to_string().contains("not found") {
                    Ok(None)
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn create(&self, draft: MemoDraft) -> Result<Memo> {
        let dto = self.client.create_memo(&draft).await?;
        Ok(dto.into_memo())
    }

    async fn update(&self, id: &Ulid, patch: MemoPatch) -> Result<Memo> {
        let dto = self.client.update_memo(&id.to_string(), &patch).await?;
        Ok(dto.into_memo())
    }

    async fn delete(&self, id: &Ulid) -> Result<()> {
        self.client.delete_memo(&id.to_string()).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Memo>> {
        let dtos = self.client.search_memos(query, limit).await?;
        Ok(dtos.into_iter().map(|d| d.into_memo()).collect())
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Memo>> {
        // Full ULID: one round trip
        if let Ok(id) = prefix.parse::<Ulid>() {
            return Ok(self.get(&id).await?.into_iter().collect());
        }

        // Prefix match has no server route, so filter a listing
        let upper = prefix.to_uppercase();
        let mut memos = self.list(&ListFilter::default()).await?;
        memos.retain(|m| m.id.to_string().starts_with(&upper));
        Ok(memos)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Unified memo store - can be local or remote
pub enum Store {
    Local(LocalMemos),
    Remote(RemoteMemos),
}

impl Store {
    /// Resolve a store from configuration
    ///
    /// `[api] url` plus `backend = "remote"` selects the HTTP store;
    /// everything else opens the local database, which must have been
    /// initialized first.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        if config.storage.backend == crate::config::Backend::Remote {
            let url = config
                .api
                .url
                .as_deref()
                .context("Remote backend selected but [api] url is not set")?;
            return Ok(Store::Remote(RemoteMemos::new(
                url,
                config.api.token.clone(),
                config.api.timeout_secs,
            )?));
        }

        let db_path = config.db_path();
        let dir = db_path.parent().unwrap_or(std::path::Path::new("."));
        if !dir.exists() {
            anyhow::bail!("No memo directory found. Run 'memo init' first.");
        }

        Ok(Store::Local(LocalMemos::open(db_path)?))
    }

    /// Check if this is a local store
    pub fn is_local(&self) -> bool {
        matches!(self, Store::Local(_))
    }

    /// Check if this is a remote store
    pub fn is_remote(&self) -> bool {
        matches!(self, Store::Remote(_))
    }
}

#[async_trait]
impl MemoStore for Store {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Memo>> {
        match self {
            Store::Local(s) => s.list(filter).await,
            Store::Remote(s) => s.list(filter).await,
        }
    }

    async fn get(&self, id: &Ulid) -> Result<Option<Memo>> {
        match self {
            Store::Local(s) => s.get(id).await,
            Store::Remote(s) => s.get(id).await,
        }
    }

    async fn create(&self, draft: MemoDraft) -> Result<Memo> {
        match self {
            Store::Local(s) => s.create(draft).await,
            Store::Remote(s) => s.create(draft).await,
        }
    }

    async fn update(&self, id: &Ulid, patch: MemoPatch) -> Result<Memo> {
        match self {
            Store::Local(s) => s.update(id, patch).await,
            Store::Remote(s) => s.update(id, patch).await,
        }
    }

    async fn delete(&self, id: &Ulid) -> Result<()> {
        match self {
            Store::Local(s) => s.delete(id).await,
            Store::Remote(s) => s.delete(id).await,
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Memo>> {
        match self {
            Store::Local(s) => s.search(query, limit).await,
            Store::Remote(s) => s.search(query, limit).await,
        }
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Memo>> {
        match self {
            Store::Local(s) => s.find_by_prefix(prefix).await,
            Store::Remote(s) => s.find_by_prefix(prefix).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Store::Local(s) => s.name(),
            Store::Remote(s) => s.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memo::Category;

    #[tokio::test]
    async fn test_create_assigns_timestamps() -> Result<()> {
        let store = LocalMemos::open_memory()?;

        let memo = store
            .create(MemoDraft::new("Trait-level", "Body").with_category(Category::Work))
            .await?;

        assert_eq!(memo.created_at, memo.updated_at);
        assert_eq!(store.get(&memo.id).await?.unwrap().title, "Trait-level");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_through_trait() -> Result<()> {
        let store = LocalMemos::open_memory()?;
        let memo = store.create(MemoDraft::new("Old", "Body")).await?;

        let updated = store
            .update(
                &memo.id,
                MemoPatch {
                    content: Some("New body".to_string()),
                    ..Default::default()
                },
            )
            .await?;

        assert_eq!(updated.content, "New body");
        assert!(updated.updated_at >= updated.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_prefix_through_trait() -> Result<()> {
        let store = LocalMemos::open_memory()?;
        let memo = store.create(MemoDraft::new("Prefixed", "Body")).await?;

        let found = store.find_by_prefix(&memo.short_id()).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, memo.id);

        Ok(())
    }
}
