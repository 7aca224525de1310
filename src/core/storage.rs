//! LocalStore - SQLite backend
//!
//! Uses SQLite with FTS5 for full-text search over memos.
//!
//! # Key Points
//! - One `memos` table: id, title, content, category, tags (JSON), summary,
//!   created_at, updated_at
//! - FTS5 index kept in sync by insert/update/delete triggers
//! - WAL mode for concurrent readers

use std::path::Path as FilePath;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OpenFlags};
use ulid::Ulid;

use super::memo::{Category, Memo, MemoPatch};

/// Filters for listing memos
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Only memos in this category
    pub category: Option<Category>,
    /// Only memos carrying this tag
    pub tag: Option<String>,
    /// Maximum number of results (0 = unlimited)
    pub limit: usize,
}

/// Database storage
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open or create a database
    pub fn open(path: &FilePath) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open database")?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Memos table
            CREATE TABLE IF NOT EXISTS memos (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'other',
                tags TEXT NOT NULL DEFAULT '[]',  -- JSON array
                summary TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Category index for filtered listing
            CREATE INDEX IF NOT EXISTS idx_memos_category ON memos(category);

            -- Creation index for newest-first listing
            CREATE INDEX IF NOT EXISTS idx_memos_created ON memos(created_at);

            -- FTS5 virtual table for full-text search
            CREATE VIRTUAL TABLE IF NOT EXISTS memos_fts USING fts5(
                id UNINDEXED,
                title,
                content,
                tags,
                summary,
                content='memos',
                content_rowid='rowid'
            );

            -- Triggers to keep FTS in sync across insert, update, delete
            CREATE TRIGGER IF NOT EXISTS memos_ai AFTER INSERT ON memos BEGIN
                INSERT INTO memos_fts(rowid, id, title, content, tags, summary)
                VALUES (new.rowid, new.id, new.title, new.content, new.tags, new.summary);
            END;

            CREATE TRIGGER IF NOT EXISTS memos_ad AFTER DELETE ON memos BEGIN
                INSERT INTO memos_fts(memos_fts, rowid, id, title, content, tags, summary)
                VALUES ('delete', old.rowid, old.id, old.title, old.content, old.tags, old.summary);
            END;

            CREATE TRIGGER IF NOT EXISTS memos_au AFTER UPDATE ON memos BEGIN
                INSERT INTO memos_fts(memos_fts, rowid, id, title, content, tags, summary)
                VALUES ('delete', old.rowid, old.id, old.title, old.content, old.tags, old.summary);
                INSERT INTO memos_fts(rowid, id, title, content, tags, summary)
                VALUES (new.rowid, new.id, new.title, new.content, new.tags, new.summary);
            END;
            "#,
        )?;

        Ok(())
    }

    /// Insert a new memo
    pub fn insert(&self, memo: &Memo) -> Result<()> {
        let tags_json = serde_json::to_string(&memo.tags)?;

        self.conn.execute(
            r#"
            INSERT INTO memos (
                id, title, content, category, tags, summary, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                memo.id.to_string(),
                memo.title,
                memo.content,
                memo.category.as_str(),
                tags_json,
                memo.summary,
                memo.created_at.to_rfc3339(),
                memo.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Get a memo by ID
    pub fn get(&self, id: &Ulid) -> Result<Option<Memo>> {
        let mut stmt = self.conn.prepare("SELECT * FROM memos WHERE id = ?1")?;

        let result = stmt.query_row([id.to_string()], |row| Self::row_to_memo(row));

        match result {
            Ok(memo) => Ok(Some(memo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Find memos whose ID starts with the given prefix (case-insensitive)
    pub fn find_by_id_prefix(&self, prefix: &str) -> Result<Vec<Memo>> {
        let pattern = format!("{}%", prefix.to_uppercase());

        let mut stmt = self
            .conn
            .prepare("SELECT * FROM memos WHERE id LIKE ?1 ORDER BY created_at DESC")?;

        let memos = stmt
            .query_map([pattern], |row| Self::row_to_memo(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(memos)
    }

    /// List memos, newest first
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Memo>> {
        let mut memos = match filter.category {
            Some(category) => {
                let mut stmt = self.conn.prepare(
                    "SELECT * FROM memos WHERE category = ?1 ORDER BY created_at DESC, id DESC",
                )?;
                let rows = stmt
                    .query_map([category.as_str()], |row| Self::row_to_memo(row))?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT * FROM memos ORDER BY created_at DESC, id DESC")?;
                let rows = stmt
                    .query_map([], |row| Self::row_to_memo(row))?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        // Tags live in a JSON column, so tag filtering happens here
        if let Some(tag) = &filter.tag {
            memos.retain(|m| m.tags.iter().any(|t| t == tag));
        }

        if filter.limit > 0 {
            memos.truncate(filter.limit);
        }

        Ok(memos)
    }

    /// Apply a patch to a memo, bumping `updated_at`
    ///
    /// Returns the updated memo. Fails if the memo does not exist.
    pub fn update(&self, id: &Ulid, patch: MemoPatch) -> Result<Memo> {
        let mut memo = self
            .get(id)?
            .with_context(|| format!("Memo {} not found", id))?;

        patch.apply(&mut memo);

        let tags_json = serde_json::to_string(&memo.tags)?;
        self.conn.execute(
            r#"
            UPDATE memos
            SET title = ?2, content = ?3, category = ?4, tags = ?5,
                summary = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                memo.id.to_string(),
                memo.title,
                memo.content,
                memo.category.as_str(),
                tags_json,
                memo.summary,
                memo.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(memo)
    }

    /// Delete a memo
    pub fn delete(&self, id: &Ulid) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM memos WHERE id = ?1", params![id.to_string()])?;

        if deleted == 0 {
            anyhow::bail!("Memo {} not found", id);
        }
        Ok(())
    }

    /// Escape and prepare query for FTS5
    /// Converts natural language query to FTS5 syntax with OR between words
    fn escape_fts_query(query: &str) -> String {
        // Quote each word to survive special chars like hyphens; join with
        // OR so any matching word returns results
        let words: Vec<String> = query
            .split_whitespace()
            .filter(|w| !w.is_empty())
            .map(|w| {
                let escaped = w.replace('"', "\"\"");
                format!("\"{}\"", escaped)
            })
            .collect();

        if words.is_empty() {
            return String::new();
        }

        words.join(" OR ")
    }

    /// Full-text search over title, content, tags, and summary
    pub fn search(&self, query: &str, limit: i64) -> Result<Vec<Memo>> {
        let fts_query = Self::escape_fts_query(query);
        if fts_query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.*
            FROM memos m
            JOIN memos_fts fts ON m.id = fts.id
            WHERE memos_fts MATCH ?1
            ORDER BY bm25(memos_fts, 0, 10.0, 1.0, 5.0, 2.0)
            LIMIT ?2
            "#,
        )?;

        let memos = stmt
            .query_map(params![fts_query, limit as i32], |row| {
                Self::row_to_memo(row)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(memos)
    }

    /// Number of memos in the store
    pub fn count(&self) -> Result<usize> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memos", [], |row| row.get(0))?;
        Ok(total as usize)
    }

    /// Convert a database row to a Memo
    fn row_to_memo(row: &rusqlite::Row) -> rusqlite::Result<Memo> {
        let id_str: String = row.get("id")?;
        let category_str: String = row.get("category")?;
        let tags_json: String = row.get("tags")?;
        let created_str: String = row.get("created_at")?;
        let updated_str: String = row.get("updated_at")?;

        Ok(Memo {
            id: Ulid::from_string(&id_str).unwrap_or_else(|_| Ulid::new()),
            title: row.get("title")?,
            content: row.get("content")?,
            category: Category::parse_lossy(&category_str),
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            summary: row.get("summary")?,
            created_at: chrono::DateTime::parse_from_rfc3339(&created_str)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
            updated_at: chrono::DateTime::parse_from_rfc3339(&updated_str)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memo::MemoDraft;

    #[test]
    fn test_insert_and_get() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = Memo::new("Standup notes", "Discussed the release plan.");
        store.insert(&memo)?;

        let retrieved = store.get(&memo.id)?;
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().title, "Standup notes");

        Ok(())
    }

    #[test]
    fn test_get_missing_returns_none() -> Result<()> {
        let store = LocalStore::open_memory()?;
        assert!(store.get(&Ulid::new())?.is_none());
        Ok(())
    }

    #[test]
    fn test_list_newest_first() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let mut older = Memo::new("Older", "First");
        older.created_at = chrono::Utc::now() - chrono::Duration::hours(2);
        older.updated_at = older.created_at;
        store.insert(&older)?;

        let newer = Memo::new("Newer", "Second");
        store.insert(&newer)?;

        let memos = store.list(&ListFilter::default())?;
        assert_eq!(memos.len(), 2);
        assert_eq!(memos[0].title, "Newer");
        assert_eq!(memos[1].title, "Older");

        Ok(())
    }

    #[test]
    fn test_list_filter_category() -> Result<()> {
        let store = LocalStore::open_memory()?;

        store.insert(&Memo::new("Work memo", "A").with_category(Category::Work))?;
        store.insert(&Memo::new("Idea memo", "B").with_category(Category::Idea))?;

        let work = store.list(&ListFilter {
            category: Some(Category::Work),
            ..Default::default()
        })?;
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].title, "Work memo");

        Ok(())
    }

    #[test]
    fn test_list_filter_tag() -> Result<()> {
        let store = LocalStore::open_memory()?;

        store.insert(&Memo::new("Tagged", "A").with_tags(vec!["rust".to_string()]))?;
        store.insert(&Memo::new("Untagged", "B"))?;

        let tagged = store.list(&ListFilter {
            tag: Some("rust".to_string()),
            ..Default::default()
        })?;
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title, "Tagged");

        Ok(())
    }

    #[test]
    fn test_list_limit() -> Result<()> {
        let store = LocalStore::open_memory()?;

        for i in 0..5 {
            store.insert(&Memo::new(format!("Memo {}", i), "Body"))?;
        }

        let memos = store.list(&ListFilter {
            limit: 3,
            ..Default::default()
        })?;
        assert_eq!(memos.len(), 3);

        Ok(())
    }

    #[test]
    fn test_update_bumps_updated_at_only() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = Memo::new("Before", "Body");
        store.insert(&memo)?;

        let updated = store.update(
            &memo.id,
            MemoPatch {
                title: Some("After".to_string()),
                ..Default::default()
            },
        )?;

        assert_eq!(updated.title, "After");
        assert_eq!(updated.created_at, memo.created_at);
        assert!(updated.updated_at >= updated.created_at);
        assert!(updated.is_edited() || updated.updated_at == memo.updated_at);

        let reloaded = store.get(&memo.id)?.unwrap();
        assert_eq!(reloaded.title, "After");

        Ok(())
    }

    #[test]
    fn test_update_sets_summary() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = Memo::new("Memo", "Body");
        store.insert(&memo)?;

        let updated = store.update(
            &memo.id,
            MemoPatch {
                summary: Some("Short.".to_string()),
                ..Default::default()
            },
        )?;
        assert_eq!(updated.summary.as_deref(), Some("Short."));

        Ok(())
    }

    #[test]
    fn test_update_missing_fails() -> Result<()> {
        let store = LocalStore::open_memory()?;
        let result = store.update(&Ulid::new(), MemoPatch::default());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_delete() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = Memo::new("Doomed", "Body");
        store.insert(&memo)?;
        store.delete(&memo.id)?;

        assert!(store.get(&memo.id)?.is_none());
        assert_eq!(store.count()?, 0);

        Ok(())
    }

    #[test]
    fn test_delete_missing_fails() -> Result<()> {
        let store = LocalStore::open_memory()?;
        assert!(store.delete(&Ulid::new()).is_err());
        Ok(())
    }

    #[test]
    fn test_search() -> Result<()> {
        let store = LocalStore::open_memory()?;

        store.insert(&Memo::new("Rust notes", "Ownership and borrowing."))?;
        store.insert(&Memo::new("Dinner plan", "Pasta with mushrooms."))?;

        let results = store.search("borrowing", 10)?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Rust notes");

        Ok(())
    }

    #[test]
    fn test_search_sees_updates() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = Memo::new("Draft", "Original text");
        store.insert(&memo)?;

        store.update(
            &memo.id,
            MemoPatch {
                content: Some("Completely rewritten xylophone".to_string()),
                ..Default::default()
            },
        )?;

        assert!(store.search("original", 10)?.is_empty());
        assert_eq!(store.search("xylophone", 10)?.len(), 1);

        Ok(())
    }

    #[test]
    fn test_search_after_delete() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = Memo::new("Transient", "Fleeting zeppelin content");
        store.insert(&memo)?;
        store.delete(&memo.id)?;

        assert!(store.search("zeppelin", 10)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_search_empty_query() -> Result<()> {
        let store = LocalStore::open_memory()?;
        store.insert(&Memo::new("Memo", "Body"))?;
        assert!(store.search("   ", 10)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_find_by_id_prefix() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = Memo::new("Findable", "Body");
        store.insert(&memo)?;

        let matches = store.find_by_id_prefix(&memo.short_id())?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, memo.id);

        Ok(())
    }

    #[test]
    fn test_unknown_category_reads_as_other() -> Result<()> {
        let store = LocalStore::open_memory()?;

        // Simulate a row written by a client with a category outside the set
        let now = chrono::Utc::now().to_rfc3339();
        store.conn.execute(
            "INSERT INTO memos (id, title, content, category, tags, created_at, updated_at)
             VALUES (?1, 'Legacy', 'Body', 'groceries', '[]', ?2, ?2)",
            params![Ulid::new().to_string(), now],
        )?;

        let memos = store.list(&ListFilter::default())?;
        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0].category, Category::Other);

        Ok(())
    }

    #[test]
    fn test_draft_roundtrip() -> Result<()> {
        let store = LocalStore::open_memory()?;

        let memo = MemoDraft::new("From draft", "Body")
            .with_category(Category::Study)
            .with_tags(vec!["exam".to_string()])
            .into_memo();
        store.insert(&memo)?;

        let reloaded = store.get(&memo.id)?.unwrap();
        assert_eq!(reloaded.category, Category::Study);
        assert_eq!(reloaded.tags, vec!["exam"]);
        assert_eq!(reloaded, memo);

        Ok(())
    }
}
