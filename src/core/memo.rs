//! Memo - Core data structure
//!
//! A memo is the fundamental unit of content: a titled piece of Markdown
//! with a category, tags, and an optional AI-generated summary.
//!
//! # Key Properties
//! - **id**: ULID (sortable, unique)
//! - **content**: Markdown content
//! - **category**: Closed set (personal/work/study/idea/other)
//! - **summary**: Absent until generated, then cached on the memo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Memo category
///
/// A closed set. Parsing is total: anything outside the set maps to
/// `Other`, so rows written by older clients still display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    Personal,
    Work,
    Study,
    Idea,
    #[default]
    Other,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::Study,
        Category::Idea,
        Category::Other,
    ];

    /// Canonical stored form (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Study => "study",
            Category::Idea => "idea",
            Category::Other => "other",
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Idea => "Idea",
            Category::Other => "Other",
        }
    }

    /// Badge color for terminal output
    pub fn color(&self) -> console::Color {
        match self {
            Category::Personal => console::Color::Blue,
            Category::Work => console::Color::Green,
            Category::Study => console::Color::Magenta,
            Category::Idea => console::Color::Yellow,
            Category::Other => console::Color::Color256(245),
        }
    }

    /// Total parse: unknown input falls back to `Other`
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "personal" => Category::Personal,
            "work" => Category::Work,
            "study" => Category::Study,
            "idea" => Category::Idea,
            _ => Category::Other,
        }
    }

    /// Parse that rejects unknown names, for user-supplied filters
    pub fn parse_strict(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Category::ALL.iter().copied().find(|c| c.as_str() == lower)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::parse_lossy(s))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Category::parse_lossy(&s))
    }
}

/// A memo - a titled piece of Markdown content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    /// Unique identifier (ULID)
    pub id: Ulid,

    /// Title (short description)
    pub title: String,

    /// Full content (Markdown)
    pub content: String,

    /// Category
    #[serde(default)]
    pub category: Category,

    /// Tags, in insertion order
    #[serde(default)]
    pub tags: Vec<String>,

    /// AI-generated summary, once produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (equals `created_at` until first edit)
    pub updated_at: DateTime<Utc>,
}

impl Memo {
    /// Create a new memo with both timestamps set to now
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Ulid::new(),
            title: title.into(),
            content: content.into(),
            category: Category::default(),
            tags: Vec::new(),
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Whether the memo has been edited since creation
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }

    /// Get short ID (first 8 chars)
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_lowercase()
    }
}

impl std::fmt::Display for Memo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.short_id(), self.title)
    }
}

/// Fields for creating a memo
///
/// The store assigns `id`, `created_at`, and `updated_at` on insert, so a
/// draft carries only the user-supplied fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MemoDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: Category::default(),
            tags: Vec::new(),
        }
    }

    /// Set category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Materialize into a full memo with store-assigned id and timestamps
    pub fn into_memo(self) -> Memo {
        Memo::new(self.title, self.content)
            .with_category(self.category)
            .with_tags(self.tags)
    }
}

/// Partial update for a memo
///
/// `None` fields are left untouched. The store bumps `updated_at` when the
/// patch is applied; `created_at` never changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl MemoPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.summary.is_none()
    }

    /// Apply to a memo, bumping `updated_at`
    pub fn apply(self, memo: &mut Memo) {
        if let Some(title) = self.title {
            memo.title = title;
        }
        if let Some(content) = self.content {
            memo.content = content;
        }
        if let Some(category) = self.category {
            memo.category = category;
        }
        if let Some(tags) = self.tags {
            memo.tags = tags;
        }
        if let Some(summary) = self.summary {
            memo.summary = Some(summary);
        }
        memo.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memo() {
        let memo = Memo::new("Shopping list", "- milk\n- eggs");

        assert!(!memo.id.to_string().is_empty());
        assert_eq!(memo.title, "Shopping list");
        assert_eq!(memo.category, Category::Other);
        assert!(memo.tags.is_empty());
        assert!(memo.summary.is_none());
    }

    #[test]
    fn test_timestamps_equal_at_creation() {
        let before = Utc::now();
        let memo = Memo::new("Test", "Content");
        let after = Utc::now();

        assert!(memo.created_at >= before);
        assert!(memo.created_at <= after);
        assert_eq!(memo.created_at, memo.updated_at);
        assert!(!memo.is_edited());
    }

    #[test]
    fn test_unique_ids() {
        let a = Memo::new("A", "1");
        let b = Memo::new("B", "2");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_with_tags() {
        let memo = Memo::new("Test", "Content")
            .with_tags(vec!["rust".to_string(), "notes".to_string()]);

        assert_eq!(memo.tags, vec!["rust", "notes"]);
    }

    #[test]
    fn test_with_category() {
        let memo = Memo::new("Test", "Content").with_category(Category::Work);
        assert_eq!(memo.category, Category::Work);
    }

    #[test]
    fn test_short_id() {
        let memo = Memo::new("Test", "Content");
        let short = memo.short_id();
        assert_eq!(short.len(), 8);
        assert_eq!(short, short.to_lowercase());
    }

    #[test]
    fn test_display() {
        let memo = Memo::new("My Title", "Content");
        let display = format!("{}", memo);
        assert!(display.contains("My Title"));
        assert!(display.contains(&memo.short_id()));
    }

    #[test]
    fn test_category_parse_known() {
        assert_eq!(Category::parse_lossy("personal"), Category::Personal);
        assert_eq!(Category::parse_lossy("Work"), Category::Work);
        assert_eq!(Category::parse_lossy("  study "), Category::Study);
        assert_eq!(Category::parse_lossy("IDEA"), Category::Idea);
    }

    #[test]
    fn test_category_parse_unknown_falls_back() {
        assert_eq!(Category::parse_lossy("groceries"), Category::Other);
        assert_eq!(Category::parse_lossy(""), Category::Other);
    }

    #[test]
    fn test_category_from_str_is_total() {
        let parsed: Category = "anything at all".parse().unwrap();
        assert_eq!(parsed, Category::Other);
    }

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(Category::parse_lossy(cat.as_str()), cat);
        }
    }

    #[test]
    fn test_category_parse_strict() {
        assert_eq!(Category::parse_strict("Work"), Some(Category::Work));
        assert_eq!(Category::parse_strict("other"), Some(Category::Other));
        assert_eq!(Category::parse_strict("groceries"), None);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::Study).unwrap();
        assert_eq!(json, "\"study\"");

        let back: Category = serde_json::from_str("\"study\"").unwrap();
        assert_eq!(back, Category::Study);

        // Unknown stored values deserialize to Other rather than erroring
        let unknown: Category = serde_json::from_str("\"misc\"").unwrap();
        assert_eq!(unknown, Category::Other);
    }

    #[test]
    fn test_category_labels_total() {
        for cat in Category::ALL {
            assert!(!cat.label().is_empty());
        }
    }

    #[test]
    fn test_draft_into_memo() {
        let memo = MemoDraft::new("Title", "Body")
            .with_category(Category::Idea)
            .with_tags(vec!["t".to_string()])
            .into_memo();

        assert_eq!(memo.title, "Title");
        assert_eq!(memo.category, Category::Idea);
        assert_eq!(memo.tags, vec!["t"]);
        assert_eq!(memo.created_at, memo.updated_at);
    }

    #[test]
    fn test_patch_apply() {
        let mut memo = Memo::new("Old", "Old content");
        let created = memo.created_at;

        let patch = MemoPatch {
            title: Some("New".to_string()),
            ..Default::default()
        };
        patch.apply(&mut memo);

        assert_eq!(memo.title, "New");
        assert_eq!(memo.content, "Old content");
        assert_eq!(memo.created_at, created);
        assert!(memo.updated_at >= memo.created_at);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(MemoPatch::default().is_empty());
        assert!(!MemoPatch {
            summary: Some("s".to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_memo_serde_roundtrip() {
        let memo = Memo::new("Serde", "Body")
            .with_category(Category::Personal)
            .with_tags(vec!["a".to_string(), "b".to_string()])
            .with_summary("Short.");

        let json = serde_json::to_string(&memo).unwrap();
        let back: Memo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, memo);
    }
}
