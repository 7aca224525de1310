//! Remote API types
//!
//! DTOs for server communication.

use serde::{Deserialize, Serialize};

use crate::core::memo::{Category, Memo, MemoDraft, MemoPatch};

// ============== Memo Types ==============

/// Memo from server
///
/// Categories and timestamps arrive as plain strings; conversion to the
/// core types is lossy-but-total so one malformed row never fails a whole
/// listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl MemoDto {
    /// Convert to the core memo type
    pub fn into_memo(self) -> Memo {
        let created_at = parse_timestamp(self.created_at.as_deref());
        let updated_at = self
            .updated_at
            .as_deref()
            .map(|s| parse_timestamp(Some(s)))
            .unwrap_or(created_at);

        Memo {
            id: self.id.parse().unwrap_or_else(|_| ulid::Ulid::new()),
            title: self.title,
            content: self.content,
            category: Category::parse_lossy(&self.category),
            tags: self.tags,
            summary: self.summary,
            created_at,
            updated_at,
        }
    }
}

fn parse_timestamp(s: Option<&str>) -> chrono::DateTime<chrono::Utc> {
    s.and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(chrono::Utc::now)
}

/// Response from list memos endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoListResponse {
    pub memos: Vec<MemoDto>,
    pub total: usize,
}

/// Request to create a memo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemoRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<&MemoDraft> for CreateMemoRequest {
    fn from(draft: &MemoDraft) -> Self {
        Self {
            title: draft.title.clone(),
            content: draft.content.clone(),
            category: draft.category.as_str().to_string(),
            tags: if draft.tags.is_empty() {
                None
            } else {
                Some(draft.tags.clone())
            },
        }
    }
}

/// Request to update a memo (absent fields are left untouched)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl From<&MemoPatch> for UpdateMemoRequest {
    fn from(patch: &MemoPatch) -> Self {
        Self {
            title: patch.title.clone(),
            content: patch.content.clone(),
            category: patch.category.map(|c| c.as_str().to_string()),
            tags: patch.tags.clone(),
            summary: patch.summary.clone(),
        }
    }
}

// ============== Search Types ==============

/// Search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<MemoDto>,
    pub total: usize,
}

// ============== Summarize Types ==============

/// Response from the summarize endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

// ============== Error Types ==============

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_into_memo() {
        let dto = MemoDto {
            id: ulid::Ulid::new().to_string(),
            title: "Remote memo".to_string(),
            content: "Body".to_string(),
            category: "work".to_string(),
            tags: vec!["a".to_string()],
            summary: None,
            created_at: Some("2026-08-01T10:00:00+00:00".to_string()),
            updated_at: Some("2026-08-02T10:00:00+00:00".to_string()),
        };

        let memo = dto.into_memo();
        assert_eq!(memo.category, Category::Work);
        assert!(memo.updated_at > memo.created_at);
        assert!(memo.is_edited());
    }

    #[test]
    fn test_dto_unknown_category() {
        let dto = MemoDto {
            id: "not-a-ulid".to_string(),
            title: "T".to_string(),
            content: String::new(),
            category: "mystery".to_string(),
            tags: Vec::new(),
            summary: None,
            created_at: None,
            updated_at: None,
        };

        let memo = dto.into_memo();
        assert_eq!(memo.category, Category::Other);
        // Missing updated_at falls back to created_at
        assert_eq!(memo.created_at, memo.updated_at);
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let patch = MemoPatch {
            title: Some("New".to_string()),
            ..Default::default()
        };
        let req = UpdateMemoRequest::from(&patch);
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"title":"New"}"#);
    }

    #[test]
    fn test_create_request_from_draft() {
        let draft = MemoDraft::new("T", "B").with_category(Category::Idea);
        let req = CreateMemoRequest::from(&draft);
        assert_eq!(req.category, "idea");
        assert!(req.tags.is_none());
    }
}
