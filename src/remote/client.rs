//! Remote server HTTP client
//!
//! Async client for the memo server API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use url::Url;

use super::types::*;
use crate::config::ApiConfig;
use crate::core::storage::ListFilter;

/// HTTP client for a remote memo server
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RemoteClient {
    /// Create new client from the [api] config section
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let url = config.url.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Server URL not configured. Set api.url in config.")
        })?;

        Self::new(url, config.token.clone(), config.timeout_secs)
    }

    /// Create new client with explicit parameters
    pub fn new(base_url: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Server host, for display
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or("remote")
    }

    /// Build a URL for an endpoint
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }

    /// Add auth header if token is set
    fn auth_header(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref token) = self.token {
            builder.header("Authorization", format!("Bearer {}", token))
        } else {
            builder
        }
    }

    // ============== Memos ==============

    /// List memos, optionally filtered by category or tag
    pub async fn list_memos(&self, filter: &ListFilter) -> Result<Vec<MemoDto>> {
        let mut url = self.url("/api/v1/memos")?;

        if let Some(category) = filter.category {
            url.query_pairs_mut()
                .append_pair("category", category.as_str());
        }
        if let Some(tag) = &filter.tag {
            url.query_pairs_mut().append_pair("tag", tag);
        }
        if filter.limit > 0 {
            url.query_pairs_mut()
                .append_pair("limit", &filter.limit.to_string());
        }

        let resp = self
            .auth_header(self.client.get(url))
            .send()
            .await
            .context("Failed to list memos")?;

        self.handle_response::<MemoListResponse>(resp)
            .await
            .map(|r| r.memos)
    }

    /// Get a memo by ID
    pub async fn get_memo(&self, id: &str) -> Result<MemoDto> {
        let url = self.url(&format!("/api/v1/memos/{}", id))?;

        let resp = self
            .auth_header(self.client.get(url))
            .send()
            .await
            .context("Failed to get memo")?;

        self.handle_response(resp).await
    }

    /// Create a memo
    pub async fn create_memo(&self, draft: &crate::core::memo::MemoDraft) -> Result<MemoDto> {
        let url = self.url("/api/v1/memos")?;
        let req = CreateMemoRequest::from(draft);

        let resp = self
            .auth_header(self.client.post(url))
            .json(&req)
            .send()
            .await
            .context("Failed to create memo")?;

        self.handle_response(resp).await
    }

    /// Update a memo
    pub async fn update_memo(
        &self,
        id: &str,
        patch: &crate::core::memo::MemoPatch,
    ) -> Result<MemoDto> {
        let url = self.url(&format!("/api/v1/memos/{}", id))?;
        let req = UpdateMemoRequest::from(patch);

        let resp = self
            .auth_header(self.client.patch(url))
            .json(&req)
            .send()
            .await
            .context("Failed to update memo")?;

        self.handle_response(resp).await
    }

    /// Delete a memo
    pub async fn delete_memo(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("/api/v1/memos/{}", id))?;

        let resp = self
            .auth_header(self.client.delete(url))
            .send()
            .await
            .context("Failed to delete memo")?;

        if resp.status() == StatusCode::NOT_FOUND {
            anyhow::bail!("Memo {} not found", id);
        }

        if !resp.status().is_success() {
            let err = self.extract_error(resp).await;
            anyhow::bail!("Failed to delete memo: {}", err);
        }

        Ok(())
    }

    // ============== Search ==============

    /// Search memos
    pub async fn search_memos(&self, query: &str, limit: usize) -> Result<Vec<MemoDto>> {
        let url = self.url("/api/v1/memos/search")?;

        let req = SearchRequest {
            query: query.to_string(),
            limit: Some(limit),
        };

        let resp = self
            .auth_header(self.client.post(url))
            .json(&req)
            .send()
            .await
            .context("Failed to search")?;

        self.handle_response::<SearchResponse>(resp)
            .await
            .map(|r| r.results)
    }

    // ============== Summarize ==============

    /// Request an AI summary for a memo
    ///
    /// The server runs the provider call; this returns the finished text.
    pub async fn summarize_memo(&self, id: &str) -> Result<String> {
        let url = self.url(&format!("/api/v1/memos/{}/summarize", id))?;

        let resp = self
            .auth_header(self.client.post(url))
            .send()
            .await
            .context("Failed to reach the summarize endpoint")?;

        self.handle_response::<SummarizeResponse>(resp)
            .await
            .map(|r| r.summary)
    }

    // ============== Helpers ==============

    /// Handle response and deserialize
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T> {
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            anyhow::bail!("Resource not found");
        }

        if !status.is_success() {
            let err = self.extract_error(resp).await;
            anyhow::bail!("API error ({}): {}", status, err);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Extract error message from response
    async fn extract_error(&self, resp: reqwest::Response) -> String {
        if let Ok(err) = resp.json::<ApiErrorResponse>().await {
            err.error
        } else {
            "Unknown error".to_string()
        }
    }
}
