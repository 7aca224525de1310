//! Summary generation for memos
//!
//! Summaries come from the server's summarization endpoint when one is
//! configured, with an offline extractive fallback otherwise. Either
//! path may fail; callers decide how the error is surfaced.

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::Config;
use crate::core::memo::Memo;
use crate::remote::RemoteClient;

/// Upper bound for extractive summaries
pub const SUMMARY_MAX_CHARS: usize = 160;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a short summary of the memo's content
    async fn summarize(&self, memo: &Memo) -> Result<String>;

    /// Human-readable engine name for status output
    fn name(&self) -> &str;
}

/// Summarizes through the configured server
pub struct RemoteSummarizer {
    client: RemoteClient,
}

impl RemoteSummarizer {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    async fn summarize(&self, memo: &Memo) -> Result<String> {
        self.client.summarize_memo(&memo.id.to_string()).await
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// Offline fallback: first sentence, else truncation at a word boundary
pub struct ExtractiveSummarizer {
    max_chars: usize,
}

impl ExtractiveSummarizer {
    pub fn new() -> Self {
        Self {
            max_chars: SUMMARY_MAX_CHARS,
        }
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, memo: &Memo) -> Result<String> {
        let text = flatten_markdown(&memo.content);
        if text.is_empty() {
            bail!("Memo {} has no content to summarize", memo.short_id());
        }
        Ok(extract(&text, self.max_chars))
    }

    fn name(&self) -> &str {
        "extractive"
    }
}

/// Engine selected by configuration: remote when an API URL is set
pub enum SummaryEngine {
    Remote(RemoteSummarizer),
    Extractive(ExtractiveSummarizer),
}

impl SummaryEngine {
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.api.url.is_some() {
            let client = RemoteClient::from_config(&config.api)?;
            Ok(Self::Remote(RemoteSummarizer::new(client)))
        } else {
            Ok(Self::Extractive(ExtractiveSummarizer::new()))
        }
    }
}

#[async_trait]
impl Summarizer for SummaryEngine {
    async fn summarize(&self, memo: &Memo) -> Result<String> {
        match self {
            Self::Remote(s) => s.summarize(memo).await,
            Self::Extractive(s) => s.summarize(memo).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Remote(s) => s.name(),
            Self::Extractive(s) => s.name(),
        }
    }
}

/// Collapse markdown to plain prose lines: drops code fences and
/// leading block markers, joins the rest with spaces.
fn flatten_markdown(content: &str) -> String {
    let mut out = String::new();
    let mut in_fence = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || trimmed.is_empty() {
            continue;
        }
        let stripped = trimmed.trim_start_matches(['#', '>', '-', '*', ' ']);
        if stripped.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(stripped);
    }

    out
}

fn extract(text: &str, max_chars: usize) -> String {
    // First sentence, when it fits
    if let Some(end) = text.find(|c| c == '.' || c == '!' || c == '?') {
        if end < max_chars {
            return text[..=end].to_string();
        }
    }

    if text.len() <= max_chars {
        return text.to_string();
    }

    let mut cut = max_chars;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncated = &text[..cut];
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{}...", truncated),
    }
}
