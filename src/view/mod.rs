//! Memo detail view state machine
//!
//! Drives the interactive viewer: a memo is opened into the view, a
//! summary can be requested exactly once while none is present, and
//! closing from any trigger tears the whole thing down. Summary work
//! runs against a per-open cancellation token so results that arrive
//! after the view closed are dropped instead of mutating dead state.

mod session;

pub use session::{SessionOutcome, ViewSession};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use ulid::Ulid;

use crate::core::memo::Memo;
use crate::core::store::MemoStore;
use crate::core::summarize::Summarizer;

/// Observable state of the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Closed,
    /// Open with no summary and none in flight
    Idle,
    /// Open with a summary request running
    Summarizing,
    /// Open with summary text available
    Summarized,
}

/// One in-flight summary request, bound to the view generation that
/// issued it. Closing the view cancels the token; a ticket that runs
/// to completion afterwards resolves to [`SummaryResult::Cancelled`].
pub struct SummaryTicket {
    memo: Memo,
    cancel: CancellationToken,
}

impl SummaryTicket {
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run the summarizer, racing it against cancellation
    pub async fn run<S: Summarizer + ?Sized>(&self, summarizer: &S) -> SummaryResult {
        tokio::select! {
            _ = self.cancel.cancelled() => SummaryResult::Cancelled,
            result = summarizer.summarize(&self.memo) => match result {
                Ok(text) => SummaryResult::Completed(text),
                Err(err) => SummaryResult::Failed(err),
            },
        }
    }
}

/// Outcome of a summary ticket
#[derive(Debug)]
pub enum SummaryResult {
    Completed(String),
    Failed(anyhow::Error),
    Cancelled,
}

/// The detail view itself
pub struct DetailView {
    memo: Option<Memo>,
    summary_text: Option<String>,
    summarizing: bool,
    cancel: CancellationToken,
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            memo: None,
            summary_text: None,
            summarizing: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Open the view on a memo. Opening nothing leaves the view as it
    /// was; opening over an already-open view replaces it, cancelling
    /// any summary still in flight for the previous memo.
    pub fn open(&mut self, memo: Option<Memo>) {
        let Some(memo) = memo else { return };
        if self.memo.is_some() {
            self.close();
        }
        self.summary_text = memo.summary.clone();
        self.memo = Some(memo);
        self.summarizing = false;
        self.cancel = CancellationToken::new();
    }

    /// Close the view. Escape, quit, and programmatic closes all land
    /// here and behave identically; closing a closed view is a no-op.
    pub fn close(&mut self) {
        if self.memo.is_none() {
            return;
        }
        self.cancel.cancel();
        self.memo = None;
        self.summary_text = None;
        self.summarizing = false;
    }

    pub fn state(&self) -> ViewState {
        match &self.memo {
            None => ViewState::Closed,
            Some(_) if self.summarizing => ViewState::Summarizing,
            Some(_) if self.summary_text.is_some() => ViewState::Summarized,
            Some(_) => ViewState::Idle,
        }
    }

    pub fn is_open(&self) -> bool {
        self.memo.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.memo.is_none()
    }

    pub fn memo(&self) -> Option<&Memo> {
        self.memo.as_ref()
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary_text.as_deref()
    }

    /// Start a summary request. Returns no ticket while the view is
    /// closed, a request is already running, or a summary is already
    /// present.
    pub fn begin_summary(&mut self) -> Option<SummaryTicket> {
        let memo = self.memo.as_ref()?;
        if self.summarizing || self.summary_text.is_some() {
            return None;
        }
        self.summarizing = true;
        Some(SummaryTicket {
            memo: memo.clone(),
            cancel: self.cancel.clone(),
        })
    }

    /// Apply the outcome of a summary ticket. Results for a closed
    /// view or a different memo are dropped. A failure returns the
    /// view to idle and yields an alert message for the caller to
    /// show.
    pub fn finish_summary(&mut self, ticket: &SummaryTicket, result: SummaryResult) -> Option<String> {
        let Some(memo) = self.memo.as_mut() else {
            tracing::debug!(memo_id = %ticket.memo.id, "dropping summary result for closed view");
            return None;
        };
        if memo.id != ticket.memo.id || !self.summarizing {
            tracing::debug!(memo_id = %ticket.memo.id, "dropping stale summary result");
            return None;
        }

        self.summarizing = false;
        match result {
            SummaryResult::Completed(text) => {
                memo.summary = Some(text.clone());
                self.summary_text = Some(text);
                None
            }
            SummaryResult::Failed(err) => Some(format!("Summarization failed: {}", err)),
            SummaryResult::Cancelled => None,
        }
    }

    /// Hand the memo off for editing. The view closes first so the
    /// edit notification always observes a closed view.
    pub fn request_edit(&mut self) -> Option<Memo> {
        let memo = self.memo.clone()?;
        self.close();
        Some(memo)
    }

    /// Delete the shown memo once the caller has confirmed. A declined
    /// confirmation changes nothing. On success the view closes; if
    /// deletion fails the view stays open and the error comes back as
    /// an alert message.
    pub async fn request_delete<S: MemoStore + ?Sized>(
        &mut self,
        store: &S,
        confirmed: bool,
    ) -> Result<Option<String>> {
        let Some(memo) = self.memo.as_ref() else {
            return Ok(None);
        };
        if !confirmed {
            return Ok(None);
        }
        match store.delete(&memo.id).await {
            Ok(()) => {
                self.close();
                Ok(None)
            }
            Err(err) => Ok(Some(format!("Failed to delete memo: {}", err))),
        }
    }

    /// Id of the memo currently shown
    pub fn memo_id(&self) -> Option<Ulid> {
        self.memo.as_ref().map(|m| m.id)
    }
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}
