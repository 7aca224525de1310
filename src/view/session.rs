//! Interactive terminal session around [`DetailView`](super::DetailView)
//!
//! Renders the open memo, reads single keys, and maps them onto the
//! view's transitions. Deletion asks for confirmation before the store
//! is touched; a declined prompt leaves the view untouched.

use anyhow::Result;
use console::{Key, Style, Term};
use dialoguer::Confirm;

use crate::core::memo::{Memo, MemoPatch};
use crate::core::store::{MemoStore, Store};
use crate::core::summarize::SummaryEngine;
use crate::render::{render_markdown, Palette};

use super::{DetailView, ViewState};

/// How an interactive viewing ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// View closed with the memo unchanged
    Closed,
    /// Memo was deleted during the session
    Deleted,
    /// User asked to edit; the view has already closed
    Edit(Memo),
}

pub struct ViewSession<'a> {
    store: &'a Store,
    summarizer: &'a SummaryEngine,
    term: Term,
    view: DetailView,
}

impl<'a> ViewSession<'a> {
    pub fn new(store: &'a Store, summarizer: &'a SummaryEngine) -> Self {
        Self {
            store,
            summarizer,
            term: Term::stdout(),
            view: DetailView::new(),
        }
    }

    /// Show the memo and process keys until the view closes
    pub async fn run(&mut self, memo: Memo) -> Result<SessionOutcome> {
        self.view.open(Some(memo));
        let mut alert: Option<String> = None;

        while self.view.is_open() {
            self.draw(alert.as_deref())?;

            match self.term.read_key()? {
                Key::Escape | Key::Char('q') => self.view.close(),
                Key::Char('s') => {
                    alert = None;
                    if let Some(ticket) = self.view.begin_summary() {
                        self.draw(None)?;
                        let result = ticket.run(self.summarizer).await;
                        alert = self.view.finish_summary(&ticket, result);
                        if alert.is_none() {
                            alert = self.persist_summary().await;
                        }
                    }
                }
                Key::Char('e') => {
                    if let Some(memo) = self.view.request_edit() {
                        return Ok(SessionOutcome::Edit(memo));
                    }
                }
                Key::Char('d') => {
                    alert = None;
                    let confirmed = self.confirm_delete()?;
                    if let Some(message) = self.view.request_delete(self.store, confirmed).await? {
                        alert = Some(message);
                    } else if self.view.is_closed() {
                        return Ok(SessionOutcome::Deleted);
                    }
                }
                _ => {}
            }
        }

        Ok(SessionOutcome::Closed)
    }

    /// Write the fresh summary back to the store
    async fn persist_summary(&self) -> Option<String> {
        let id = self.view.memo_id()?;
        let text = self.view.summary_text()?.to_string();
        let patch = MemoPatch {
            summary: Some(text),
            ..Default::default()
        };
        match self.store.update(&id, patch).await {
            Ok(_) => None,
            Err(err) => Some(format!("Summary not saved: {}", err)),
        }
    }

    fn confirm_delete(&self) -> Result<bool> {
        let Some(memo) = self.view.memo() else {
            return Ok(false);
        };
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete \"{}\"?", memo.title))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn draw(&self, alert: Option<&str>) -> Result<()> {
        let Some(memo) = self.view.memo() else {
            return Ok(());
        };

        self.term.clear_screen()?;
        let (_, cols) = self.term.size();
        let width = (cols as usize).max(40);
        let palette = Palette::active();

        let id = palette.url.apply_to(format!("[{}]", memo.short_id()));
        let title = Style::new().bold().apply_to(&memo.title);
        self.term.write_line(&format!("{} {}", id, title))?;

        let badge = Style::new()
            .fg(memo.category.color())
            .apply_to(memo.category.label());
        let mut meta = format!("{}  {}", badge, memo.updated_at.format("%Y-%m-%d %H:%M"));
        if !memo.tags.is_empty() {
            let tags = memo
                .tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ");
            meta.push_str(&format!("  {}", palette.url.apply_to(tags)));
        }
        self.term.write_line(&meta)?;

        let rule = "─".repeat(width.min(60));
        self.term.write_line(&palette.rule.apply_to(rule).to_string())?;
        self.term.write_line("")?;
        self.term
            .write_line(&render_markdown(&memo.content, &palette, width))?;

        match self.view.state() {
            ViewState::Summarizing => {
                self.term.write_line("")?;
                self.term
                    .write_line(&Style::new().italic().dim().apply_to("Summarizing...").to_string())?;
            }
            ViewState::Summarized => {
                if let Some(summary) = self.view.summary_text() {
                    self.term.write_line("")?;
                    self.term
                        .write_line(&Style::new().bold().apply_to("Summary").to_string())?;
                    self.term
                        .write_line(&Style::new().italic().apply_to(summary).to_string())?;
                }
            }
            _ => {}
        }

        if let Some(alert) = alert {
            self.term.write_line("")?;
            self.term
                .write_line(&Style::new().red().apply_to(alert).to_string())?;
        }

        self.term.write_line("")?;
        let mut hints = Vec::new();
        if matches!(self.view.state(), ViewState::Idle) {
            hints.push("[s]ummarize");
        }
        hints.extend(["[e]dit", "[d]elete", "[esc] close"]);
        self.term
            .write_line(&palette.url.apply_to(hints.join("  ")).to_string())?;

        Ok(())
    }
}
