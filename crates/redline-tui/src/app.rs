use std::sync::Arc;

use redline_core::{Chunk, ChunkStatus};
use redline_workflow::{Outcome, ReviewBackend, ReviewSession};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Approve,
    Reject,
}

impl BulkAction {
    pub fn verb(&self) -> &'static str {
        match self {
            BulkAction::Approve => "Approve",
            BulkAction::Reject => "Reject",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    ConfirmBulk(BulkAction),
    ShowingHelp,
}

pub struct App {
    pub session: ReviewSession,
    pub cursor: usize,
    pub input_mode: InputMode,
    pub detail_scroll: u16,
    pub show_legend: bool,
    pub status_message: Option<String>,
}

impl App {
    pub async fn new(backend: Arc<dyn ReviewBackend>, show_legend: bool) -> Self {
        let mut app = Self {
            session: ReviewSession::new(backend),
            cursor: 0,
            input_mode: InputMode::Normal,
            detail_scroll: 0,
            show_legend,
            status_message: None,
        };
        app.refresh().await;
        app
    }

    pub fn chunks(&self) -> &[Chunk] {
        self.session
            .snapshot()
            .map(|s| s.chunks.as_slice())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<&Chunk> {
        self.chunks().get(self.cursor)
    }

    pub fn next(&mut self) {
        let len = self.chunks().len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
        self.detail_scroll = 0;
    }

    pub fn previous(&mut self) {
        let len = self.chunks().len();
        if len == 0 {
            return;
        }
        self.cursor = if self.cursor == 0 { len - 1 } else { self.cursor - 1 };
        self.detail_scroll = 0;
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(5);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(5);
    }

    pub fn toggle_help(&mut self) {
        self.input_mode = match self.input_mode {
            InputMode::ShowingHelp => InputMode::Normal,
            _ => InputMode::ShowingHelp,
        };
    }

    pub fn toggle_legend(&mut self) {
        self.show_legend = !self.show_legend;
    }

    pub async fn refresh(&mut self) {
        if self.session.refresh().await {
            self.status_message = Some("Refreshed".to_string());
        } else {
            self.status_message = None;
        }
        self.clamp_cursor();
    }

    /// Toggle the checkbox of the chunk under the cursor
    pub fn toggle_current(&mut self) {
        let Some(chunk) = self.current() else {
            return;
        };
        if chunk.status == ChunkStatus::Unknown {
            self.status_message = Some(format!("{} has an unrecognized status", chunk.chunk_id));
            return;
        }
        if !chunk.is_pending() {
            self.status_message = Some(format!("{} is already {}", chunk.chunk_id, chunk.status.label().to_lowercase()));
            return;
        }
        let chunk_id = chunk.chunk_id.clone();
        let selected = self.session.controller().selection().is_selected(&chunk_id);
        self.session.toggle_one(&chunk_id, !selected);
    }

    /// Select every pending chunk, or clear the selection if all are selected
    pub fn toggle_all(&mut self) {
        let all_selected = self
            .session
            .view()
            .and_then(|view| view.select_all)
            .is_some_and(|control| control.state == redline_core::SelectAllState::Checked);
        self.session.toggle_all(!all_selected);
    }

    pub async fn approve_current(&mut self) {
        if let Some(chunk_id) = self.current_pending_id() {
            let outcome = self.session.approve_one(&chunk_id).await;
            self.report(outcome, format!("Approved {}", chunk_id));
        }
    }

    pub async fn reject_current(&mut self) {
        if let Some(chunk_id) = self.current_pending_id() {
            let outcome = self.session.reject_one(&chunk_id).await;
            self.report(outcome, format!("Rejected {}", chunk_id));
        }
    }

    /// Ask for confirmation before a bulk action; ignored with nothing selected
    pub fn start_bulk(&mut self, action: BulkAction) {
        if self.session.controller().selection().is_empty() {
            self.status_message = Some("Nothing selected".to_string());
            return;
        }
        self.input_mode = InputMode::ConfirmBulk(action);
    }

    pub async fn confirm_bulk(&mut self) {
        let InputMode::ConfirmBulk(action) = self.input_mode else {
            return;
        };
        self.input_mode = InputMode::Normal;

        let count = self.session.controller().selection().len();
        let outcome = match action {
            BulkAction::Approve => self.session.bulk_approve_selected().await,
            BulkAction::Reject => self.session.bulk_reject_selected().await,
        };
        let past = match action {
            BulkAction::Approve => "Approved",
            BulkAction::Reject => "Rejected",
        };
        self.report(outcome, format!("{} {} chunk{}", past, count, if count == 1 { "" } else { "s" }));
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn current_pending_id(&self) -> Option<String> {
        self.current()
            .filter(|c| c.is_pending())
            .map(|c| c.chunk_id.clone())
    }

    fn report(&mut self, outcome: Outcome, success: String) {
        debug!(?outcome, "Review action finished");
        self.status_message = match outcome {
            Outcome::RefreshRequired => Some(success),
            Outcome::Busy => Some("Another action is still running".to_string()),
            // Failure text is shown from the session's error
            Outcome::Failed(_) | Outcome::Skipped => None,
        };
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.chunks().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }
}
