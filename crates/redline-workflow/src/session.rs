//! Review session
//!
//! Owns the latest queue snapshot and the controller for one open review
//! queue. Snapshots are replaced wholesale on every refresh; a failed refresh
//! keeps the previous snapshot on screen next to the error.

use std::sync::Arc;

use redline_core::{QueueView, ReviewQueueSnapshot, view};
use tracing::{debug, warn};

use crate::backend::{Operation, ReviewBackend};
use crate::controller::{self, Mutation, Outcome, ReviewController};

pub struct ReviewSession {
    controller: ReviewController,
    snapshot: Option<ReviewQueueSnapshot>,
    loading: bool,
    fetch_error: Option<String>,
}

impl ReviewSession {
    pub fn new(backend: Arc<dyn ReviewBackend>) -> Self {
        Self {
            controller: ReviewController::new(backend),
            snapshot: None,
            loading: false,
            fetch_error: None,
        }
    }

    pub fn controller(&self) -> &ReviewController {
        &self.controller
    }

    pub fn snapshot(&self) -> Option<&ReviewQueueSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error to display: a failed fetch takes precedence over a failed mutation
    pub fn error(&self) -> Option<String> {
        self.fetch_error
            .clone()
            .or_else(|| self.controller.last_error())
    }

    /// Fetch a fresh snapshot. Returns `true` when the snapshot was replaced.
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        self.fetch_error = None;

        let result = self.controller.backend().fetch_queue().await;
        self.loading = false;

        match result {
            Ok(snapshot) => {
                debug!(
                    chunks = snapshot.chunks.len(),
                    total = snapshot.total_count,
                    "Review queue refreshed"
                );
                self.controller.retain_pending(&snapshot.pending_ids());
                self.snapshot = Some(snapshot);
                true
            }
            Err(err) => {
                let message = controller::error_message(&err, Operation::FetchQueue);
                warn!(error = %message, "Failed to refresh review queue");
                self.fetch_error = Some(message);
                false
            }
        }
    }

    pub async fn approve_one(&mut self, chunk_id: &str) -> Outcome {
        if !self.is_pending(chunk_id) {
            return Outcome::Skipped;
        }
        self.apply(Mutation::Approve(chunk_id.to_string())).await
    }

    pub async fn reject_one(&mut self, chunk_id: &str) -> Outcome {
        if !self.is_pending(chunk_id) {
            return Outcome::Skipped;
        }
        self.apply(Mutation::Reject(chunk_id.to_string())).await
    }

    /// Approve every selected chunk in one backend call
    pub async fn bulk_approve_selected(&mut self) -> Outcome {
        let ids = self.selected_ids();
        self.apply(Mutation::BulkApprove(ids)).await
    }

    /// Reject every selected chunk in one backend call
    pub async fn bulk_reject_selected(&mut self) -> Outcome {
        let ids = self.selected_ids();
        self.apply(Mutation::BulkReject(ids)).await
    }

    pub fn toggle_one(&self, chunk_id: &str, selected: bool) -> bool {
        if !self.is_pending(chunk_id) {
            return false;
        }
        self.controller.toggle_one(chunk_id, selected)
    }

    pub fn toggle_all(&self, select_all: bool) -> bool {
        self.controller.toggle_all(select_all, &self.pending_ids())
    }

    /// Current view model, or `None` before the first successful fetch
    pub fn view(&self) -> Option<QueueView<'_>> {
        let snapshot = self.snapshot.as_ref()?;
        let selection = self.controller.selection();
        Some(view::build(
            snapshot,
            &selection,
            self.controller.is_in_flight(),
        ))
    }

    async fn apply(&mut self, mutation: Mutation) -> Outcome {
        if mutation.chunk_ids().is_empty() {
            return Outcome::Skipped;
        }
        self.fetch_error = None;
        let outcome = self.controller.run(mutation).await;
        // Status changes only arrive through a fresh snapshot
        if outcome.needs_refresh() {
            self.refresh().await;
        }
        outcome
    }

    fn pending_ids(&self) -> Vec<String> {
        self.snapshot
            .as_ref()
            .map(|s| s.pending_ids())
            .unwrap_or_default()
    }

    fn selected_ids(&self) -> Vec<String> {
        self.controller
            .selection()
            .selected_in_order(&self.pending_ids())
    }

    fn is_pending(&self, chunk_id: &str) -> bool {
        self.snapshot
            .as_ref()
            .and_then(|s| s.get(chunk_id))
            .is_some_and(|c| c.is_pending())
    }
}
