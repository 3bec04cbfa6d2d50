//! Review workflow controller
//!
//! Runs approve/reject mutations against the backend one at a time. While a
//! mutation is outstanding the controller is `InFlight` and refuses new
//! mutations and selection changes. Outcomes never patch chunk status
//! locally; a successful mutation asks the caller to re-fetch the queue.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use redline_core::{ReviewError, SelectionStore};
use tracing::{debug, info, warn};

use crate::backend::{Operation, ReviewBackend};

/// A mutation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Approve(String),
    Reject(String),
    BulkApprove(Vec<String>),
    BulkReject(Vec<String>),
}

impl Mutation {
    pub fn operation(&self) -> Operation {
        match self {
            Mutation::Approve(_) => Operation::Approve,
            Mutation::Reject(_) => Operation::Reject,
            Mutation::BulkApprove(_) => Operation::BulkApprove,
            Mutation::BulkReject(_) => Operation::BulkReject,
        }
    }

    pub fn chunk_ids(&self) -> &[String] {
        match self {
            Mutation::Approve(id) | Mutation::Reject(id) => std::slice::from_ref(id),
            Mutation::BulkApprove(ids) | Mutation::BulkReject(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InFlight(Operation),
}

/// Result of a mutation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted the mutation; the caller must re-fetch the queue
    RefreshRequired,
    /// The backend call failed; the message is retained for display
    Failed(String),
    /// Another mutation was in flight; nothing was sent
    Busy,
    /// Nothing to do (empty bulk list, or the chunk is not pending)
    Skipped,
}

impl Outcome {
    pub fn needs_refresh(&self) -> bool {
        matches!(self, Outcome::RefreshRequired)
    }
}

#[derive(Debug)]
struct ControllerState {
    phase: Phase,
    last_error: Option<String>,
    selection: SelectionStore,
}

pub struct ReviewController {
    backend: Arc<dyn ReviewBackend>,
    state: Mutex<ControllerState>,
}

/// Returns the controller to `Idle` however the mutation ends, including
/// when the future is dropped before the backend answers.
struct InFlightGuard<'a> {
    state: &'a Mutex<ControllerState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .phase = Phase::Idle;
    }
}

impl ReviewController {
    pub fn new(backend: Arc<dyn ReviewBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(ControllerState {
                phase: Phase::Idle,
                last_error: None,
                selection: SelectionStore::new(),
            }),
        }
    }

    pub fn backend(&self) -> &Arc<dyn ReviewBackend> {
        &self.backend
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase(), Phase::InFlight(_))
    }

    /// Message from the last failed mutation, cleared when the next one starts
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Copy of the current selection
    pub fn selection(&self) -> SelectionStore {
        self.lock().selection.clone()
    }

    /// Select or deselect one chunk. Returns `false` while in flight.
    pub fn toggle_one(&self, chunk_id: &str, selected: bool) -> bool {
        let mut state = self.lock();
        if state.phase != Phase::Idle {
            return false;
        }
        state.selection.toggle_one(chunk_id, selected);
        true
    }

    /// Select exactly `pending_ids`, or nothing. Returns `false` while in flight.
    pub fn toggle_all<S: AsRef<str>>(&self, select_all: bool, pending_ids: &[S]) -> bool {
        let mut state = self.lock();
        if state.phase != Phase::Idle {
            return false;
        }
        state.selection.toggle_all(select_all, pending_ids);
        true
    }

    /// Drop selected ids that are no longer pending after a refresh
    pub fn retain_pending<S: AsRef<str>>(&self, pending_ids: &[S]) {
        self.lock().selection.retain_pending(pending_ids);
    }

    pub async fn approve_one(&self, chunk_id: &str) -> Outcome {
        self.run(Mutation::Approve(chunk_id.to_string())).await
    }

    pub async fn reject_one(&self, chunk_id: &str) -> Outcome {
        self.run(Mutation::Reject(chunk_id.to_string())).await
    }

    pub async fn bulk_approve(&self, chunk_ids: &[String]) -> Outcome {
        self.run(Mutation::BulkApprove(chunk_ids.to_vec())).await
    }

    pub async fn bulk_reject(&self, chunk_ids: &[String]) -> Outcome {
        self.run(Mutation::BulkReject(chunk_ids.to_vec())).await
    }

    pub async fn run(&self, mutation: Mutation) -> Outcome {
        if mutation.chunk_ids().is_empty() {
            return Outcome::Skipped;
        }

        let operation = mutation.operation();
        {
            let mut state = self.lock();
            if let Phase::InFlight(current) = state.phase {
                warn!(
                    requested = operation.name(),
                    in_flight = current.name(),
                    "Mutation refused while another is in flight"
                );
                return Outcome::Busy;
            }
            state.phase = Phase::InFlight(operation);
            state.last_error = None;
        }
        let _guard = InFlightGuard { state: &self.state };

        debug!(
            operation = operation.name(),
            chunks = mutation.chunk_ids().len(),
            "Sending review mutation"
        );

        let result = match &mutation {
            Mutation::Approve(id) => self.backend.approve_chunk(id).await,
            Mutation::Reject(id) => self.backend.reject_chunk(id).await,
            Mutation::BulkApprove(ids) => self.backend.bulk_approve(ids).await,
            Mutation::BulkReject(ids) => self.backend.bulk_reject(ids).await,
        };

        let mut state = self.lock();
        match result {
            Ok(ack) => {
                info!(
                    operation = operation.name(),
                    chunks = mutation.chunk_ids().len(),
                    "Review mutation accepted"
                );
                debug!(%ack, "Backend acknowledgement");
                state.selection.clear();
                Outcome::RefreshRequired
            }
            Err(err) => {
                let message = error_message(&err, operation);
                warn!(operation = operation.name(), error = %message, "Review mutation failed");
                state.last_error = Some(message.clone());
                Outcome::Failed(message)
            }
        }
    }
}

/// Human-readable message for a failed call
pub fn error_message(err: &ReviewError, operation: Operation) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        operation.fallback_message().to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Ack;
    use async_trait::async_trait;
    use redline_core::{Result, ReviewQueueSnapshot};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
        fail_with: Option<ReviewError>,
    }

    impl CountingBackend {
        fn answer(&self) -> Result<Ack> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(serde_json::json!({"success": true})),
            }
        }
    }

    #[async_trait]
    impl ReviewBackend for CountingBackend {
        async fn fetch_queue(&self) -> Result<ReviewQueueSnapshot> {
            Ok(ReviewQueueSnapshot::default())
        }

        async fn approve_chunk(&self, _chunk_id: &str) -> Result<Ack> {
            self.answer()
        }

        async fn reject_chunk(&self, _chunk_id: &str) -> Result<Ack> {
            self.answer()
        }

        async fn bulk_approve(&self, _chunk_ids: &[String]) -> Result<Ack> {
            self.answer()
        }

        async fn bulk_reject(&self, _chunk_ids: &[String]) -> Result<Ack> {
            self.answer()
        }
    }

    #[tokio::test]
    async fn test_approve_clears_selection() {
        let backend = Arc::new(CountingBackend::default());
        let controller = ReviewController::new(backend.clone());
        controller.toggle_all(true, &["doc-1", "doc-2"]);

        let outcome = controller.approve_one("doc-1").await;

        assert_eq!(outcome, Outcome::RefreshRequired);
        assert!(!controller.selection().is_selected("doc-1"));
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_selection_and_message() {
        let backend = Arc::new(CountingBackend {
            fail_with: Some(ReviewError::backend("Chunk not found")),
            ..Default::default()
        });
        let controller = ReviewController::new(backend);
        controller.toggle_all(true, &["doc-1", "doc-2"]);

        let outcome = controller.bulk_reject(&["doc-1".to_string(), "doc-2".to_string()]).await;

        assert_eq!(outcome, Outcome::Failed("Chunk not found".to_string()));
        assert_eq!(controller.last_error().as_deref(), Some("Chunk not found"));
        assert_eq!(controller.selection().len(), 2);
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_next_attempt_clears_error() {
        let failing = Arc::new(CountingBackend {
            fail_with: Some(ReviewError::Transport("connection refused".to_string())),
            ..Default::default()
        });
        let controller = ReviewController::new(failing);
        controller.reject_one("doc-1").await;
        assert!(controller.last_error().is_some());

        // Swap in a healthy backend for the retry
        let controller = ReviewController {
            backend: Arc::new(CountingBackend::default()),
            state: controller.state,
        };
        assert_eq!(controller.reject_one("doc-1").await, Outcome::RefreshRequired);
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn test_empty_bulk_is_noop() {
        let backend = Arc::new(CountingBackend::default());
        let controller = ReviewController::new(backend.clone());
        controller.toggle_one("doc-1", true);

        assert_eq!(controller.bulk_approve(&[]).await, Outcome::Skipped);
        assert_eq!(controller.bulk_reject(&[]).await, Outcome::Skipped);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(controller.selection().is_selected("doc-1"));
    }

    #[test]
    fn test_empty_message_uses_fallback() {
        let err = ReviewError::backend("");
        assert_eq!(
            error_message(&err, Operation::Approve),
            "Failed to approve chunk"
        );
        let err = ReviewError::backend("Vault is locked");
        assert_eq!(error_message(&err, Operation::Approve), "Vault is locked");
    }

    #[test]
    fn test_mutation_chunk_ids() {
        assert_eq!(Mutation::Approve("a".into()).chunk_ids(), ["a".to_string()]);
        assert!(Mutation::BulkReject(Vec::new()).chunk_ids().is_empty());
    }
}
