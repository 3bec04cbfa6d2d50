//! Review backend trait

use async_trait::async_trait;
use redline_core::{Result, ReviewQueueSnapshot};

/// Acknowledgement body returned by mutating calls. Its shape is backend
/// specific and only logged.
pub type Ack = serde_json::Value;

/// The operations a backend exposes to the review workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchQueue,
    Approve,
    Reject,
    BulkApprove,
    BulkReject,
}

impl Operation {
    /// Message shown when the backend gives no usable detail
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::FetchQueue => "Failed to fetch review queue",
            Operation::Approve => "Failed to approve chunk",
            Operation::Reject => "Failed to reject chunk",
            Operation::BulkApprove => "Failed to bulk approve chunks",
            Operation::BulkReject => "Failed to bulk reject chunks",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::FetchQueue => "fetch_queue",
            Operation::Approve => "approve",
            Operation::Reject => "reject",
            Operation::BulkApprove => "bulk_approve",
            Operation::BulkReject => "bulk_reject",
        }
    }
}

/// System of record for chunks and their review status.
///
/// Bulk calls are treated as atomic: one call, one success or one failure for
/// the whole batch.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    async fn fetch_queue(&self) -> Result<ReviewQueueSnapshot>;

    async fn approve_chunk(&self, chunk_id: &str) -> Result<Ack>;

    async fn reject_chunk(&self, chunk_id: &str) -> Result<Ack>;

    async fn bulk_approve(&self, chunk_ids: &[String]) -> Result<Ack>;

    async fn bulk_reject(&self, chunk_ids: &[String]) -> Result<Ack>;
}
