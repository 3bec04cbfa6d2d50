//! Approve/reject commands

use std::sync::Arc;

use anyhow::{Result, bail};
use redline_core::ChunkStatus;
use redline_workflow::{Outcome, ReviewBackend, ReviewSession};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn past_tense(&self) -> &'static str {
        match self {
            Decision::Approve => "Approved",
            Decision::Reject => "Rejected",
        }
    }
}

async fn load(backend: Arc<dyn ReviewBackend>) -> Result<ReviewSession> {
    let mut session = ReviewSession::new(backend);
    if !session.refresh().await {
        bail!(session.error().unwrap_or_default());
    }
    Ok(session)
}

fn finish(session: &ReviewSession, outcome: Outcome, done: String) -> Result<()> {
    match outcome {
        Outcome::RefreshRequired => {
            println!("✓ {}", done);
            if let Some(view) = session.view() {
                println!("  {}", view.summary);
            }
            Ok(())
        }
        Outcome::Failed(message) => bail!(message),
        Outcome::Busy => bail!("Another review action is still in progress"),
        Outcome::Skipped => bail!("Nothing to do: no pending chunks matched"),
    }
}

pub async fn single(backend: Arc<dyn ReviewBackend>, decision: Decision, chunk_id: String) -> Result<()> {
    let mut session = load(backend).await?;

    let outcome = match decision {
        Decision::Approve => session.approve_one(&chunk_id).await,
        Decision::Reject => session.reject_one(&chunk_id).await,
    };
    if outcome == Outcome::Skipped {
        match session.snapshot().and_then(|s| s.get(&chunk_id)) {
            Some(chunk) if chunk.status == ChunkStatus::Unknown => {
                bail!("Chunk {} has an unrecognized status", chunk_id)
            }
            Some(chunk) => bail!("Chunk {} is already {}", chunk_id, chunk.status.label().to_lowercase()),
            None => bail!("Chunk {} is not in the review queue", chunk_id),
        }
    }

    finish(&session, outcome, format!("{} {}", decision.past_tense(), chunk_id))
}

pub async fn bulk(backend: Arc<dyn ReviewBackend>, decision: Decision, chunk_ids: Vec<String>) -> Result<()> {
    let mut session = load(backend).await?;

    for chunk_id in &chunk_ids {
        if !session.toggle_one(chunk_id, true) {
            warn!(chunk_id = %chunk_id, "Skipping chunk that is not pending");
        }
    }
    let count = session.controller().selection().len();

    let outcome = match decision {
        Decision::Approve => session.bulk_approve_selected().await,
        Decision::Reject => session.bulk_reject_selected().await,
    };

    finish(
        &session,
        outcome,
        format!("{} {} chunk{}", decision.past_tense(), count, if count == 1 { "" } else { "s" }),
    )
}
