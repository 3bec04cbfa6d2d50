//! Queue command - print the review queue

use std::sync::Arc;

use anyhow::{Result, anyhow};
use redline_core::RenderedSpan;
use redline_core::view::ChunkRow;
use redline_workflow::{ReviewBackend, ReviewSession};
use serde_json::json;

pub async fn handle(backend: Arc<dyn ReviewBackend>, format: &str, pending_only: bool) -> Result<()> {
    let mut session = ReviewSession::new(backend);
    if !session.refresh().await {
        return Err(anyhow!(session.error().unwrap_or_default()));
    }

    let (Some(snapshot), Some(view)) = (session.snapshot(), session.view()) else {
        return Ok(());
    };
    let rows: Vec<&ChunkRow<'_>> = view
        .rows
        .iter()
        .filter(|row| !pending_only || row.show_controls)
        .collect();

    match format {
        "json" => {
            let chunks: Vec<_> = rows
                .iter()
                .map(|row| {
                    json!({
                        "chunk_id": row.chunk.chunk_id,
                        "document_id": row.chunk.document_id,
                        "status": row.chunk.status,
                        "redacted_text": row.chunk.redacted_text,
                        "redactions": row.chunk.redactions,
                        "spans": row.spans,
                    })
                })
                .collect();
            let output = json!({
                "summary": view.summary,
                "total_count": snapshot.total_count,
                "status_counts": snapshot.status_counts(),
                "chunks": chunks,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("{}", view.summary);
            if !rows.is_empty() {
                let counts = snapshot.status_counts();
                println!(
                    "({} pending, {} approved, {} rejected)\n",
                    counts.pending, counts.approved, counts.rejected
                );
            }
            for row in rows {
                println!("{}", format_row(row));
            }
        }
    }

    Ok(())
}

/// Plain-text block for one chunk. Highlighted placeholders are listed with
/// their tooltip below the text since a terminal has no hover.
pub fn format_row(row: &ChunkRow<'_>) -> String {
    let mut out = format!("{}  {}\n", row.chunk.chunk_id, row.status().label());

    let text: String = row.spans.iter().map(|s| s.text()).collect();
    for line in text.lines() {
        out.push_str(&format!("  {}\n", line));
    }

    if let Some(redaction_line) = &row.redaction_line {
        out.push_str(&format!("  {}\n", redaction_line));
    }
    for span in &row.spans {
        match span {
            RenderedSpan::Highlighted { text, tooltip, .. } => {
                out.push_str(&format!("    {}  {}\n", text, tooltip));
            }
            RenderedSpan::Plain { .. } => {}
        }
    }

    out
}
