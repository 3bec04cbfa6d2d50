//! Queue view model
//!
//! Pure projection of a snapshot, the current selection, and the in-flight
//! flag into what a front end should show. Front ends (TUI, CLI) draw from
//! this rather than re-deriving visibility rules.

use crate::chunk::{Chunk, ChunkStatus, ReviewQueueSnapshot};
use crate::highlight::{self, RenderedSpan};
use crate::selection::{SelectAllState, SelectionStore};

pub const EMPTY_QUEUE_MESSAGE: &str = "No chunks pending review";

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// "N chunk(s) in queue"
pub fn count_line(count: usize) -> String {
    format!("{} chunk{} in queue", count, plural(count))
}

/// "N redaction(s)"
pub fn redaction_summary(count: usize) -> String {
    format!("{} redaction{}", count, plural(count))
}

/// "N selected"
pub fn selection_summary(count: usize) -> String {
    format!("{} selected", count)
}

/// Control state for one chunk
#[derive(Debug, Clone)]
pub struct ChunkRow<'a> {
    pub chunk: &'a Chunk,
    pub spans: Vec<RenderedSpan>,
    /// `None` when the chunk has no redactions
    pub redaction_line: Option<String>,
    /// Checkbox and approve/reject controls exist only for pending chunks
    pub show_controls: bool,
    pub selected: bool,
    pub controls_enabled: bool,
}

impl ChunkRow<'_> {
    pub fn status(&self) -> ChunkStatus {
        self.chunk.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectAllControl {
    pub state: SelectAllState,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkBar {
    pub label: String,
    pub chunk_ids: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct QueueView<'a> {
    /// Empty-state message or the count line
    pub summary: String,
    pub rows: Vec<ChunkRow<'a>>,
    /// Present only when at least one pending chunk exists
    pub select_all: Option<SelectAllControl>,
    /// Present only when the selection is non-empty
    pub bulk_bar: Option<BulkBar>,
}

impl QueueView<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn build<'a>(
    snapshot: &'a ReviewQueueSnapshot,
    selection: &SelectionStore,
    in_flight: bool,
) -> QueueView<'a> {
    if snapshot.chunks.is_empty() {
        return QueueView {
            summary: EMPTY_QUEUE_MESSAGE.to_string(),
            rows: Vec::new(),
            select_all: None,
            bulk_bar: None,
        };
    }

    let enabled = !in_flight;
    let pending_ids = snapshot.pending_ids();

    let rows = snapshot
        .chunks
        .iter()
        .map(|chunk| {
            let show_controls = chunk.is_pending();
            ChunkRow {
                chunk,
                spans: highlight::render_chunk(chunk),
                redaction_line: (!chunk.redactions.is_empty())
                    .then(|| redaction_summary(chunk.redactions.len())),
                show_controls,
                selected: show_controls && selection.is_selected(&chunk.chunk_id),
                controls_enabled: show_controls && enabled,
            }
        })
        .collect();

    let select_all = (!pending_ids.is_empty()).then(|| SelectAllControl {
        state: selection.select_all_state(&pending_ids),
        enabled,
    });

    let selected_ids = selection.selected_in_order(&pending_ids);
    let bulk_bar = (!selected_ids.is_empty()).then(|| BulkBar {
        label: selection_summary(selected_ids.len()),
        chunk_ids: selected_ids,
        enabled,
    });

    QueueView {
        // Server-reported total, not the page length. The empty state is
        // decided by the rows alone.
        summary: count_line(snapshot.total_count),
        rows,
        select_all,
        bulk_bar,
    }
}
