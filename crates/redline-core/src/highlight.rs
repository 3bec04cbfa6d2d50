//! Redaction highlighting
//!
//! Turns parsed segments into display spans. Placeholders with metadata get a
//! palette chosen by provenance and a tooltip; placeholders without metadata
//! fall back to plain text so one inconsistent chunk never blocks the queue.

use std::collections::HashMap;

use serde::Serialize;

use crate::chunk::{Chunk, Redaction, RedactionSource};
use crate::placeholder::{self, Segment};

/// Background/border color pair for a highlighted placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub border: &'static str,
}

pub const PII_PALETTE: Palette = Palette {
    background: "#fef3c7",
    border: "#f59e0b",
};

pub const SECRET_PALETTE: Palette = Palette {
    background: "#fee2e2",
    border: "#ef4444",
};

impl RedactionSource {
    /// Unknown sources borrow the PII palette; a redaction is never hidden.
    pub fn palette(&self) -> Palette {
        match self {
            RedactionSource::Pii => PII_PALETTE,
            RedactionSource::Secret => SECRET_PALETTE,
            RedactionSource::Other(_) => PII_PALETTE,
        }
    }
}

/// One unit of rendered output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedSpan {
    Plain {
        text: String,
    },
    Highlighted {
        text: String,
        background: &'static str,
        border: &'static str,
        tooltip: String,
    },
}

impl RenderedSpan {
    pub fn text(&self) -> &str {
        match self {
            RenderedSpan::Plain { text } | RenderedSpan::Highlighted { text, .. } => text,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, RenderedSpan::Highlighted { .. })
    }
}

/// Exact-match lookup from placeholder string to its redaction record
#[derive(Debug, Default)]
pub struct RedactionIndex<'a> {
    by_placeholder: HashMap<&'a str, &'a Redaction>,
}

impl<'a> RedactionIndex<'a> {
    /// If a placeholder is listed twice, the last record wins.
    pub fn new(redactions: &'a [Redaction]) -> Self {
        let mut by_placeholder = HashMap::with_capacity(redactions.len());
        for redaction in redactions {
            by_placeholder.insert(redaction.placeholder.as_str(), redaction);
        }
        Self { by_placeholder }
    }

    pub fn get(&self, placeholder: &str) -> Option<&'a Redaction> {
        self.by_placeholder.get(placeholder).copied()
    }

    pub fn len(&self) -> usize {
        self.by_placeholder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_placeholder.is_empty()
    }
}

/// Render parsed segments against a chunk's redactions.
pub fn render(segments: &[Segment<'_>], redactions: &[Redaction]) -> Vec<RenderedSpan> {
    let index = RedactionIndex::new(redactions);

    segments
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => RenderedSpan::Plain {
                text: text.to_string(),
            },
            Segment::Placeholder(token) => match index.get(token) {
                Some(redaction) => {
                    let palette = redaction.source.palette();
                    RenderedSpan::Highlighted {
                        text: token.to_string(),
                        background: palette.background,
                        border: palette.border,
                        tooltip: redaction.tooltip(),
                    }
                }
                None => {
                    tracing::warn!(placeholder = %token, "placeholder has no redaction metadata");
                    RenderedSpan::Plain {
                        text: token.to_string(),
                    }
                }
            },
        })
        .collect()
}

/// Parse and render a chunk's redacted text in one step
pub fn render_chunk(chunk: &Chunk) -> Vec<RenderedSpan> {
    render(&placeholder::parse(&chunk.redacted_text), &chunk.redactions)
}
