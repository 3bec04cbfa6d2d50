//! Review queue domain model

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A reviewable unit of redacted document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub document_id: String,
    pub redacted_text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub redactions: Vec<Redaction>,
    pub status: ChunkStatus,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Chunk {
    pub fn is_pending(&self) -> bool {
        self.status == ChunkStatus::Pending
    }
}

/// Metadata for one placeholder occurrence inside a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redaction {
    /// Literal token, e.g. `[EMAIL_ADDRESS_1]`
    pub placeholder: String,
    pub entity_type: String,
    pub source: RedactionSource,
}

impl Redaction {
    pub fn new(
        placeholder: impl Into<String>,
        entity_type: impl Into<String>,
        source: RedactionSource,
    ) -> Self {
        Self {
            placeholder: placeholder.into(),
            entity_type: entity_type.into(),
            source,
        }
    }

    /// Hover text: `<entity_type> (<source>)`
    pub fn tooltip(&self) -> String {
        format!("{} ({})", self.entity_type, self.source)
    }
}

/// Where a redaction came from.
///
/// The wire format is an open string; anything other than `pii` or `secret`
/// is kept verbatim in `Other` so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RedactionSource {
    Pii,
    Secret,
    Other(String),
}

impl RedactionSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pii => "pii",
            Self::Secret => "secret",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RedactionSource {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pii" => Self::Pii,
            "secret" => Self::Secret,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for RedactionSource {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<RedactionSource> for String {
    fn from(source: RedactionSource) -> Self {
        match source {
            RedactionSource::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RedactionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-owned review status. `Approved` and `Rejected` are terminal.
///
/// A status this client does not know decodes as `Unknown`. It is displayed
/// like `Pending` but never offered review controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ChunkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending | Self::Unknown => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Hex color used for the status label
    pub fn color(&self) -> &'static str {
        match self {
            Self::Pending | Self::Unknown => "#d97706",
            Self::Approved => "#059669",
            Self::Rejected => "#dc2626",
        }
    }
}

/// One fetch of the review queue. Replaces any previous snapshot wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQueueSnapshot {
    pub chunks: Vec<Chunk>,
    /// Server-reported total; may exceed `chunks.len()` when paginated
    pub total_count: usize,
}

impl ReviewQueueSnapshot {
    /// Ids of chunks still awaiting review, in queue order
    pub fn pending_ids(&self) -> Vec<String> {
        self.chunks
            .iter()
            .filter(|c| c.is_pending())
            .map(|c| c.chunk_id.clone())
            .collect()
    }

    pub fn get(&self, chunk_id: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.chunk_id == chunk_id)
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for chunk in &self.chunks {
            match chunk.status {
                ChunkStatus::Pending => counts.pending += 1,
                ChunkStatus::Approved => counts.approved += 1,
                ChunkStatus::Rejected => counts.rejected += 1,
                ChunkStatus::Unknown => {}
            }
        }
        counts
    }
}

/// Per-status tallies over the chunks in a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}
