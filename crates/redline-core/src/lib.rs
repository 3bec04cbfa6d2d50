//! Core domain models and logic for redline
//!
//! This crate contains:
//! - Domain models (Chunk, Redaction, ReviewQueueSnapshot)
//! - Placeholder tokenizer and redaction highlighting
//! - Selection store for bulk actions
//! - Queue view model shared by front ends

pub mod chunk;
pub mod error;
pub mod highlight;
pub mod placeholder;
pub mod selection;
pub mod view;

pub use chunk::{Chunk, ChunkStatus, Redaction, RedactionSource, ReviewQueueSnapshot, StatusCounts};
pub use error::{Result, ReviewError};
pub use highlight::{Palette, RedactionIndex, RenderedSpan};
pub use placeholder::Segment;
pub use selection::{SelectAllState, SelectionStore};
pub use view::QueueView;
