//! Review workflow for redline
//!
//! Provides:
//! - The `ReviewBackend` trait (system of record for chunk status)
//! - `ReviewController`: single-flight approve/reject orchestration
//! - `ReviewSession`: snapshot ownership and refresh-after-mutation

pub mod backend;
pub mod controller;
pub mod session;

pub use backend::{Ack, Operation, ReviewBackend};
pub use controller::{Mutation, Outcome, Phase, ReviewController};
pub use session::ReviewSession;
