//! Historical replay of game results
//!
//! Rebuilds ratings deterministically from a date range of feed data, and
//! runs the single-day update used by the nightly job.

pub mod cancel;
pub mod orchestrator;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use orchestrator::{DayOutcome, RebuildResult, ReplayOrchestrator};
