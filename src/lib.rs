//! Courtside Elo - college basketball team ratings
//!
//! This crate maintains an Elo rating per team from daily game results,
//! rebuilds ratings deterministically from historical feed data, and derives
//! picks for upcoming games.

pub mod config;
pub mod error;
pub mod feed;
pub mod identity;
pub mod metrics;
pub mod prediction;
pub mod rating;
pub mod replay;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use feed::{DirectoryFeed, GameFeed, StaticFeed};
pub use identity::canonicalize;
pub use rating::{EloConfig, RatingEngine};
pub use replay::{DayOutcome, RebuildResult, ReplayOrchestrator};
pub use store::{InMemoryStore, JsonFileStore, Store, UnitOfWork};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
