//! Elo rating engine
//!
//! This module provides the Elo math (backed by the skillratings crate), the
//! rules for which feed games count, and the engine that applies a day of
//! results to the store.

pub mod elo;
pub mod engine;
pub mod outcome;

// Re-export commonly used types
pub use elo::{actual_outcome, expected_score, EloCalculator, EloConfig, GameRating};
pub use engine::{DayUpdate, RatingChange, RatingEngine};
pub use outcome::{coerce_score, final_score, is_completed_status, FinalScore};
