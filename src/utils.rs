//! Utility functions for the rating engine

use crate::error::{RatingError, Result};
use chrono::{NaiveDate, Utc};

/// Get the current time as unix seconds
pub fn current_unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Parse an ISO `YYYY-MM-DD` day
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        RatingError::ConfigurationError {
            message: format!("Invalid date '{}': {}", raw, e),
        }
        .into()
    })
}

/// Every calendar day from `start` to `end` inclusive, ascending.
/// Empty when `end < start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
