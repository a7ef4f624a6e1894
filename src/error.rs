//! Error types for the rating engine
//!
//! Fallible operations return the anyhow-based [`Result`] alias; the typed
//! [`RatingError`] variants are raised with `.into()` and can be recovered by
//! callers with `downcast_ref::<RatingError>()`.

use chrono::NaiveDate;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for rating and replay scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    /// A completed game that cannot be rated (bad score, unresolved team).
    /// The engine skips such games instead of failing the batch.
    #[error("Unusable game record: {reason}")]
    DataQuality { reason: String },

    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Feed could not provide games for {day}: {message}")]
    UpstreamFetch { day: NaiveDate, message: String },

    #[error("Store operation failed: {message}")]
    Store { message: String },

    /// Attached as context to whatever stopped a rebuild on `day`.
    #[error("Rebuild aborted on {day}")]
    ReplayAborted { day: NaiveDate },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl RatingError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn data_quality(reason: impl Into<String>) -> Self {
        Self::DataQuality {
            reason: reason.into(),
        }
    }
}
