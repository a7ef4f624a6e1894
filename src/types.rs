//! Common types used throughout the rating engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical, feed-independent team identifier (see [`crate::identity`])
pub type TeamKey = String;

/// Neutral rating every team starts from, and returns to on reset
pub const BASE_RATING: f64 = 1500.0;

/// A rated team as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub canonical_id: TeamKey,
    /// Latest display name observed in the feed
    pub display_name: String,
    pub rating: f64,
}

impl Team {
    pub fn new(canonical_id: impl Into<TeamKey>, display_name: impl Into<String>, rating: f64) -> Self {
        Self {
            canonical_id: canonical_id.into(),
            display_name: display_name.into(),
            rating,
        }
    }
}

/// Ledger entry recording that a calendar day's results were applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDay {
    pub day: NaiveDate,
    /// Unix timestamp (seconds) of the last time the day was applied
    pub processed_at: i64,
}

/// A score exactly as a feed delivered it.
///
/// Feeds mix numbers and strings (`72`, `"72"`, `""`, `"—"`), so the engine
/// coerces scores itself instead of trusting the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for RawScore {
    fn from(value: i64) -> Self {
        RawScore::Int(value)
    }
}

impl From<i32> for RawScore {
    fn from(value: i32) -> Self {
        RawScore::Int(i64::from(value))
    }
}

impl From<&str> for RawScore {
    fn from(value: &str) -> Self {
        RawScore::Text(value.to_string())
    }
}

/// One game in the shape every feed provider must produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedGame {
    pub home_team_key: TeamKey,
    pub home_display_name: String,
    pub away_team_key: TeamKey,
    pub away_display_name: String,
    #[serde(default)]
    pub is_neutral_site: bool,
    pub status: String,
    #[serde(default)]
    pub home_score: Option<RawScore>,
    #[serde(default)]
    pub away_score: Option<RawScore>,
}

impl NormalizedGame {
    /// Build a game from display names, resolving canonical keys
    pub fn from_names(home: &str, away: &str, status: &str) -> Self {
        Self {
            home_team_key: crate::identity::canonicalize(home),
            home_display_name: home.to_string(),
            away_team_key: crate::identity::canonicalize(away),
            away_display_name: away.to_string(),
            is_neutral_site: false,
            status: status.to_string(),
            home_score: None,
            away_score: None,
        }
    }

    pub fn with_scores(mut self, home: impl Into<RawScore>, away: impl Into<RawScore>) -> Self {
        self.home_score = Some(home.into());
        self.away_score = Some(away.into());
        self
    }

    pub fn at_neutral_site(mut self) -> Self {
        self.is_neutral_site = true;
        self
    }
}
