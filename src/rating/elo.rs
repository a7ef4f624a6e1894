//! Elo rating math with a margin-of-victory multiplier
//!
//! Expected scores come from the skillratings crate; the update itself is a
//! symmetric zero-sum step scaled by how lopsided the result was.

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use skillratings::elo::EloRating;

/// Parameters for the Elo update and for predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    /// Rating for unseen teams and after a reset
    pub base_rating: f64,
    /// Maximum rating swing for an unscaled result
    pub k_factor: f64,
    /// Margin (points) at which the multiplier stops growing
    pub margin_cap: f64,
    /// Extra weight at or beyond `margin_cap` (0.25 = +25%)
    pub margin_bonus: f64,
    /// Rating points added to the home side when predicting.
    /// The update engine never applies it.
    pub home_advantage: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            base_rating: 1500.0,
            k_factor: 20.0,
            margin_cap: 25.0,
            margin_bonus: 0.25,
            home_advantage: 50.0,
        }
    }
}

impl EloConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.base_rating.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Base rating must be finite".to_string(),
            }
            .into());
        }

        if !(self.k_factor > 0.0 && self.k_factor.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }

        if !(self.margin_cap > 0.0 && self.margin_cap.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "Margin cap must be positive".to_string(),
            }
            .into());
        }

        if !(self.margin_bonus >= 0.0 && self.margin_bonus.is_finite()) {
            return Err(RatingError::ConfigurationError {
                message: "Margin bonus must be non-negative".to_string(),
            }
            .into());
        }

        if !self.home_advantage.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Home advantage must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Breakdown of one game's rating update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRating {
    /// Probability the home side was expected to win
    pub expected_home: f64,
    /// 1.0 for a home win, 0.0 otherwise
    pub actual_home: f64,
    pub multiplier: f64,
    /// Added to the home rating and subtracted from the away rating
    pub delta: f64,
}

impl GameRating {
    pub fn home_delta(&self) -> f64 {
        self.delta
    }

    pub fn away_delta(&self) -> f64 {
        -self.delta
    }
}

/// Probability that a side rated `rating` beats one rated `opponent`:
/// `1 / (1 + 10^((opponent - rating) / 400))`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    let (expected, _) = skillratings::elo::expected_score(
        &EloRating { rating },
        &EloRating { rating: opponent },
    );
    expected
}

/// Outcome from the home side's perspective.
///
/// Ties are not modelled: equal scores count as a home loss (0.0).
pub fn actual_outcome(home_score: i64, away_score: i64) -> f64 {
    if home_score > away_score {
        1.0
    } else {
        0.0
    }
}

/// Elo calculator
#[derive(Debug, Clone)]
pub struct EloCalculator {
    config: EloConfig,
}

impl EloCalculator {
    pub fn new(config: EloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EloConfig {
        &self.config
    }

    pub fn base_rating(&self) -> f64 {
        self.config.base_rating
    }

    /// `1 + min(margin, cap) / cap * bonus`
    pub fn margin_multiplier(&self, margin: u64) -> f64 {
        let capped = (margin as f64).min(self.config.margin_cap);
        1.0 + capped / self.config.margin_cap * self.config.margin_bonus
    }

    /// Rate one completed game between the given pre-game ratings
    pub fn rate_game(&self, home_rating: f64, away_rating: f64, home_score: i64, away_score: i64) -> GameRating {
        let expected_home = expected_score(home_rating, away_rating);
        let actual_home = actual_outcome(home_score, away_score);
        let multiplier = self.margin_multiplier(home_score.abs_diff(away_score));
        let delta = self.config.k_factor * multiplier * (actual_home - expected_home);

        GameRating {
            expected_home,
            actual_home,
            multiplier,
            delta,
        }
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self {
            config: EloConfig::default(),
        }
    }
}
