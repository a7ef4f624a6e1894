//! Win probabilities and daily picks from current ratings

use super::odds::MarketEdge;
use crate::error::Result;
use crate::identity::is_resolved;
use crate::rating::{expected_score, EloConfig};
use crate::store::Store;
use crate::types::{NormalizedGame, TeamKey};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Number of picks returned when the caller has no preference
pub const DEFAULT_PICK_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Home,
    Away,
}

/// Confidence band of a pick's win probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Pass,
    Lean,
    Strong,
    Lock,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.85 {
            Confidence::Lock
        } else if probability >= 0.75 {
            Confidence::Strong
        } else if probability >= 0.65 {
            Confidence::Lean
        } else {
            Confidence::Pass
        }
    }
}

/// A recommended side for one upcoming game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub home_team_key: TeamKey,
    pub home: String,
    pub away_team_key: TeamKey,
    pub away: String,
    pub side: Side,
    /// Display name of the picked team
    pub pick: String,
    pub win_prob: f64,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketEdge>,
}

/// Probability that a team rated `rating` beats one rated `opponent`
pub fn win_probability(rating: f64, opponent: f64) -> f64 {
    expected_score(rating, opponent)
}

/// Favored side and its win probability, with `home_advantage` rating points
/// added to the home team.
pub fn pick_winner(home_rating: f64, away_rating: f64, home_advantage: f64) -> (Side, f64) {
    let p_home = win_probability(home_rating + home_advantage, away_rating);
    if p_home >= 0.5 {
        (Side::Home, p_home)
    } else {
        (Side::Away, 1.0 - p_home)
    }
}

/// Pregame statuses: anything mentioning `pre` or `scheduled`
pub fn is_upcoming(status: &str) -> bool {
    let status = status.to_lowercase();
    status.contains("pre") || status.contains("scheduled")
}

/// Rank the upcoming games in `games` by model confidence.
///
/// Ratings are only read; teams the store has never seen are treated as
/// `config.base_rating`. Games below the `Lean` band are dropped and the
/// `limit` most confident picks are returned.
pub fn predict_games(
    store: &dyn Store,
    games: &[NormalizedGame],
    config: &EloConfig,
    limit: usize,
) -> Result<Vec<Pick>> {
    let mut picks = Vec::new();

    for game in games.iter().filter(|g| is_upcoming(&g.status)) {
        if !is_resolved(&game.home_team_key)
            || !is_resolved(&game.away_team_key)
            || game.home_team_key == game.away_team_key
        {
            debug!(
                home = %game.home_display_name,
                away = %game.away_display_name,
                "Skipping unpredictable game"
            );
            continue;
        }

        let home_rating = rating_or_base(store, &game.home_team_key, config.base_rating)?;
        let away_rating = rating_or_base(store, &game.away_team_key, config.base_rating)?;
        let home_advantage = if game.is_neutral_site {
            0.0
        } else {
            config.home_advantage
        };

        let (side, probability) = pick_winner(home_rating, away_rating, home_advantage);
        let confidence = Confidence::from_probability(probability);
        if confidence == Confidence::Pass {
            continue;
        }

        let pick = match side {
            Side::Home => game.home_display_name.clone(),
            Side::Away => game.away_display_name.clone(),
        };

        picks.push(Pick {
            home_team_key: game.home_team_key.clone(),
            home: game.home_display_name.clone(),
            away_team_key: game.away_team_key.clone(),
            away: game.away_display_name.clone(),
            side,
            pick,
            win_prob: round_to(probability, 4),
            confidence,
            market: None,
        });
    }

    picks.sort_by(|a, b| b.win_prob.partial_cmp(&a.win_prob).unwrap_or(Ordering::Equal));
    picks.truncate(limit);
    Ok(picks)
}

fn rating_or_base(store: &dyn Store, team_key: &str, base_rating: f64) -> Result<f64> {
    Ok(store
        .load_team(team_key)?
        .map(|team| team.rating)
        .unwrap_or(base_rating))
}
