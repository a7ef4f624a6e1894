//! Scoreboard JSON normalization
//!
//! The public NCAA scoreboard proxy wraps each game as `{"game": {...}}`,
//! but older snapshots list the game objects directly. Team names live under
//! `names.short`, `names.seo` or a bare `name`, and the status under either
//! `gameState` or `status`.

use crate::identity::canonicalize;
use crate::types::{NormalizedGame, RawScore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display name used when a feed team carries no usable name
pub const UNKNOWN_TEAM: &str = "Unknown";

/// Top-level scoreboard document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreboardPayload {
    #[serde(default)]
    pub games: Vec<GameEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameEntry {
    Wrapped { game: ScoreboardGame },
    Bare(ScoreboardGame),
}

impl GameEntry {
    fn game(&self) -> &ScoreboardGame {
        match self {
            GameEntry::Wrapped { game } => game,
            GameEntry::Bare(game) => game,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreboardGame {
    #[serde(default)]
    pub home: Option<ScoreboardTeam>,
    #[serde(default)]
    pub away: Option<ScoreboardTeam>,
    #[serde(rename = "gameState", default)]
    pub game_state: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "neutralSite", default)]
    pub neutral_site: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreboardTeam {
    #[serde(default)]
    pub names: Option<TeamNames>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<RawScore>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamNames {
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub seo: Option<String>,
}

impl ScoreboardTeam {
    /// First non-blank of `names.short`, `names.seo`, `name`
    fn best_name(&self) -> Option<&str> {
        let names = self.names.as_ref();
        [
            names.and_then(|n| n.short.as_deref()),
            names.and_then(|n| n.seo.as_deref()),
            self.name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
    }
}

/// Truthiness of a loosely typed JSON flag
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::Null) | None => false,
    }
}

fn first_non_blank<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

/// Turn a scoreboard document into normalized games.
///
/// Teams without any name get the display name [`UNKNOWN_TEAM`] and an empty
/// (unresolved) key, so the engine skips them rather than rating a
/// placeholder team.
pub fn normalize_scoreboard(payload: &ScoreboardPayload) -> Vec<NormalizedGame> {
    payload
        .games
        .iter()
        .map(GameEntry::game)
        .map(|game| {
            let home = game.home.clone().unwrap_or_default();
            let away = game.away.clone().unwrap_or_default();

            let (home_key, home_name) = resolve(&home);
            let (away_key, away_name) = resolve(&away);

            let status = first_non_blank(&[game.game_state.as_deref(), game.status.as_deref()])
                .unwrap_or("unknown");

            NormalizedGame {
                home_team_key: home_key,
                home_display_name: home_name,
                away_team_key: away_key,
                away_display_name: away_name,
                is_neutral_site: is_truthy(game.neutral_site.as_ref()),
                status: status.to_string(),
                home_score: home.score,
                away_score: away.score,
            }
        })
        .collect()
}

fn resolve(team: &ScoreboardTeam) -> (String, String) {
    match team.best_name() {
        Some(name) => (canonicalize(name), name.to_string()),
        None => (String::new(), UNKNOWN_TEAM.to_string()),
    }
}
