//! Sportsbook moneylines from The Odds API v4, for cross-checking picks
//!
//! The `/v4/sports/basketball_ncaab/odds` response is an array of events,
//! each with bookmakers quoting markets. Only the `h2h` (moneyline) market is
//! used. Prices are American odds.
//!
//! Sportsbooks name teams with their mascot ("Duke Blue Devils") while the
//! scoreboard uses the school alone ("Duke"). A pick is matched to a line
//! when each team key equals the line's key or is its leading hyphen-separated
//! prefix. A pick matching more than one line gets no market.

use super::picks::{Pick, Side};
use crate::identity::{canonicalize, is_resolved};
use crate::types::TeamKey;
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Market key of the moneyline market
pub const H2H_MARKET: &str = "h2h";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OddsEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub commence_time: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

impl Bookmaker {
    fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.key.as_deref())
            .unwrap_or("book")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Market {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<MarketOutcome>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketOutcome {
    #[serde(default)]
    pub name: String,
    /// Loosely typed; some books quote prices as strings
    #[serde(default)]
    pub price: Option<Value>,
}

/// Best available price for each side of one matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketLine {
    pub home_odds: i64,
    pub home_book: String,
    pub away_odds: i64,
    pub away_book: String,
    pub commence_time: Option<String>,
}

/// Market view attached to a pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEdge {
    /// Best American price on the picked side
    pub odds: i64,
    pub book: String,
    pub implied_probability: f64,
    /// Model probability minus implied probability
    pub edge: f64,
}

/// Matchup key: canonical (home, away)
pub type MatchupKey = (TeamKey, TeamKey);

/// Implied probability of American odds, vig included.
/// `-110` gives `0.5238`, `+150` gives `0.4`.
pub fn american_to_implied_probability(odds: i64) -> f64 {
    let odds = odds as f64;
    if odds < 0.0 {
        -odds / (-odds + 100.0)
    } else {
        100.0 / (odds + 100.0)
    }
}

fn parse_price(price: &Value) -> Option<i64> {
    match price {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().trim_start_matches('+').parse().ok(),
        _ => None,
    }
}

/// Best price per side across all books, keyed by canonical matchup.
///
/// A higher American number is better for the bettor. Events missing a team
/// name or a price for either side are left out.
pub fn best_price_map(events: &[OddsEvent]) -> HashMap<MatchupKey, MarketLine> {
    let mut lines = HashMap::new();

    for event in events {
        let home = event.home_team.as_deref().map(str::trim).unwrap_or_default();
        let away = event.away_team.as_deref().map(str::trim).unwrap_or_default();
        if home.is_empty() || away.is_empty() {
            continue;
        }

        let mut best_home: Option<(i64, &str)> = None;
        let mut best_away: Option<(i64, &str)> = None;

        let quotes = event.bookmakers.iter().flat_map(|book| {
            book.markets
                .iter()
                .filter(|m| m.key == H2H_MARKET)
                .flat_map(move |m| m.outcomes.iter().map(move |o| (book.label(), o)))
        });

        for (book, outcome) in quotes {
            let Some(price) = outcome.price.as_ref().and_then(parse_price) else {
                continue;
            };
            let name = outcome.name.trim();
            let slot = if name.eq_ignore_ascii_case(home) {
                &mut best_home
            } else if name.eq_ignore_ascii_case(away) {
                &mut best_away
            } else {
                continue;
            };
            if slot.map_or(true, |(best, _)| price > best) {
                *slot = Some((price, book));
            }
        }

        let (Some((home_odds, home_book)), Some((away_odds, away_book))) = (best_home, best_away)
        else {
            continue;
        };

        let key = (canonicalize(home), canonicalize(away));
        if !is_resolved(&key.0) || !is_resolved(&key.1) {
            continue;
        }

        lines.insert(
            key,
            MarketLine {
                home_odds,
                home_book: home_book.to_string(),
                away_odds,
                away_book: away_book.to_string(),
                commence_time: event.commence_time.clone(),
            },
        );
    }

    lines
}

/// School key `short` names the same team as sportsbook key `full`
fn team_key_matches(short: &str, full: &str) -> bool {
    full == short
        || full
            .strip_prefix(short)
            .map_or(false, |mascot| mascot.starts_with('-'))
}

/// The single line whose teams match the pick, by exact key or school prefix
fn find_line<'a>(
    pick: &Pick,
    lines: &'a HashMap<MatchupKey, MarketLine>,
) -> Option<&'a MarketLine> {
    let exact = (pick.home_team_key.clone(), pick.away_team_key.clone());
    if let Some(line) = lines.get(&exact) {
        return Some(line);
    }

    let mut candidates = lines.iter().filter(|((home, away), _)| {
        team_key_matches(&pick.home_team_key, home) && team_key_matches(&pick.away_team_key, away)
    });
    match (candidates.next(), candidates.next()) {
        (Some((_, line)), None) => Some(line),
        _ => None,
    }
}

/// Attach the market price of each pick's chosen side, where one exists
pub fn attach_market(picks: &mut [Pick], lines: &HashMap<MatchupKey, MarketLine>) {
    for pick in picks.iter_mut() {
        let Some(line) = find_line(pick, lines) else {
            continue;
        };

        let (odds, book) = match pick.side {
            Side::Home => (line.home_odds, &line.home_book),
            Side::Away => (line.away_odds, &line.away_book),
        };
        let implied = american_to_implied_probability(odds);

        pick.market = Some(MarketEdge {
            odds,
            book: book.clone(),
            implied_probability: round_to(implied, 4),
            edge: round_to(pick.win_prob - implied, 4),
        });
    }
}
