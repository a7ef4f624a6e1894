//! Predictions for upcoming games
//!
//! Picks are derived from current ratings without writing to the store, and
//! can be compared against sportsbook moneylines.

pub mod odds;
pub mod picks;

pub use odds::{
    american_to_implied_probability, attach_market, best_price_map, MarketEdge, MarketLine,
    MatchupKey, OddsEvent,
};
pub use picks::{
    is_upcoming, pick_winner, predict_games, win_probability, Confidence, Pick, Side,
    DEFAULT_PICK_LIMIT,
};
