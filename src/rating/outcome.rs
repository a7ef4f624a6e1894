//! Deciding whether a feed game can be rated

use crate::error::RatingError;
use crate::identity::is_resolved;
use crate::types::{NormalizedGame, RawScore};

/// Statuses that mean the game is over, beyond anything containing "final"
const COMPLETED_SYNONYMS: &[&str] = &["closed", "complete", "completed"];

/// Score text that feeds use for "no score yet"
const MISSING_SCORE_MARKERS: &[&str] = &["", "-", "–", "—", "n/a", "na", "none", "null"];

/// Final scores of a game that is eligible for rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub home: i64,
    pub away: i64,
}

/// Whether a status string denotes a completed game (case-insensitive)
pub fn is_completed_status(status: &str) -> bool {
    let status = status.trim().to_lowercase();
    status.contains("final") || COMPLETED_SYNONYMS.contains(&status.as_str())
}

/// Tolerantly turn a feed score into points. `None` means missing or junk.
pub fn coerce_score(raw: Option<&RawScore>) -> Option<i64> {
    let points = match raw? {
        RawScore::Int(value) => *value,
        RawScore::Float(value) => {
            if !value.is_finite() || value.fract() != 0.0 {
                return None;
            }
            *value as i64
        }
        RawScore::Text(text) => {
            let text = text.trim();
            if MISSING_SCORE_MARKERS.contains(&text.to_lowercase().as_str()) {
                return None;
            }
            text.parse::<i64>().ok()?
        }
    };

    (points >= 0).then_some(points)
}

/// Classify a game for rating.
///
/// - `Ok(None)`: not completed, skip quietly
/// - `Err(DataQuality)`: completed but unusable, skip with a warning
/// - `Ok(Some(score))`: rate it
pub fn final_score(game: &NormalizedGame) -> Result<Option<FinalScore>, RatingError> {
    if !is_completed_status(&game.status) {
        return Ok(None);
    }

    if !is_resolved(&game.home_team_key) || !is_resolved(&game.away_team_key) {
        return Err(RatingError::data_quality(format!(
            "unresolved team in '{}' vs '{}'",
            game.home_display_name, game.away_display_name
        )));
    }

    if game.home_team_key == game.away_team_key {
        return Err(RatingError::data_quality(format!(
            "'{}' listed on both sides",
            game.home_team_key
        )));
    }

    let home = coerce_score(game.home_score.as_ref());
    let away = coerce_score(game.away_score.as_ref());

    match (home, away) {
        (Some(home), Some(away)) => Ok(Some(FinalScore { home, away })),
        _ => Err(RatingError::data_quality(format!(
            "unparseable score {:?}-{:?} in {} vs {}",
            game.home_score, game.away_score, game.home_team_key, game.away_team_key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_statuses() {
        assert!(is_completed_status("Final"));
        assert!(is_completed_status("FINAL/OT"));
        assert!(is_completed_status(" final "));
        assert!(is_completed_status("closed"));
        assert!(is_completed_status("Complete"));
        assert!(is_completed_status("completed"));

        assert!(!is_completed_status("Scheduled"));
        assert!(!is_completed_status("pre"));
        assert!(!is_completed_status("live"));
        assert!(!is_completed_status("closed-captioned broadcast"));
        assert!(!is_completed_status(""));
    }

    #[test]
    fn test_score_coercion() {
        assert_eq!(coerce_score(Some(&RawScore::Int(72))), Some(72));
        assert_eq!(coerce_score(Some(&RawScore::Float(72.0))), Some(72));
        assert_eq!(coerce_score(Some(&RawScore::Text(" 81 ".into()))), Some(81));

        assert_eq!(coerce_score(None), None);
        assert_eq!(coerce_score(Some(&RawScore::Float(72.5))), None);
        assert_eq!(coerce_score(Some(&RawScore::Float(f64::NAN))), None);
        assert_eq!(coerce_score(Some(&RawScore::Int(-3))), None);
        for marker in ["", "  ", "-", "–", "—", "N/A", "none", "None", "null", "abc"] {
            assert_eq!(coerce_score(Some(&RawScore::Text(marker.into()))), None, "{marker}");
        }
    }

    #[test]
    fn test_scheduled_game_is_not_final_even_with_scores() {
        let game = NormalizedGame::from_names("Duke", "Kansas", "Scheduled").with_scores(70, 60);
        assert_eq!(final_score(&game).unwrap(), None);
    }

    #[test]
    fn test_em_dash_score_is_data_quality() {
        let game = NormalizedGame::from_names("Duke", "Kansas", "Final").with_scores("—", 60);
        assert!(matches!(
            final_score(&game),
            Err(RatingError::DataQuality { .. })
        ));
    }

    #[test]
    fn test_missing_team_is_data_quality() {
        let game = NormalizedGame::from_names("", "Kansas", "Final").with_scores(70, 60);
        assert!(matches!(
            final_score(&game),
            Err(RatingError::DataQuality { .. })
        ));

        let game = NormalizedGame::from_names("Duke", "Duke", "Final").with_scores(70, 60);
        assert!(final_score(&game).is_err());
    }

    #[test]
    fn test_final_game_with_text_scores() {
        let game = NormalizedGame::from_names("Duke", "Kansas", "final").with_scores("70", "68");
        assert_eq!(
            final_score(&game).unwrap(),
            Some(FinalScore { home: 70, away: 68 })
        );
    }
}
