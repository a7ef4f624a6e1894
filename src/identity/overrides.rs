//! Curated exceptions for school names the generic slug rules get wrong.
//!
//! Keys are names after cleanup (lowercase, ASCII, single spaces); values are
//! the canonical key to use instead.

const OVERRIDES: &[(&str, &str)] = &[
    ("st johns", "st-johns-ny"),
    ("miami", "miami-fl"),
    ("usc", "southern-california"),
    ("ucla", "ucla"),
    ("pitt", "pittsburgh"),
    ("lsu", "louisiana-state"),
    ("unc", "north-carolina"),
];

/// Look up the override for an already-cleaned name
pub fn override_for(cleaned: &str) -> Option<&'static str> {
    OVERRIDES
        .iter()
        .find(|(name, _)| *name == cleaned)
        .map(|(_, key)| *key)
}
