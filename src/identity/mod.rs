//! Team identity resolution
//!
//! Feeds spell the same school many ways ("Michigan St.", "Michigan State",
//! "MICHIGAN ST"). Every rating lookup goes through [`canonicalize`] so that
//! all of them land on one stable key.

mod overrides;

pub use overrides::override_for;

use crate::types::TeamKey;
use unicode_normalization::UnicodeNormalization;

/// Map a raw team name to its canonical key.
///
/// Pure and deterministic. Blank input yields an empty key, which callers
/// should treat as unresolved (see [`is_resolved`]).
pub fn canonicalize(raw_name: &str) -> TeamKey {
    let ascii = transliterate(raw_name).to_lowercase();
    let expanded = expand_abbreviations(ascii.trim());

    let stripped: String = expanded
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_ascii_whitespace() || *c == '-')
        .collect();

    let cleaned = stripped.split_ascii_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(key) = override_for(&cleaned) {
        return key.to_string();
    }

    cleaned.replace(' ', "-")
}

/// Whether a canonical key identifies a team at all
pub fn is_resolved(key: &str) -> bool {
    !key.is_empty()
}

/// Decompose (NFKD) and drop everything that is not ASCII, which strips
/// diacritics: "José" -> "Jose".
fn transliterate(raw: &str) -> String {
    raw.nfkd().filter(char::is_ascii).collect()
}

/// Expand `&`, and non-leading `st`/`mt` tokens.
///
/// A leading "St." is left alone because it reads as "Saint" (St. John's),
/// while a trailing or embedded one means "State" (Michigan St.).
fn expand_abbreviations(name: &str) -> String {
    let spaced = name.replace('&', " and ");

    spaced
        .split_ascii_whitespace()
        .enumerate()
        .map(|(idx, token)| match token {
            "st." | "st" if idx > 0 => "state",
            "mt." | "mt" if idx > 0 => "mount",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
