//! Candidate ranking
//!
//! `6`-prefixed identifiers are the canonical RMA range, `7` is a secondary
//! known-valid range, anything else ranks last. Within a class, first-seen
//! order wins; the ranking never compares tokens lexically.

use super::tokens::{dedup_preserving_order, extract_identifier_tokens, is_valid_identifier};

/// Preference tier of a candidate token, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityClass {
    StartsWithSix,
    StartsWithSeven,
    Other,
}

impl PriorityClass {
    pub fn of(token: &str) -> Self {
        match token.as_bytes().first() {
            Some(b'6') => Self::StartsWithSix,
            Some(b'7') => Self::StartsWithSeven,
            _ => Self::Other,
        }
    }
}

/// Stable partition into 6s, then 7s, then the rest
///
/// Output length always equals input length; duplicates are kept.
pub fn rank_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut ranked: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
    // sort_by_key is stable, so first-seen order survives within a class
    ranked.sort_by_key(|t| PriorityClass::of(t));
    ranked
}

/// Best valid candidate: first `6`-prefixed one, else the first valid one
///
/// Returns "" when no candidate is exactly eight digits.
pub fn pick_best_valid_token<S: AsRef<str>>(candidates: &[S]) -> String {
    let valid: Vec<&str> = candidates
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| is_valid_identifier(c))
        .collect();

    valid
        .iter()
        .find(|c| PriorityClass::of(c) == PriorityClass::StartsWithSix)
        .or_else(|| valid.first())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

/// Re-derive a clean identifier from whatever text is in an identifier cell
///
/// Strips a trailing `.0` left by spreadsheet float conversion, then takes the
/// best-ranked distinct token. Already-clean identifiers come back unchanged.
pub fn clean_identifier(value: &str) -> String {
    let text = value.trim();
    let text = text.strip_suffix(".0").unwrap_or(text);
    let tokens = dedup_preserving_order(extract_identifier_tokens(text));
    rank_tokens(&tokens).into_iter().next().unwrap_or_default()
}
