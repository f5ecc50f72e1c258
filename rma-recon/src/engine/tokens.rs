//! Identifier and tracking-number extraction from free text
//!
//! An identifier token is a run of exactly eight ASCII digits that is not part
//! of a longer digit run. Tracking numbers are `1Z` followed by sixteen
//! alphanumerics, matched case-insensitively on word boundaries.

use once_cell::sync::Lazy;
use regex::Regex;
use rma_common::table::Record;
use std::collections::HashSet;

/// Length of a valid identifier
pub const IDENTIFIER_LEN: usize = 8;

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit run pattern is valid"));

static TRACKING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b1Z[0-9A-Z]{16}\b").expect("tracking number pattern is valid")
});

/// True when `value` is exactly eight ASCII digits
pub fn is_valid_identifier(value: &str) -> bool {
    value.len() == IDENTIFIER_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

/// All eight-digit tokens in `text`, left to right, duplicates kept
pub fn extract_identifier_tokens(text: &str) -> Vec<String> {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|run| run.len() == IDENTIFIER_LEN)
        .map(str::to_string)
        .collect()
}

/// Drop repeated tokens, keeping the first occurrence of each
pub fn dedup_preserving_order(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Distinct tokens across every non-blank field of `record`, in column order
pub fn extract_identifier_tokens_from_record(record: &Record<'_>) -> Vec<String> {
    let pool = record
        .values()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .flat_map(extract_identifier_tokens)
        .collect();
    dedup_preserving_order(pool)
}

/// All tracking numbers in `text`, upper-cased, in order of occurrence
pub fn extract_tracking_numbers(text: &str) -> Vec<String> {
    TRACKING_NUMBER
        .find_iter(text)
        .map(|m| m.as_str().to_uppercase())
        .collect()
}

/// First tracking number in `text`, upper-cased
pub fn first_tracking_number(text: &str) -> Option<String> {
    TRACKING_NUMBER
        .find(text)
        .map(|m| m.as_str().to_uppercase())
}

/// Trimmed text of every field whose tokens include `token`
///
/// Never empty: when no field matches the result is `[""]`.
pub fn find_source_texts_containing_token(record: &Record<'_>, token: &str) -> Vec<String> {
    let hits: Vec<String> = record
        .values()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| extract_identifier_tokens(v).iter().any(|t| t == token))
        .map(str::to_string)
        .collect();

    if hits.is_empty() {
        vec![String::new()]
    } else {
        hits
    }
}
