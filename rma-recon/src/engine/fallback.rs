//! Fallback recovery of missing identifiers from the secondary reference field
//!
//! Rows whose identifier is empty, the sentinel, or malformed are looked up by
//! the first tracking number in their details line. The lookup maps each
//! tracking number of the normalized view to the best valid token found in
//! that row's "Package Reference No. 2" value.

use std::collections::HashMap;
use tracing::debug;

use super::expander::NormalizedRow;
use super::normalize::NA;
use super::ranking::pick_best_valid_token;
use super::tokens::{extract_identifier_tokens, first_tracking_number, is_valid_identifier};

/// Tracking number → best secondary-reference identifier ("" when none)
///
/// A tracking number seen more than once keeps the value of its last row.
pub fn build_fallback_map(normalized: &[NormalizedRow]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for row in normalized {
        let tracking_number = row.tracking_number.trim().to_uppercase();
        if tracking_number.is_empty() {
            continue;
        }
        let candidates = extract_identifier_tokens(row.package_reference_2.trim());
        map.insert(tracking_number, pick_best_valid_token(&candidates));
    }
    map
}

fn has_usable_identifier(value: &str) -> bool {
    !value.is_empty() && !value.eq_ignore_ascii_case(NA) && is_valid_identifier(value)
}

/// Replace missing/invalid identifiers in `main` using `normalized`'s secondary references
///
/// Returns a new table; rows that cannot be recovered get the sentinel. When
/// either input is empty `main` comes back unchanged.
pub fn patch_missing_identifiers(
    main: &[NormalizedRow],
    normalized: &[NormalizedRow],
) -> Vec<NormalizedRow> {
    if main.is_empty() || normalized.is_empty() {
        return main.to_vec();
    }

    let fallback = build_fallback_map(normalized);
    let mut patched = 0usize;

    let rows = main
        .iter()
        .map(|row| {
            let current = row.rma_number.trim();
            if has_usable_identifier(current) {
                return NormalizedRow {
                    rma_number: current.to_string(),
                    ..row.clone()
                };
            }

            let recovered = first_tracking_number(&row.tracking_details)
                .and_then(|tn| fallback.get(&tn))
                .filter(|candidate| is_valid_identifier(candidate))
                .cloned();

            if recovered.is_some() {
                patched += 1;
            }
            NormalizedRow {
                rma_number: recovered.unwrap_or_else(|| NA.to_string()),
                ..row.clone()
            }
        })
        .collect();

    debug!(patched, "Applied secondary reference fallback");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(tn: &str, rma: &str, pr2: &str) -> NormalizedRow {
        NormalizedRow {
            tracking_number: tn.to_string(),
            tracking_details: format!("{} - In Transit, 2024-01-15 → CUSTOMER", tn),
            rma_number: rma.to_string(),
            package_reference_2: pr2.to_string(),
            ..NormalizedRow::default()
        }
    }

    #[test]
    fn test_valid_identifiers_are_kept() {
        let main = vec![row("1Z0000000000000001", "70000001", "PR2 60000009")];
        let patched = patch_missing_identifiers(&main, &main);
        assert_eq!(patched[0].rma_number, "70000001");
    }

    #[test]
    fn test_missing_identifier_recovered_from_secondary_reference() {
        let main = vec![row("1Z0000000000000001", "N/A", "PR2: 60011223 misc")];
        let patched = patch_missing_identifiers(&main, &main);
        assert_eq!(patched[0].rma_number, "60011223");
    }

    #[test]
    fn test_unrecoverable_identifier_becomes_sentinel() {
        let main = vec![
            row("1Z0000000000000001", "", "N/A"),
            row("1Z0000000000000002", "1234", "nothing useful"),
        ];
        let patched = patch_missing_identifiers(&main, &main);
        assert_eq!(patched[0].rma_number, NA);
        assert_eq!(patched[1].rma_number, NA);
    }

    #[test]
    fn test_row_without_details_tracking_number_becomes_sentinel() {
        let mut lost = row("1Z0000000000000001", "", "60011223");
        lost.tracking_details = "N/A".to_string();
        let patched = patch_missing_identifiers(&[lost.clone()], &[lost]);
        assert_eq!(patched[0].rma_number, NA);
    }

    #[test]
    fn test_fallback_map_last_row_wins() {
        let normalized = vec![
            row("1z0000000000000001", "", "60000001"),
            row("1Z0000000000000001", "", "60000002"),
        ];
        let map = build_fallback_map(&normalized);
        assert_eq!(map.len(), 1);
        assert_eq!(map["1Z0000000000000001"], "60000002");

        let main = vec![row("1Z0000000000000001", "", "")];
        let patched = patch_missing_identifiers(&main, &normalized);
        assert_eq!(patched[0].rma_number, "60000002");
    }

    #[test]
    fn test_fallback_map_prefers_six_prefix() {
        let map = build_fallback_map(&[row("1Z0000000000000001", "", "90000001 / 60000002")]);
        assert_eq!(map["1Z0000000000000001"], "60000002");
    }

    #[test]
    fn test_empty_inputs_are_noop() {
        let main = vec![row("1Z0000000000000001", "N/A", "60011223")];
        assert_eq!(patch_missing_identifiers(&main, &[]), main);
        assert!(patch_missing_identifiers(&[], &main).is_empty());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let main = vec![row("1Z0000000000000001", "N/A", "60011223")];
        let before = main.clone();
        let _ = patch_missing_identifiers(&main, &main);
        assert_eq!(main, before);
    }
}
