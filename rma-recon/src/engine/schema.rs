//! Schema harmonization and status canonicalization

use rma_common::columns::{canonical_name, HEADER_VARIANTS};
use rma_common::Table;

use super::normalize::NA;

/// Rename known header variants to canonical names and add missing canonical columns
///
/// Unknown columns pass through untouched. Added columns are blank for every
/// row. Applying this twice gives the same table as applying it once.
pub fn harmonize_columns(table: Table) -> Table {
    let table = table.map_columns(|c| {
        canonical_name(c)
            .map(str::to_string)
            .unwrap_or_else(|| c.to_string())
    });

    HEADER_VARIANTS
        .iter()
        .fold(table, |t, (_, canonical)| t.ensure_column(canonical, ""))
}

/// Ordered (needles, label) rules; the first rule with a matching needle wins
const STATUS_RULES: [(&[&str], &str); 6] = [
    (&["delivered"], "Delivered"),
    (&["exception"], "Exception"),
    (&["in transit"], "In Transit"),
    (&["out for delivery", "out of delivery"], "Out for Delivery"),
    (&["manifest"], "Manifest"),
    (&["void"], "Void"),
];

/// Map free-text carrier status onto the canonical status labels
pub fn canonicalize_status(value: &str) -> String {
    let trimmed = value.trim();
    let lower = trimmed.to_lowercase();

    for (needles, label) in STATUS_RULES {
        if needles.iter().any(|n| lower.contains(n)) {
            return label.to_string();
        }
    }

    if lower.is_empty() || lower.contains("not avail") {
        return NA.to_string();
    }
    trimmed.to_string()
}
