//! Final output: exclusion filter and projection onto the public columns
//!
//! **Algorithm:**
//! 1. Patch missing identifiers from the secondary reference field
//! 2. Collect the blocked identifiers: rows of the normalized view whose
//!    source text contains [`BLOCKED_PHRASE`] and whose identifier is valid
//! 3. Drop the helper columns (tracking number, ship-to location, source text)
//! 4. Re-clean identifiers and keep only exact eight-digit ones
//! 5. Remove blocked identifiers, wherever else they also appear
//! 6. Project onto [`FINAL_COLUMNS`]

use rma_common::columns::FINAL_COLUMNS;
use rma_common::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::expander::NormalizedRow;
use super::fallback::patch_missing_identifiers;
use super::ranking::clean_identifier;
use super::tokens::is_valid_identifier;

/// Consolidated pick-up instructions carry order numbers that are not RMAs
pub const BLOCKED_PHRASE: &str = "CONS PICK UP";

/// One row of the public "RMA Analysis" report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRow {
    #[serde(rename = "Manifest Date")]
    pub manifest_date: String,
    #[serde(rename = "RMA Number")]
    pub rma_number: String,
    #[serde(rename = "Tracking Number - Details")]
    pub tracking_details: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Shipper Name")]
    pub shipper_name: String,
    #[serde(rename = "Ship To")]
    pub ship_to: String,
    #[serde(rename = "Scheduled Delivery")]
    pub scheduled_delivery: String,
    #[serde(rename = "Date Delivered")]
    pub date_delivered: String,
    #[serde(rename = "Exception Description")]
    pub exception_description: String,
    #[serde(rename = "Exception Resolution")]
    pub exception_resolution: String,
    #[serde(rename = "Weight")]
    pub weight: String,
}

impl FinalRow {
    /// Cell values in [`FINAL_COLUMNS`] order
    pub fn values(&self) -> [&str; 11] {
        [
            self.manifest_date.as_str(),
            self.rma_number.as_str(),
            self.tracking_details.as_str(),
            self.status.as_str(),
            self.shipper_name.as_str(),
            self.ship_to.as_str(),
            self.scheduled_delivery.as_str(),
            self.date_delivered.as_str(),
            self.exception_description.as_str(),
            self.exception_resolution.as_str(),
            self.weight.as_str(),
        ]
    }
}

impl From<NormalizedRow> for FinalRow {
    fn from(row: NormalizedRow) -> Self {
        Self {
            manifest_date: row.manifest_date,
            rma_number: row.rma_number,
            tracking_details: row.tracking_details,
            status: row.status,
            shipper_name: row.shipper_name,
            ship_to: row.ship_to,
            scheduled_delivery: row.scheduled_delivery,
            date_delivered: row.date_delivered,
            exception_description: row.exception_description,
            exception_resolution: row.exception_resolution,
            weight: row.weight,
        }
    }
}

/// Output of [`build_final_output`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalOutput {
    pub rows: Vec<FinalRow>,
    /// Identifiers excluded by the consolidated pick-up rule
    pub blocked: BTreeSet<String>,
}

impl FinalOutput {
    pub fn to_table(&self) -> Table {
        final_table(&self.rows)
    }
}

/// Identifiers whose source text was a consolidated pick-up instruction
pub fn blocked_identifiers(normalized: &[NormalizedRow]) -> BTreeSet<String> {
    normalized
        .iter()
        .filter(|row| {
            let source = row.original_rma.trim();
            !source.is_empty() && source.to_uppercase().contains(BLOCKED_PHRASE)
        })
        .map(|row| clean_identifier(&row.rma_number))
        .filter(|id| is_valid_identifier(id))
        .collect()
}

/// Build the public reconciled table from the main and normalized views
pub fn build_final_output(main: &[NormalizedRow], normalized: &[NormalizedRow]) -> FinalOutput {
    let patched = patch_missing_identifiers(main, normalized);
    let blocked = blocked_identifiers(normalized);
    let candidates = patched.len();

    let rows: Vec<FinalRow> = patched
        .into_iter()
        .map(FinalRow::from)
        .map(|mut row| {
            row.rma_number = clean_identifier(&row.rma_number);
            row
        })
        .filter(|row| is_valid_identifier(&row.rma_number))
        .filter(|row| !blocked.contains(&row.rma_number))
        .collect();

    debug!(
        candidates,
        blocked = blocked.len(),
        kept = rows.len(),
        "Final output built"
    );
    FinalOutput { rows, blocked }
}

/// Final rows as a [`Table`] with exactly [`FINAL_COLUMNS`]
pub fn final_table(rows: &[FinalRow]) -> Table {
    Table::from_fixed_rows(FINAL_COLUMNS, rows.iter().map(FinalRow::values))
}

/// Empty "Non-Standard RMAs" table with the final column layout
///
/// Non-standard identifiers are not aggregated yet; writers still emit the tab.
pub fn non_standard_placeholder() -> Table {
    Table::new(FINAL_COLUMNS)
}
