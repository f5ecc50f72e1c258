//! Row expansion: raw carrier records → normalized per-TN/per-RMA rows
//!
//! **Algorithm:**
//! 1. Harmonize column names once for the whole table
//! 2. Per record, resolve the tracking number from the Tracking Number field,
//!    falling back to the first `1Z…` in the details field; records with
//!    neither are dropped and counted
//! 3. Extract every distinct eight-digit token from the whole record and rank it
//! 4. Emit one row per ranked token, recording the first field it came from
//! 5. A record with no tokens emits one placeholder row with an empty identifier
//! 6. Re-clean the identifier column over the finished view

use rma_common::columns::{self, NORMALIZED_COLUMNS};
use rma_common::table::Record;
use rma_common::Table;
use serde::Serialize;
use tracing::debug;

use super::details::compose_tracking_details;
use super::normalize::to_display_string;
use super::ranking::{clean_identifier, rank_tokens};
use super::schema::{canonicalize_status, harmonize_columns};
use super::tokens::{
    extract_identifier_tokens_from_record, find_source_texts_containing_token,
    first_tracking_number,
};

/// One shipment line paired with one candidate identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedRow {
    #[serde(rename = "Manifest Date")]
    pub manifest_date: String,
    /// Verbatim field text the identifier was found in
    #[serde(rename = "Original RMA")]
    pub original_rma: String,
    /// Eight-digit identifier, "" when none was found
    #[serde(rename = "RMA Number")]
    pub rma_number: String,
    /// Upper-cased carrier tracking number
    #[serde(rename = "Tracking Number")]
    pub tracking_number: String,
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
    #[serde(rename = "Ship To Location")]
    pub ship_to_location: String,
    #[serde(rename = "Weight")]
    pub weight: String,
    /// Secondary reference field, used by the fallback patcher
    #[serde(rename = "Package Reference No. 2")]
    pub package_reference_2: String,
}

impl NormalizedRow {
    /// Cell values in [`NORMALIZED_COLUMNS`] order
    pub fn values(&self) -> [&str; 15] {
        [
            self.manifest_date.as_str(),
            self.original_rma.as_str(),
            self.rma_number.as_str(),
            self.tracking_number.as_str(),
            self.tracking_details.as_str(),
            self.status.as_str(),
            self.shipper_name.as_str(),
            self.ship_to.as_str(),
            self.scheduled_delivery.as_str(),
            self.date_delivered.as_str(),
            self.exception_description.as_str(),
            self.exception_resolution.as_str(),
            self.ship_to_location.as_str(),
            self.weight.as_str(),
            self.package_reference_2.as_str(),
        ]
    }

    /// Shipment attributes of `record`, identifier fields left empty
    fn shipment_template(record: &Record<'_>, tracking_number: &str) -> Self {
        let display = |column: &str| to_display_string(record.get(column), false);

        let mut row = Self {
            manifest_date: display(columns::MANIFEST_DATE),
            original_rma: String::new(),
            rma_number: String::new(),
            tracking_number: tracking_number.to_uppercase(),
            tracking_details: String::new(),
            status: canonicalize_status(record.get_or_empty(columns::STATUS)),
            shipper_name: display(columns::SHIPPER_NAME),
            ship_to: display(columns::SHIP_TO),
            scheduled_delivery: display(columns::SCHEDULED_DELIVERY),
            date_delivered: display(columns::DATE_DELIVERED),
            exception_description: display(columns::EXCEPTION_DESCRIPTION),
            exception_resolution: display(columns::EXCEPTION_RESOLUTION),
            ship_to_location: display(columns::SHIP_TO_LOCATION),
            weight: display(columns::WEIGHT),
            package_reference_2: display(columns::PACKAGE_REFERENCE_2),
        };
        row.tracking_details = compose_tracking_details(&row);
        row
    }
}

/// Output of [`build_normalized_view`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedView {
    /// Rows in record-then-token order
    pub rows: Vec<NormalizedRow>,
    /// Records skipped because no tracking number could be derived
    pub dropped_records: usize,
}

impl NormalizedView {
    /// The view as a [`Table`] with [`NORMALIZED_COLUMNS`]
    pub fn to_table(&self) -> Table {
        Table::from_fixed_rows(NORMALIZED_COLUMNS, self.rows.iter().map(NormalizedRow::values))
    }
}

/// Tracking number of a record: the field itself, else the first one in the details text
fn resolve_tracking_number(record: &Record<'_>) -> Option<String> {
    let direct = record.get_or_empty(columns::TRACKING_NUMBER).trim();
    if !direct.is_empty() {
        return Some(direct.to_string());
    }
    first_tracking_number(record.get_or_empty(columns::TRACKING_DETAILS))
}

/// Expand a raw carrier table into the normalized per-TN/per-RMA view
///
/// The caller's table is not modified.
pub fn build_normalized_view(raw: &Table) -> NormalizedView {
    let harmonized = harmonize_columns(raw.clone());
    let mut view = NormalizedView::default();

    for (index, record) in harmonized.records().enumerate() {
        let Some(tracking_number) = resolve_tracking_number(&record) else {
            debug!(record = index, "Dropping record without a tracking number");
            view.dropped_records += 1;
            continue;
        };

        let template = NormalizedRow::shipment_template(&record, &tracking_number);
        let tokens = rank_tokens(&extract_identifier_tokens_from_record(&record));

        debug!(
            record = index,
            tracking_number = %template.tracking_number,
            tokens = tokens.len(),
            "Expanding record"
        );

        if tokens.is_empty() {
            view.rows.push(NormalizedRow {
                original_rma: record.get_or_empty(columns::RMA_NUMBER).trim().to_string(),
                ..template
            });
            continue;
        }

        for token in tokens {
            let original_rma = find_source_texts_containing_token(&record, &token)
                .into_iter()
                .next()
                .unwrap_or_default();
            view.rows.push(NormalizedRow {
                original_rma,
                rma_number: token,
                ..template.clone()
            });
        }
    }

    for row in &mut view.rows {
        row.rma_number = clean_identifier(&row.rma_number);
    }

    debug!(
        rows = view.rows.len(),
        dropped = view.dropped_records,
        "Normalized view built"
    );
    view
}
