//! Reconciliation run: raw table in, reconciled outputs and summary out
//!
//! **Algorithm:**
//! 1. Expand the raw table into the normalized view
//! 2. Build the final output with the normalized view as both the main and
//!    the fallback table
//! 3. Attach the (currently empty) non-standard table
//! 4. Count what happened for the run summary
//!
//! A baseline table, when given, is harmonized onto the final layout and
//! counted only.

use rma_common::columns::FINAL_COLUMNS;
use rma_common::config::KpiConfig;
use rma_common::Table;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::engine::output::non_standard_placeholder;
use crate::engine::schema::harmonize_columns;
use crate::engine::{build_final_output, build_normalized_view, FinalOutput, NormalizedView};

/// Counts and timing of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub records_read: usize,
    /// Records skipped because no tracking number could be derived
    pub records_dropped: usize,
    pub normalized_rows: usize,
    pub blocked_identifiers: usize,
    pub final_rows: usize,
    pub distinct_identifiers: usize,
    pub baseline_rows: Option<usize>,
    #[serde(rename = "runtime_seconds", serialize_with = "serialize_seconds")]
    pub runtime: Duration,
}

fn serialize_seconds<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl RunSummary {
    /// Estimated minutes saved against manual reconciliation
    ///
    /// `manual_minutes_per_rma × distinct identifiers + weekly overhead − runtime`
    pub fn minutes_saved(&self, kpi: &KpiConfig) -> f64 {
        kpi.manual_minutes_per_rma * self.distinct_identifiers as f64 + kpi.weekly_overhead_minutes
            - self.runtime.as_secs_f64() / 60.0
    }
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub normalized: NormalizedView,
    pub output: FinalOutput,
    pub non_standard: Table,
    pub summary: RunSummary,
}

/// Reconcile a raw carrier table
pub fn run(source: &Table, baseline: Option<&Table>) -> Reconciliation {
    let started = Instant::now();

    let normalized = build_normalized_view(source);
    let output = build_final_output(&normalized.rows, &normalized.rows);

    let baseline_rows = baseline.map(|table| {
        let baseline = harmonize_columns(table.clone()).project(&FINAL_COLUMNS);
        debug!(rows = baseline.len(), "Baseline loaded, not reconciled");
        baseline.len()
    });

    let distinct: BTreeSet<&str> = output.rows.iter().map(|r| r.rma_number.as_str()).collect();
    let summary = RunSummary {
        records_read: source.len(),
        records_dropped: normalized.dropped_records,
        normalized_rows: normalized.rows.len(),
        blocked_identifiers: output.blocked.len(),
        final_rows: output.rows.len(),
        distinct_identifiers: distinct.len(),
        baseline_rows,
        runtime: started.elapsed(),
    };

    info!(
        records = summary.records_read,
        dropped = summary.records_dropped,
        normalized = summary.normalized_rows,
        blocked = summary.blocked_identifiers,
        final_rows = summary.final_rows,
        "Reconciliation complete"
    );

    Reconciliation {
        normalized,
        output,
        non_standard: non_standard_placeholder(),
        summary,
    }
}
