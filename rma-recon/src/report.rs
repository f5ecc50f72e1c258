//! Report writing
//!
//! The reconciliation is delivered as two outputs, "RMA Analysis" and
//! "Non-Standard RMAs", each written as a delimited file with the final
//! column layout. The header is always written, even for an empty output.

use rma_common::columns::{FINAL_COLUMNS, SHEET_NON_STANDARD, SHEET_RMA_ANALYSIS};
use rma_common::config::OutputConfig;
use rma_common::{Result, Table};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::FinalRow;

/// Where the two outputs were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub analysis: PathBuf,
    pub non_standard: PathBuf,
}

/// Write final rows with the [`FINAL_COLUMNS`] header
pub fn write_rows<W: Write>(rows: &[FinalRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(FINAL_COLUMNS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write any table, header first
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write both outputs into `directory`, overwriting existing files
///
/// The caller is responsible for archiving previous reports.
pub fn write_reconciliation(
    rows: &[FinalRow],
    non_standard: &Table,
    directory: &Path,
    output: &OutputConfig,
) -> Result<ReportPaths> {
    fs::create_dir_all(directory)?;

    let paths = ReportPaths {
        analysis: directory.join(&output.analysis_file),
        non_standard: directory.join(&output.non_standard_file),
    };

    write_rows(rows, File::create(&paths.analysis)?)?;
    write_table(non_standard, File::create(&paths.non_standard)?)?;

    info!(sheet = SHEET_RMA_ANALYSIS, path = %paths.analysis.display(), rows = rows.len(), "Report written");
    info!(
        sheet = SHEET_NON_STANDARD,
        path = %paths.non_standard.display(),
        rows = non_standard.len(),
        "Report written"
    );
    Ok(paths)
}
