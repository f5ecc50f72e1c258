//! rma-recon library interface
//!
//! Reconciles UPS shipment exports against RMA identifiers. The `engine`
//! module holds the pure transforms; the other modules handle file I/O,
//! alerting and run bookkeeping for the `rma-recon` binary.

pub mod alerts;
pub mod audit_log;
pub mod engine;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod session_log;

pub use engine::{build_final_output, build_normalized_view, FinalRow, NormalizedRow};
pub use pipeline::{run, Reconciliation, RunSummary};

/// Version string with build identification
pub fn version_string() -> String {
    format!(
        "{} ({}, {} build {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    )
}
