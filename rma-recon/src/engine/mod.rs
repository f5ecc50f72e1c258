//! Normalization and reconciliation engine
//!
//! Pure, single-pass transforms. Each stage takes its inputs by reference and
//! returns new rows; nothing here performs I/O.
//!
//! raw table → [`schema`] → [`expander`] → normalized view → [`fallback`] → [`output`]

pub mod details;
pub mod expander;
pub mod fallback;
pub mod normalize;
pub mod output;
pub mod ranking;
pub mod schema;
pub mod tokens;

pub use expander::{build_normalized_view, NormalizedRow, NormalizedView};
pub use fallback::patch_missing_identifiers;
pub use output::{build_final_output, FinalOutput, FinalRow};
