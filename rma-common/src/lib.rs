//! # RMA Common Library
//!
//! Shared code for the RMA reconciliation workspace:
//! - Error type and result alias
//! - TOML configuration and config file resolution
//! - Canonical column vocabulary (input schema, normalized view, final report)
//! - In-memory string table used between pipeline stages

pub mod columns;
pub mod config;
pub mod error;
pub mod table;

pub use config::ReconConfig;
pub use error::{Error, Result};
pub use table::Table;
