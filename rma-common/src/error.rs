//! Common error types for the RMA reconciliation workspace

use thiserror::Error;

/// Common result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the reconciliation crates
///
/// The reconciliation engine itself never fails; these variants cover the
/// I/O and configuration boundary around it.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited file could not be read or written (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML config file exists but does not parse
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Session log record could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
