//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `RMA_RECON_CONFIG`
//! 3. Platform config directory (`<config_dir>/rma-recon/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file never stops a run: the compiled defaults are used and
//! [`ConfigSource::Missing`] tells the caller to warn about it. A config file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RMA_RECON_CONFIG";

/// Application directory name under the platform config directory
const APP_DIR: &str = "rma-recon";

/// Complete reconciliation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub alerts: AlertThresholds,
    pub kpi: KpiConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Directory holding the rotating log file and the session logs
    pub directory: PathBuf,

    /// Write the size-rotated plain-text log in `directory`
    pub file_log: bool,

    /// Write a per-run NDJSON session log in `directory`
    pub session_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: PathBuf::from("logs"),
            file_log: true,
            session_log: true,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// File name of the "RMA Analysis" report
    pub analysis_file: String,
    /// File name of the "Non-Standard RMAs" report
    pub non_standard_file: String,
    /// Append the alert suffix to details lines that need action
    pub mark_alerts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            analysis_file: "rma_analysis.csv".to_string(),
            non_standard_file: "non_standard_rmas.csv".to_string(),
            mark_alerts: true,
        }
    }
}

/// Alert aging thresholds, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub in_transit_days_threshold: i64,
    pub manifest_days_threshold: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            in_transit_days_threshold: 5,
            manifest_days_threshold: 5,
        }
    }
}

/// Manual-effort baseline used for the efficiency estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Minutes per RMA spent reconciling by hand
    pub manual_minutes_per_rma: f64,
    /// Fixed overhead minutes per weekly run
    pub weekly_overhead_minutes: f64,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            manual_minutes_per_rma: 8.0,
            weekly_overhead_minutes: 2.0,
        }
    }
}

impl ReconConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve and load the config, falling back to compiled defaults
    ///
    /// `cli_path` is the `--config` argument, if any. An explicitly named file
    /// (CLI or environment) that is missing is not an error; the returned
    /// [`ConfigSource`] says so, and the caller reports it once logging is up.
    pub fn resolve(cli_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        match resolve_config_path(cli_path) {
            Some(path) if path.exists() => {
                let config = Self::load_from(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.alerts.in_transit_days_threshold < 0 || self.alerts.manifest_days_threshold < 0 {
            return Err(Error::Config(
                "alert thresholds must not be negative".to_string(),
            ));
        }
        if self.kpi.manual_minutes_per_rma < 0.0 || self.kpi.weekly_overhead_minutes < 0.0 {
            return Err(Error::Config("KPI minutes must not be negative".to_string()));
        }
        if self.output.analysis_file.trim().is_empty()
            || self.output.non_standard_file.trim().is_empty()
        {
            return Err(Error::Config("output file names must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file
    File(PathBuf),
    /// This file was named but does not exist; compiled defaults are in use
    Missing(PathBuf),
    /// No config file was named or found
    Defaults,
}

impl ConfigSource {
    /// Report the outcome through `tracing`
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            ),
            ConfigSource::Defaults => info!("No config file found, using compiled defaults"),
        }
    }
}

/// Pick the config file path by priority; `None` when no candidate exists
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|p| p.exists())
}

/// `<config_dir>/rma-recon/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.alerts.in_transit_days_threshold, 5);
        assert_eq!(config.alerts.manifest_days_threshold, 5);
        assert_eq!(config.kpi.manual_minutes_per_rma, 8.0);
        assert!(config.output.mark_alerts);
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert!(config.logging.file_log && config.logging.session_log);
    }

    #[test]
    fn test_log_sinks_can_be_disabled() {
        let config = ReconConfig::from_toml_str(
            r#"
            [logging]
            file_log = false
            session_log = false
            "#,
        )
        .unwrap();
        assert!(!config.logging.file_log);
        assert!(!config.logging.session_log);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = ReconConfig::from_toml_str(
            r#"
            [alerts]
            manifest_days_threshold = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.alerts.manifest_days_threshold, 3);
        assert_eq!(config.alerts.in_transit_days_threshold, 5);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = ReconConfig::from_toml_str("[alerts]\nin_transit_days_threshold = -1\n")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = ReconConfig::from_toml_str("[output\n").unwrap_err();
        assert!(matches!(err, Error::TomlParse(_)));
    }
}
