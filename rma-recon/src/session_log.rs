//! Per-run NDJSON session log
//!
//! Each run appends JSON lines to `session_<YYYYMMDD_HHMMSS>.ndjson` in the
//! configured log directory. Every line carries the timestamp, session id,
//! level and message, plus an optional `extra` object with run details.

use chrono::Local;
use rma_common::Result;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Serialize)]
struct Entry<'a> {
    timestamp: String,
    session_id: &'a str,
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<Value>,
}

/// Append-only writer for one session's log file
#[derive(Debug)]
pub struct SessionLogger {
    session_id: String,
    path: PathBuf,
    file: File,
}

impl SessionLogger {
    /// Create `base_dir` if needed and open this session's log file
    pub fn create(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        let session_id = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let path = base_dir.join(format!("session_{}.ndjson", session_id));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            session_id,
            path,
            file,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush
    pub fn log(&mut self, level: Level, message: &str, extra: Option<Value>) -> Result<()> {
        let entry = Entry {
            timestamp: Local::now().to_rfc3339(),
            session_id: &self.session_id,
            level: level.as_str(),
            message,
            extra,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}
