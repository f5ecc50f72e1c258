//! Durable plain-text log with size-based rotation
//!
//! `rma-recon.log` in the log directory receives the same `tracing` events as
//! stderr. When the next write would push the file past [`MAX_BYTES`] it is
//! renamed to `rma-recon.log.1`, older backups shift up by one, and at most
//! [`BACKUP_COUNT`] backups are kept.

use rma_common::Result;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

pub const LOG_FILE_NAME: &str = "rma-recon.log";
pub const MAX_BYTES: u64 = 1024 * 1024;
pub const BACKUP_COUNT: usize = 5;

/// Log file that rotates itself once it reaches a size limit
///
/// Shared by reference across threads; each write holds the lock for the
/// whole formatted event, so rotation happens between lines.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Open `<directory>/rma-recon.log` with the default limits
    pub fn open(directory: &Path) -> Result<Self> {
        Self::with_limits(directory.join(LOG_FILE_NAME), MAX_BYTES, BACKUP_COUNT)
    }

    pub fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backups,
            state: Mutex::new(State { file, written }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of backup number `index` (1 is the newest)
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))
    }

    fn rotate(&self, state: &mut State) -> io::Result<()> {
        state.file.flush()?;
        if self.backups > 0 {
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }
        state.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        state.written = 0;
        Ok(())
    }
}

impl Write for &RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.lock()?;
        if state.written > 0 && state.written + buf.len() as u64 > self.max_bytes {
            self.rotate(&mut state)?;
        }
        state.file.write_all(buf)?;
        state.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = &'a RotatingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}
