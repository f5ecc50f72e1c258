//! Log sinks: the rotating file layer and config-outcome reporting

use rma_common::config::ConfigSource;
use rma_recon::audit_log::{RotatingFile, LOG_FILE_NAME};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_events_reach_log_file() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");
    let file = RotatingFile::open(&log_dir).unwrap();

    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file),
    );
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(rows = 3, "Reconciliation complete");
    });

    let text = fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
    assert!(text.contains("INFO"));
    assert!(text.contains("Reconciliation complete"));
    assert!(text.contains("rows=3"));
}

#[test]
fn test_missing_config_file_is_warned() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(move || writer.clone()),
    );

    tracing::subscriber::with_default(subscriber, || {
        ConfigSource::Missing(PathBuf::from("/no/such/recon.toml")).log();
    });

    let text = captured.text();
    assert!(text.contains("WARN"));
    assert!(text.contains("/no/such/recon.toml"));
    assert!(text.contains("compiled defaults"));
}
