//! rma-recon - UPS shipment / RMA reconciliation
//!
//! Reads a carrier export, expands it into one row per tracking number and
//! RMA identifier, recovers missing identifiers from the secondary reference
//! field, filters consolidated pick-ups, and writes the "RMA Analysis" and
//! "Non-Standard RMAs" reports.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rma_common::ReconConfig;
use serde_json::json;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use rma_recon::audit_log::RotatingFile;
use rma_recon::session_log::SessionLogger;
use rma_recon::{alerts, ingest, pipeline, report, search};

/// Command-line arguments for rma-recon
#[derive(Parser, Debug)]
#[command(name = "rma-recon")]
#[command(about = "Reconcile UPS shipment exports against RMA numbers")]
#[command(version)]
struct Cli {
    /// Config file (overrides RMA_RECON_CONFIG and the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile an export and write both reports
    Run {
        /// Carrier export (CSV with header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Previous reconciliation to compare against
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Report directory (overrides [output] directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Date alerts are evaluated against, YYYY-MM-DD (default: today)
        #[arg(long)]
        analysis_date: Option<NaiveDate>,

        /// Do not mark alert rows in the report
        #[arg(long)]
        no_alerts: bool,
    },

    /// Reconcile an export and print the analysis to stdout
    Show {
        /// Carrier export (CSV with header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Only rows containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the per-tracking-number normalized view instead of the analysis
        #[arg(long)]
        normalized: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_source) =
        ReconConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    let (file_log, file_log_error) = if config.logging.file_log {
        match RotatingFile::open(&config.logging.directory) {
            Ok(file) => (Some(file), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(file_log.map(|file| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file)
        }))
        .init();

    info!("rma-recon {}", rma_recon::version_string());
    config_source.log();
    if let Some(e) = file_log_error {
        warn!("File log disabled: {}", e);
    }

    match cli.command {
        Command::Run {
            input,
            baseline,
            output_dir,
            analysis_date,
            no_alerts,
        } => {
            let mut session = open_session(&config);
            let run_id = Uuid::new_v4();
            let options = RunOptions {
                input: &input,
                baseline: baseline.as_deref(),
                output_dir: output_dir.as_deref(),
                analysis_date: analysis_date.unwrap_or_else(|| Local::now().date_naive()),
                mark_alerts: config.output.mark_alerts && !no_alerts,
            };

            let result = reconcile(&config, &options, run_id, session.as_mut());
            if let Err(e) = &result {
                session_event(
                    session.as_mut(),
                    Level::ERROR,
                    "Run failed",
                    json!({ "run_id": run_id.to_string(), "error": format!("{:#}", e) }),
                );
            }
            result
        }
        Command::Show {
            input,
            search: term,
            limit,
            normalized,
        } => show(&input, term.as_deref(), limit, normalized),
    }
}

struct RunOptions<'a> {
    input: &'a Path,
    baseline: Option<&'a Path>,
    output_dir: Option<&'a Path>,
    analysis_date: NaiveDate,
    mark_alerts: bool,
}

fn reconcile(
    config: &ReconConfig,
    options: &RunOptions<'_>,
    run_id: Uuid,
    mut session: Option<&mut SessionLogger>,
) -> Result<()> {
    let fingerprint = ingest::fingerprint(options.input)
        .with_context(|| format!("Failed to read {}", options.input.display()))?;
    session_event(
        session.as_deref_mut(),
        Level::INFO,
        "Run started",
        json!({
            "run_id": run_id.to_string(),
            "input": options.input.display().to_string(),
            "input_sha256": fingerprint,
            "version": rma_recon::version_string(),
        }),
    );

    let source = ingest::read_table(options.input).context("Failed to load carrier export")?;
    let baseline = options
        .baseline
        .map(ingest::read_table)
        .transpose()
        .context("Failed to load baseline")?;

    let result = pipeline::run(&source, baseline.as_ref());

    let thresholds = &config.alerts;
    let (warnings, critical) =
        alerts::count_alerts(&result.output.rows, options.analysis_date, thresholds);
    if warnings + critical > 0 {
        warn!(warnings, critical, "Rows need attention");
    }

    let rows = if options.mark_alerts {
        alerts::annotate(&result.output.rows, options.analysis_date, thresholds)
    } else {
        result.output.rows.clone()
    };

    let directory = options.output_dir.unwrap_or(config.output.directory.as_path());
    let paths = report::write_reconciliation(&rows, &result.non_standard, directory, &config.output)
        .context("Failed to write reports")?;

    let minutes_saved = result.summary.minutes_saved(&config.kpi);
    info!(
        analysis = %paths.analysis.display(),
        minutes_saved,
        "Run finished"
    );
    session_event(
        session,
        Level::INFO,
        "Run finished",
        json!({
            "run_id": run_id.to_string(),
            "summary": result.summary,
            "alerts": { "warning": warnings, "critical": critical },
            "minutes_saved": minutes_saved,
            "analysis_report": paths.analysis.display().to_string(),
            "non_standard_report": paths.non_standard.display().to_string(),
        }),
    );
    Ok(())
}

fn show(input: &Path, term: Option<&str>, limit: Option<usize>, normalized: bool) -> Result<()> {
    let source = ingest::read_table(input).context("Failed to load carrier export")?;
    let result = pipeline::run(&source, None);

    let table = if normalized {
        result.normalized.to_table()
    } else {
        result.output.to_table()
    };
    let shown = search::filter_table(&table, term, limit);

    report::write_table(&shown, io::stdout().lock()).context("Failed to write to stdout")?;
    Ok(())
}

fn open_session(config: &ReconConfig) -> Option<SessionLogger> {
    if !config.logging.session_log {
        return None;
    }
    match SessionLogger::create(&config.logging.directory) {
        Ok(logger) => {
            info!(path = %logger.path().display(), "Session log opened");
            Some(logger)
        }
        Err(e) => {
            warn!("Session log disabled: {}", e);
            None
        }
    }
}

/// Session log failures are reported but never abort the run
fn session_event(
    session: Option<&mut SessionLogger>,
    level: Level,
    message: &str,
    extra: serde_json::Value,
) {
    if let Some(logger) = session {
        if let Err(e) = logger.log(level, message, Some(extra)) {
            warn!("Failed to write session log: {}", e);
        }
    }
}
