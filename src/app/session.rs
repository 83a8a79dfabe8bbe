// QueryBench - app/session.rs
//
// One benchmark session: read the query log, replay it against the
// database, render the timings, and deliver the report.
//
// Fatal conditions (unreadable log, no connection, report write failure) end
// the session with an error. Statement failures and monitor start/stop
// failures do not: whatever was measured is still rendered and delivered.

use crate::core::executor::StatementExecutor;
use crate::core::extractor::{QueryExtractor, QueryFilter};
use crate::core::model::{NumberStyle, ReportFormat};
use crate::core::monitor::{AggregatingMonitor, MeasurementMonitor};
use crate::core::{report, runner};
use crate::platform::fs;
use crate::util::error::{MonitorError, Result};
use std::path::PathBuf;

/// Everything a session needs besides the database connection itself.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Query log to replay.
    pub log_file: PathBuf,
    /// Which lines to replay.
    pub filter: QueryFilter,
    /// Report layout.
    pub format: ReportFormat,
    /// Locale conventions for numbers.
    pub number_style: NumberStyle,
    /// Write the report here, if set.
    pub output: Option<PathBuf>,
    /// Echo the report to stdout.
    pub verbose: bool,
}

/// What a finished session produced.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Statements extracted from the log.
    pub extracted: usize,
    /// Statements that ran successfully.
    pub succeeded: usize,
    /// Statements the database rejected.
    pub failed: usize,
    /// The rendered report text.
    pub report: String,
    /// Monitor failure that occurred during the run, if any.
    pub monitor_error: Option<MonitorError>,
}

/// Read and filter the query log.
pub fn load_queries(options: &SessionOptions) -> Result<Vec<String>> {
    let extractor = QueryExtractor::new(&options.filter)?;
    let queries = fs::extract_queries_from_file(&options.log_file, &extractor)?;
    tracing::info!(
        queries = queries.len(),
        path = %options.log_file.display(),
        "Read queries from log"
    );
    Ok(queries)
}

/// Run a full session with a fresh [`AggregatingMonitor`].
///
/// `connect` is called only after the log has been read successfully, so a
/// bad log never opens a connection. The executor it returns is dropped
/// (and thereby released) before this function returns, on every path.
pub fn run_session<E, F>(options: &SessionOptions, connect: F) -> Result<SessionSummary>
where
    E: StatementExecutor,
    F: FnOnce() -> Result<E>,
{
    let mut monitor = AggregatingMonitor::new();
    run_session_with_monitor(options, connect, &mut monitor)
}

/// Like [`run_session`], timing with the given monitor.
pub fn run_session_with_monitor<E, F, M>(
    options: &SessionOptions,
    connect: F,
    monitor: &mut M,
) -> Result<SessionSummary>
where
    E: StatementExecutor,
    F: FnOnce() -> Result<E>,
    M: MeasurementMonitor,
{
    let queries = load_queries(options)?;

    let mut executor = connect()?;

    tracing::info!("Executing benchmark...");
    let run = runner::run(&queries, &mut executor, monitor);
    drop(executor);

    match run.monitor_error {
        Some(ref e) => tracing::error!(error = %e, "Error processing queries"),
        None => {
            if let Some(ref snapshot) = run.snapshot {
                tracing::info!(
                    summary = %report::summary_line(snapshot, &options.number_style),
                    "Benchmark completed"
                );
            }
        }
    }

    let text = report::render_snapshot(
        run.snapshot.as_ref(),
        options.format,
        &options.number_style,
    );
    deliver(options, &text)?;

    Ok(SessionSummary {
        extracted: queries.len(),
        succeeded: run.succeeded,
        failed: run.failed,
        report: text,
        monitor_error: run.monitor_error,
    })
}

/// Echo and/or write the report.
fn deliver(options: &SessionOptions, text: &str) -> Result<()> {
    if options.verbose {
        println!("{text}");
    }
    if let Some(ref path) = options.output {
        println!("Writing result to {}", path.display());
        fs::write_report(path, text)?;
    }
    Ok(())
}
