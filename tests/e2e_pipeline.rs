// QueryBench - tests/e2e_pipeline.rs
//
// End-to-end tests for the extraction -> replay -> report pipeline.
//
// These run a real general-query-log fixture through the real extractor,
// the real AggregatingMonitor and both report formats. Only the database is
// replaced, by an in-process executor, so no server is needed.

use querybench::app::session::{run_session, SessionOptions};
use querybench::core::executor::{ExecutionOutcome, StatementExecutor};
use querybench::core::extractor::{QueryExtractor, QueryFilter};
use querybench::core::model::{NumberStyle, ReportFormat};
use querybench::core::monitor::AggregatingMonitor;
use querybench::core::{report, runner};
use querybench::platform::fs;
use querybench::util::constants;
use querybench::util::error::ExecutionError;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn extract(filter: QueryFilter) -> Vec<String> {
    let extractor = QueryExtractor::new(&filter).unwrap();
    fs::extract_queries_from_file(&fixture("general_query.log"), &extractor).unwrap()
}

/// Executor that rejects UPDATE statements and accepts everything else.
#[derive(Default)]
struct ReadOnlyExecutor {
    executed: Vec<String>,
}

impl StatementExecutor for ReadOnlyExecutor {
    fn execute(&mut self, sql: &str) -> Result<ExecutionOutcome, ExecutionError> {
        self.executed.push(sql.to_string());
        if sql.to_lowercase().starts_with("update") {
            return Err(ExecutionError::Statement {
                sql: sql.to_string(),
                source: "read-only replica".into(),
            });
        }
        Ok(ExecutionOutcome { rows: 1 })
    }
}

fn report_lines(text: &str) -> Vec<&str> {
    text.split(constants::LINE_ENDING)
        .filter(|l| !l.is_empty())
        .collect()
}

// =============================================================================
// Extraction E2E
// =============================================================================

/// Without a filter every numeric connection's statements are kept, in order.
#[test]
fn e2e_extracts_all_sessions_in_log_order() {
    let queries = extract(QueryFilter::default());
    assert_eq!(
        queries,
        vec![
            "SET NAMES utf8",
            "SELECT id, name FROM customers WHERE id = 1",
            "SELECT COUNT(*) FROM orders",
            "select * from orders where customer_id = 1",
            "SHOW WARNINGS",
            "SELECT id, name FROM customers WHERE id = 1",
            "UPDATE orders SET state = 'done' WHERE id = 17",
        ]
    );
}

/// A connection filter plus ignore prefixes narrow the list.
#[test]
fn e2e_connection_filter_and_ignore_prefixes() {
    let queries = extract(QueryFilter {
        connection_id: Some("7".to_string()),
        ignore_prefixes: vec!["set".to_string(), "SHOW".to_string()],
    });
    assert_eq!(
        queries,
        vec![
            "SELECT id, name FROM customers WHERE id = 1",
            "select * from orders where customer_id = 1",
            "SELECT id, name FROM customers WHERE id = 1",
        ]
    );
}

/// Running extraction twice yields identical sequences.
#[test]
fn e2e_extraction_is_repeatable() {
    assert_eq!(extract(QueryFilter::default()), extract(QueryFilter::default()));
}

// =============================================================================
// Replay + report E2E
// =============================================================================

/// Failures are counted, not fatal, and every statement still gets a row.
#[test]
fn e2e_replay_continues_past_failures() {
    let queries = extract(QueryFilter::default());
    let mut executor = ReadOnlyExecutor::default();
    let mut monitor = AggregatingMonitor::new();

    let run = runner::run(&queries, &mut executor, &mut monitor);

    assert_eq!(executor.executed, queries);
    assert!(run.monitor_error.is_none());
    assert_eq!(run.failed, 1);
    assert_eq!(run.succeeded, queries.len() - 1);

    let snapshot = run.snapshot.unwrap();
    let measurement = &snapshot.children[constants::ROOT_POINT_NAME];
    // Duplicate statement folds into one aggregate.
    assert_eq!(measurement.children.len(), queries.len() - 1);
    assert_eq!(
        measurement.children["SELECT id, name FROM customers WHERE id = 1"].count,
        2
    );
}

/// Both formats produce the same rows with uniform column widths.
#[test]
fn e2e_plain_and_csv_reports_aligned() {
    let queries = extract(QueryFilter::default());
    let mut executor = ReadOnlyExecutor::default();
    let mut monitor = AggregatingMonitor::new();
    let snapshot = runner::run(&queries, &mut executor, &mut monitor)
        .snapshot
        .unwrap();

    for (format, sep) in [(ReportFormat::Plain, '|'), (ReportFormat::Csv, ';')] {
        let text = report::render(&snapshot, format, &NumberStyle::default());
        let lines = report_lines(&text);
        assert_eq!(lines.len(), 1 + snapshot.descendant_count());
        assert!(text.ends_with(constants::LINE_ENDING));

        let width = lines[0].chars().count();
        for line in &lines {
            assert_eq!(line.chars().count(), width, "ragged row in {format}: {line}");
            assert_eq!(line.matches(sep).count(), lines[0].matches(sep).count());
        }
        assert!(lines[1].contains(&format!("{sep} Measurement ")));
        assert!(lines[2].contains(&format!("{sep}   SELECT COUNT(*) FROM orders ")));
    }
}

/// The whole session writes the same text it returns.
#[test]
fn e2e_session_writes_csv_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");
    let options = SessionOptions {
        log_file: fixture("general_query.log"),
        filter: QueryFilter {
            connection_id: Some("8".to_string()),
            ignore_prefixes: Vec::new(),
        },
        format: ReportFormat::Csv,
        number_style: NumberStyle::default(),
        output: Some(output.clone()),
        verbose: false,
    };

    let summary = run_session(&options, || Ok(ReadOnlyExecutor::default())).unwrap();

    assert_eq!(summary.extracted, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.monitor_error.is_none());
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, summary.report);
    let lines = report_lines(&written);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains(" Measurement Point "));
    assert!(!lines[0].starts_with('|'));
    assert!(lines[3].contains("UPDATE orders SET state = 'done' WHERE id = 17"));
}
