// QueryBench - core/runner.rs
//
// Replay loop: times every statement under one enclosing measurement point.
// Owns no formatting; the caller renders the returned snapshot.

use crate::core::executor::StatementExecutor;
use crate::core::model::AggregateNode;
use crate::core::monitor::{MeasurementMonitor, MeasurementPoint};
use crate::util::constants;
use crate::util::error::MonitorError;

/// Result of one replay run.
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    /// Aggregate tree read from the monitor after the run, if it has one.
    pub snapshot: Option<AggregateNode>,
    /// Statements that completed successfully.
    pub succeeded: usize,
    /// Statements the executor reported as failed.
    pub failed: usize,
    /// Set when the monitor could not be started or stopped.
    pub monitor_error: Option<MonitorError>,
}

/// Replay `queries` in order through `executor`, timing each one.
///
/// Each statement gets its own point named after the statement text, nested
/// in a point named [`constants::ROOT_POINT_NAME`]. A failing statement is
/// logged and counted; the loop carries on with the next one.
///
/// Monitor failures do not abort the caller: if `start` fails nothing is
/// executed, if `stop` fails the statements have already run. Either way the
/// error is returned in [`BenchmarkRun::monitor_error`] together with
/// whatever snapshot the monitor can still provide.
pub fn run<I, S, M>(
    queries: I,
    executor: &mut dyn StatementExecutor,
    monitor: &mut M,
) -> BenchmarkRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    M: MeasurementMonitor,
{
    if let Err(e) = monitor.start() {
        return BenchmarkRun {
            snapshot: monitor.snapshot(),
            succeeded: 0,
            failed: 0,
            monitor_error: Some(e),
        };
    }

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    {
        let enclosing = MeasurementPoint::open(&*monitor, constants::ROOT_POINT_NAME);
        for query in queries {
            let sql = query.as_ref();
            let point = MeasurementPoint::open(&*monitor, sql);
            let result = executor.execute(sql);
            point.collect();

            match result {
                Ok(outcome) => {
                    succeeded += 1;
                    tracing::trace!(
                        sql = %crate::util::sql_preview(sql),
                        rows = outcome.rows,
                        "Statement executed"
                    );
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(error = %e, "Statement failed; continuing with next");
                }
            }
        }
        enclosing.collect();
    }

    let monitor_error = monitor.stop().err();

    tracing::info!(succeeded, failed, "Benchmark run complete");

    BenchmarkRun {
        snapshot: monitor.snapshot(),
        succeeded,
        failed,
        monitor_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::ExecutionOutcome;
    use crate::core::monitor::{AggregatingMonitor, PointToken};
    use crate::util::error::ExecutionError;
    use std::cell::RefCell;

    /// Records every statement; fails the ones listed in `fail_on`.
    #[derive(Default)]
    struct ScriptedExecutor {
        seen: Vec<String>,
        fail_on: Vec<&'static str>,
    }

    impl StatementExecutor for ScriptedExecutor {
        fn execute(&mut self, sql: &str) -> Result<ExecutionOutcome, ExecutionError> {
            self.seen.push(sql.to_string());
            if self.fail_on.iter().any(|f| *f == sql) {
                Err(ExecutionError::Statement {
                    sql: sql.to_string(),
                    source: "table does not exist".into(),
                })
            } else {
                Ok(ExecutionOutcome { rows: 1 })
            }
        }
    }

    /// Monitor that logs every call so point discipline can be checked.
    #[derive(Default)]
    struct RecordingMonitor {
        events: RefCell<Vec<String>>,
        fail_start: bool,
        fail_stop: bool,
    }

    impl MeasurementMonitor for RecordingMonitor {
        fn start(&mut self) -> Result<(), MonitorError> {
            if self.fail_start {
                return Err(MonitorError::AlreadyRunning);
            }
            self.events.get_mut().push("start".into());
            Ok(())
        }

        fn stop(&mut self) -> Result<(), MonitorError> {
            self.events.get_mut().push("stop".into());
            if self.fail_stop {
                return Err(MonitorError::OpenPoints { count: 1 });
            }
            Ok(())
        }

        fn open_point(&self, name: &str) -> PointToken {
            let mut events = self.events.borrow_mut();
            events.push(format!("open {name}"));
            PointToken::new(events.len())
        }

        fn collect_point(&self, _token: PointToken) {
            self.events.borrow_mut().push("collect".into());
        }

        fn snapshot(&self) -> Option<AggregateNode> {
            Some(AggregateNode::default())
        }
    }

    #[test]
    fn test_every_point_closed_even_on_failure() {
        let mut executor = ScriptedExecutor {
            fail_on: vec!["SELECT bad"],
            ..Default::default()
        };
        let mut monitor = RecordingMonitor::default();
        let run = run(["SELECT 1", "SELECT bad"], &mut executor, &mut monitor);

        assert_eq!(run.succeeded, 1);
        assert_eq!(run.failed, 1);
        assert!(run.monitor_error.is_none());
        assert_eq!(
            monitor.events.into_inner(),
            vec![
                "start",
                "open Measurement",
                "open SELECT 1",
                "collect",
                "open SELECT bad",
                "collect",
                "collect",
                "stop",
            ]
        );
    }

    #[test]
    fn test_failure_does_not_abort_remaining_queries() {
        let mut executor = ScriptedExecutor {
            fail_on: vec!["SELECT 2"],
            ..Default::default()
        };
        let mut monitor = AggregatingMonitor::new();
        let run = run(
            ["SELECT 1", "SELECT 2", "SELECT 3"],
            &mut executor,
            &mut monitor,
        );

        assert_eq!(executor.seen, vec!["SELECT 1", "SELECT 2", "SELECT 3"]);
        let snapshot = run.snapshot.unwrap();
        let measurement = &snapshot.children[constants::ROOT_POINT_NAME];
        assert_eq!(measurement.children.len(), 3);
        assert_eq!(measurement.children["SELECT 2"].count, 1);
    }

    #[test]
    fn test_monitor_start_failure_runs_nothing() {
        let mut executor = ScriptedExecutor::default();
        let mut monitor = RecordingMonitor {
            fail_start: true,
            ..Default::default()
        };
        let run = run(["SELECT 1"], &mut executor, &mut monitor);
        assert_eq!(run.monitor_error, Some(MonitorError::AlreadyRunning));
        assert_eq!(run.succeeded + run.failed, 0);
        assert!(executor.seen.is_empty());
    }

    #[test]
    fn test_monitor_stop_failure_keeps_counts_and_snapshot() {
        let mut executor = ScriptedExecutor {
            fail_on: vec!["SELECT 2"],
            ..Default::default()
        };
        let mut monitor = RecordingMonitor {
            fail_stop: true,
            ..Default::default()
        };
        let run = run(["SELECT 1", "SELECT 2"], &mut executor, &mut monitor);
        assert_eq!(run.monitor_error, Some(MonitorError::OpenPoints { count: 1 }));
        assert_eq!(run.succeeded, 1);
        assert_eq!(run.failed, 1);
        assert!(run.snapshot.is_some());
    }

    #[test]
    fn test_already_running_monitor_runs_nothing() {
        let mut executor = ScriptedExecutor::default();
        let mut monitor = AggregatingMonitor::new();
        monitor.start().unwrap();
        let run = run(["SELECT 1"], &mut executor, &mut monitor);
        assert_eq!(run.monitor_error, Some(MonitorError::AlreadyRunning));
        assert!(executor.seen.is_empty());
        // Started once by hand, so an empty tree exists.
        assert!(run.snapshot.is_some());
    }

    #[test]
    fn test_empty_query_list_still_records_enclosing_point() {
        let mut executor = ScriptedExecutor::default();
        let mut monitor = AggregatingMonitor::new();
        let run = run(Vec::<String>::new(), &mut executor, &mut monitor);
        let snapshot = run.snapshot.unwrap();
        let measurement = &snapshot.children[constants::ROOT_POINT_NAME];
        assert_eq!(measurement.count, 1);
        assert!(!measurement.has_children());
    }
}
