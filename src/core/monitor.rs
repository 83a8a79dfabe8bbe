// QueryBench - core/monitor.rs
//
// Measurement monitor: scoped timing points folded into an aggregate tree.
//
// A monitor is created once per run and passed explicitly to whoever opens
// points. Points nest: a point opened while another is open becomes its
// child. `MeasurementPoint` is the scoped handle; it is collected on
// `collect()` or, failing that, when dropped, so every exit path closes it.

use crate::core::model::AggregateNode;
use crate::util::error::MonitorError;
use std::cell::RefCell;
use std::time::{Duration, Instant};

/// Identifies one open measurement point within its monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointToken(usize);

impl PointToken {
    pub fn new(depth: usize) -> Self {
        Self(depth)
    }

    /// Nesting depth of the point (0 = outermost).
    pub fn depth(&self) -> usize {
        self.0
    }
}

/// Collects timings for named measurement points.
///
/// `open_point`/`collect_point` take `&self` so that nested points can be
/// open at the same time; implementations use interior mutability and are
/// single-threaded.
pub trait MeasurementMonitor {
    /// Begin collecting. Fails if already running.
    fn start(&mut self) -> Result<(), MonitorError>;

    /// Stop collecting. Fails if not running or if points are still open.
    fn stop(&mut self) -> Result<(), MonitorError>;

    /// Start timing a point nested inside the innermost open point.
    fn open_point(&self, name: &str) -> PointToken;

    /// Stop timing a point and fold its duration into the aggregate tree.
    fn collect_point(&self, token: PointToken);

    /// Read-only copy of the aggregate tree. The returned root is unnamed and
    /// holds the outermost points as children. `None` if never started.
    fn snapshot(&self) -> Option<AggregateNode>;
}

/// Scoped handle for one open measurement point.
pub struct MeasurementPoint<'m> {
    monitor: &'m dyn MeasurementMonitor,
    token: Option<PointToken>,
}

impl<'m> MeasurementPoint<'m> {
    /// Open a point on `monitor`.
    pub fn open(monitor: &'m dyn MeasurementMonitor, name: &str) -> Self {
        let token = monitor.open_point(name);
        Self {
            monitor,
            token: Some(token),
        }
    }

    /// Close the point now.
    pub fn collect(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if let Some(token) = self.token.take() {
            self.monitor.collect_point(token);
        }
    }
}

impl Drop for MeasurementPoint<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

// =============================================================================
// Aggregating monitor
// =============================================================================

/// One entry of the open-point stack.
#[derive(Debug)]
struct OpenPoint {
    name: String,
    started: Instant,
}

#[derive(Debug, Default)]
struct MonitorState {
    root: Option<AggregateNode>,
    running: bool,
    open: Vec<OpenPoint>,
}

/// Wall-clock monitor keeping one aggregate per distinct point path.
#[derive(Debug, Default)]
pub struct AggregatingMonitor {
    state: RefCell<MonitorState>,
}

impl AggregatingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open points.
    #[cfg(test)]
    pub fn open_points(&self) -> usize {
        self.state.borrow().open.len()
    }
}

impl MeasurementMonitor for AggregatingMonitor {
    fn start(&mut self) -> Result<(), MonitorError> {
        let state = self.state.get_mut();
        if state.running {
            return Err(MonitorError::AlreadyRunning);
        }
        state.running = true;
        state.root.get_or_insert_with(AggregateNode::default);
        tracing::debug!("Measurement monitor started");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MonitorError> {
        let state = self.state.get_mut();
        if !state.running {
            return Err(MonitorError::NotRunning);
        }
        if !state.open.is_empty() {
            return Err(MonitorError::OpenPoints {
                count: state.open.len(),
            });
        }
        state.running = false;
        tracing::debug!("Measurement monitor stopped");
        Ok(())
    }

    fn open_point(&self, name: &str) -> PointToken {
        let mut state = self.state.borrow_mut();
        state.open.push(OpenPoint {
            name: name.to_string(),
            started: Instant::now(),
        });
        PointToken::new(state.open.len() - 1)
    }

    fn collect_point(&self, token: PointToken) {
        let mut state = self.state.borrow_mut();

        // Points close innermost first; anything still open above `token`
        // was leaked and is folded in with its own elapsed time.
        while state.open.len() > token.depth() {
            let elapsed = match state.open.last() {
                Some(point) => point.started.elapsed(),
                None => break,
            };
            fold(&mut state, elapsed);
        }
    }

    fn snapshot(&self) -> Option<AggregateNode> {
        self.state.borrow().root.clone()
    }
}

/// Pop the innermost open point and record `elapsed` at its path.
fn fold(state: &mut MonitorState, elapsed: Duration) {
    let MonitorState {
        root,
        running,
        open,
    } = state;

    if *running {
        if let Some(root) = root.as_mut() {
            let mut node = root;
            for point in open.iter() {
                node = node.child_mut(&point.name);
            }
            node.record(elapsed);
        }
    }
    open.pop();
}
