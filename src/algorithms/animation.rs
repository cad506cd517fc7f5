use crate::grid::GridPosition;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Shared stop flag for an animated run. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Suspends an animated search between steps.
pub trait Pacer {
    /// Wait for `duration`, returning early once `cancel` is set.
    fn wait(&mut self, duration: Duration, cancel: &CancellationToken);
}

/// Pacer backed by `thread::sleep`, polling the token every few
/// milliseconds so a stop is honoured promptly.
#[derive(Debug, Clone, Copy)]
pub struct SleepPacer {
    slice: Duration,
}

impl SleepPacer {
    pub fn new() -> Self {
        SleepPacer {
            slice: Duration::from_millis(5),
        }
    }
}

impl Default for SleepPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for SleepPacer {
    fn wait(&mut self, duration: Duration, cancel: &CancellationToken) {
        // No representable deadline: wait until cancelled.
        let deadline = Instant::now().checked_add(duration);
        while !cancel.is_cancelled() {
            let now = Instant::now();
            let nap = match deadline {
                Some(deadline) if now >= deadline => break,
                Some(deadline) => self.slice.min(deadline - now),
                None => self.slice,
            };
            thread::sleep(nap);
        }
    }
}

/// Pacer that never suspends. Counts how often it was asked to.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer {
    pub waits: usize,
}

impl Pacer for InstantPacer {
    fn wait(&mut self, _duration: Duration, _cancel: &CancellationToken) {
        self.waits += 1;
    }
}

/// What an animated step is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepMarker {
    /// Candidate inspected while scanning the open list.
    Comparing,
    /// Node moved from the frontier to the closed/visited set.
    Expanding,
    /// Cell on the final route.
    OnPath,
}

/// Receives animated steps. The search never renders anything itself.
pub trait StepNotifier {
    fn notify(&mut self, position: GridPosition, marker: StepMarker);
}

impl<F> StepNotifier for F
where
    F: FnMut(GridPosition, StepMarker),
{
    fn notify(&mut self, position: GridPosition, marker: StepMarker) {
        self(position, marker)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl StepNotifier for NoopNotifier {
    fn notify(&mut self, _position: GridPosition, _marker: StepMarker) {}
}

/// Exploration order captured during an animated run. Start and end are
/// never recorded. Kept after the run until the path is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTrace {
    /// Nodes popped from the frontier (BFS, DFS).
    pub visited: Vec<GridPosition>,
    /// Nodes first added to the open list (A*).
    pub open: Vec<GridPosition>,
    /// Nodes moved to the closed set (A*).
    pub closed: Vec<GridPosition>,
    /// Expanded nodes, reported as jump points (JPS).
    pub jump_points: Vec<GridPosition>,
}

impl SearchTrace {
    pub fn clear(&mut self) {
        self.visited.clear();
        self.open.clear();
        self.closed.clear();
        self.jump_points.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
            && self.open.is_empty()
            && self.closed.is_empty()
            && self.jump_points.is_empty()
    }
}
