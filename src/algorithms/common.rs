use crate::algorithms::animation::{CancellationToken, Pacer, SearchTrace, StepNotifier};
use crate::grid::{GridModel, GridPosition};
use rustc_hash::FxHashMap;
use std::f64::consts::SQRT_2;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which of a strategy's two run lanes rejected a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLane {
    Synchronous,
    Animated,
}

impl fmt::Display for SearchLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLane::Synchronous => write!(f, "synchronous"),
            SearchLane::Animated => write!(f, "animated"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{algorithm}: a {lane} search is already running")]
    Busy {
        algorithm: &'static str,
        lane: SearchLane,
    },
    #[error("{algorithm}: grid size has not been initialised")]
    Uninitialized { algorithm: &'static str },
    #[error("position {position} lies outside the {width}x{height} grid")]
    OutOfBounds {
        position: GridPosition,
        width: usize,
        height: usize,
    },
    #[error("grid buffer is {actual:?} but the search was initialised for {expected:?}")]
    GridMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

/// Ordered route from start to end, both inclusive. Empty when no path
/// was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathResult {
    positions: Vec<GridPosition>,
}

impl PathResult {
    pub fn new() -> Self {
        PathResult::default()
    }

    pub fn positions(&self) -> &[GridPosition] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn start(&self) -> Option<GridPosition> {
        self.positions.first().copied()
    }

    pub fn end(&self) -> Option<GridPosition> {
        self.positions.last().copied()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Sum of step costs along the path: 1 per cardinal step, √2 per diagonal.
    pub fn cost(&self) -> f64 {
        self.positions
            .windows(2)
            .map(|pair| {
                let dx = (pair[1].x - pair[0].x).abs();
                let dz = (pair[1].z - pair[0].z).abs();
                if dx + dz == 2 {
                    SQRT_2
                } else {
                    1.0
                }
            })
            .sum()
    }

    /// Every consecutive pair is one unit apart (cardinally, or also
    /// diagonally when `diagonal` is set).
    pub fn is_contiguous(&self, diagonal: bool) -> bool {
        self.positions.windows(2).all(|pair| {
            let dx = (pair[1].x - pair[0].x).abs();
            let dz = (pair[1].z - pair[0].z).abs();
            match (dx, dz) {
                (1, 0) | (0, 1) => true,
                (1, 1) => diagonal,
                _ => false,
            }
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridPosition> {
        self.positions.iter()
    }
}

impl From<Vec<GridPosition>> for PathResult {
    fn from(positions: Vec<GridPosition>) -> Self {
        PathResult { positions }
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.positions.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", steps.join(" -> "))
    }
}

/// A node recorded in a search's position→node map. Parents are positions,
/// resolved back through that map when the path is built.
pub trait SearchNode: Clone {
    fn position(&self) -> GridPosition;
    fn parent(&self) -> Option<GridPosition>;
}

/// Trace parent links from `end` back to `start` and return the route in
/// start→end order.
///
/// A missing parent means the node map is inconsistent. That is logged and
/// the route is truncated at the break.
pub fn build_path<N: SearchNode>(
    nodes: &FxHashMap<GridPosition, N>,
    start: GridPosition,
    end: GridPosition,
    algorithm: &str,
) -> PathResult {
    let mut path = Vec::new();
    let mut current = end;

    while current != start {
        path.push(current);
        match nodes.get(&current).and_then(SearchNode::parent) {
            Some(parent) => current = parent,
            None => {
                log::error!("{algorithm}: path back-trace lost the parent of {current}");
                debug_assert!(false, "{algorithm}: no parent recorded for {current}");
                break;
            }
        }
    }

    path.push(start);
    path.reverse();
    PathResult::from(path)
}

/// The contract every search strategy implements, so callers can swap one
/// for another without touching calling code.
pub trait PathfindingAlgorithm {
    fn name(&self) -> &'static str;

    /// Set the bounds used for position validity checks.
    fn init_grid(&mut self, width: usize, height: usize);

    /// Run to completion. Rejections are logged and reported as `false`.
    fn find_path(&mut self, grid: &GridModel, start: GridPosition, end: GridPosition) -> bool {
        match self.try_find_path(grid, start, end) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    fn try_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
    ) -> Result<bool, SearchError>;

    /// Run step by step, surfacing progress through `notifier` and
    /// suspending through `pacer`. Cancellation returns `false` without
    /// building a path.
    fn animated_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
        notifier: &mut dyn StepNotifier,
        pacer: &mut dyn Pacer,
    ) -> bool {
        match self.try_animated_find_path(grid, start, end, notifier, pacer) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    fn try_animated_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
        notifier: &mut dyn StepNotifier,
        pacer: &mut dyn Pacer,
    ) -> Result<bool, SearchError>;

    fn path_result(&self) -> &PathResult;

    /// Drop the result, the trace buffers and the run state, cancelling an
    /// in-flight animated run.
    fn clear_path(&mut self);

    fn set_anim_speed(&mut self, speed_ms: u64);

    fn anim_speed(&self) -> Duration;

    fn stop_anim_pathfinding(&mut self);

    /// Token observed by the current (or next) animated run.
    fn cancel_token(&self) -> CancellationToken;

    fn trace(&self) -> &SearchTrace;

    /// Nodes expanded by the most recent search.
    fn last_expanded(&self) -> usize;

    fn is_busy(&self) -> bool;
}
