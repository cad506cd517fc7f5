//! The search loop shared by every strategy.
//!
//! BFS, DFS, A* and the eight-way "JPS" variant only differ in how the
//! frontier hands out the next node, which directions are expanded and how
//! a successor is scored. Those differences live in a [`SearchPolicy`]; the
//! loop, busy guards, pacing and path construction live here.

use crate::algorithms::animation::{
    CancellationToken, Pacer, SearchTrace, StepMarker, StepNotifier,
};
use crate::algorithms::common::{
    build_path, PathResult, PathfindingAlgorithm, SearchError, SearchLane, SearchNode,
};
use crate::grid::{GridModel, GridPosition};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::mem;
use std::time::Duration;

/// Step delay a strategy uses until told otherwise.
pub const DEFAULT_ANIM_SPEED_MS: u64 = 50;

pub const CARDINAL_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

pub const ALL_DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
];

/// BFS/DFS node: hop count from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
    pub position: GridPosition,
    pub parent: Option<GridPosition>,
    pub distance: u32,
}

impl SearchNode for PathNode {
    fn position(&self) -> GridPosition {
        self.position
    }

    fn parent(&self) -> Option<GridPosition> {
        self.parent
    }
}

/// A*/JPS node: accumulated cost plus heuristic estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredNode {
    pub position: GridPosition,
    pub parent: Option<GridPosition>,
    pub g_cost: f64,
    pub h_cost: f64,
}

impl ScoredNode {
    pub fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

impl SearchNode for ScoredNode {
    fn position(&self) -> GridPosition {
        self.position
    }

    fn parent(&self) -> Option<GridPosition> {
        self.parent
    }
}

/// An animated run was stopped at an interruption point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

pub type Inspect<'a, N> = dyn FnMut(&N) -> Result<(), Interrupted> + 'a;

/// Discovered-but-unexpanded nodes.
pub trait Frontier: Default {
    type Node: SearchNode;

    fn push(&mut self, node: Self::Node);

    /// Remove the next node to expand. `inspect` sees every candidate the
    /// frontier compares before choosing, and may abort the selection.
    fn pop(&mut self, inspect: &mut Inspect<'_, Self::Node>)
        -> Result<Option<Self::Node>, Interrupted>;

    fn contains(&self, position: GridPosition) -> bool;

    /// Overwrite the queued node at the same position in place.
    fn replace(&mut self, node: Self::Node);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First in, first out.
#[derive(Debug)]
pub struct FifoFrontier<N> {
    queue: VecDeque<N>,
}

impl<N> Default for FifoFrontier<N> {
    fn default() -> Self {
        FifoFrontier {
            queue: VecDeque::new(),
        }
    }
}

impl<N: SearchNode> Frontier for FifoFrontier<N> {
    type Node = N;

    fn push(&mut self, node: N) {
        self.queue.push_back(node);
    }

    fn pop(&mut self, _inspect: &mut Inspect<'_, N>) -> Result<Option<N>, Interrupted> {
        Ok(self.queue.pop_front())
    }

    fn contains(&self, position: GridPosition) -> bool {
        self.queue.iter().any(|n| n.position() == position)
    }

    fn replace(&mut self, node: N) {
        if let Some(slot) = self
            .queue
            .iter_mut()
            .find(|n| n.position() == node.position())
        {
            *slot = node;
        }
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Last in, first out.
#[derive(Debug)]
pub struct LifoFrontier<N> {
    stack: Vec<N>,
}

impl<N> Default for LifoFrontier<N> {
    fn default() -> Self {
        LifoFrontier { stack: Vec::new() }
    }
}

impl<N: SearchNode> Frontier for LifoFrontier<N> {
    type Node = N;

    fn push(&mut self, node: N) {
        self.stack.push(node);
    }

    fn pop(&mut self, _inspect: &mut Inspect<'_, N>) -> Result<Option<N>, Interrupted> {
        Ok(self.stack.pop())
    }

    fn contains(&self, position: GridPosition) -> bool {
        self.stack.iter().any(|n| n.position() == position)
    }

    fn replace(&mut self, node: N) {
        if let Some(slot) = self
            .stack
            .iter_mut()
            .find(|n| n.position() == node.position())
        {
            *slot = node;
        }
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}

/// Unordered open list, scanned linearly for the lowest f-cost. Ties go to
/// the lower h-cost, then to the earlier entry.
#[derive(Debug, Default)]
pub struct OpenList {
    nodes: Vec<ScoredNode>,
}

impl Frontier for OpenList {
    type Node = ScoredNode;

    fn push(&mut self, node: ScoredNode) {
        self.nodes.push(node);
    }

    fn pop(
        &mut self,
        inspect: &mut Inspect<'_, ScoredNode>,
    ) -> Result<Option<ScoredNode>, Interrupted> {
        if self.nodes.is_empty() {
            return Ok(None);
        }
        let mut best = 0;
        for i in 1..self.nodes.len() {
            inspect(&self.nodes[i])?;
            let candidate = &self.nodes[i];
            let current = &self.nodes[best];
            if candidate.f_cost() < current.f_cost()
                || (candidate.f_cost() == current.f_cost() && candidate.h_cost < current.h_cost)
            {
                best = i;
            }
        }
        Ok(Some(self.nodes.remove(best)))
    }

    fn contains(&self, position: GridPosition) -> bool {
        self.nodes.iter().any(|n| n.position == position)
    }

    fn replace(&mut self, node: ScoredNode) {
        if let Some(slot) = self.nodes.iter_mut().find(|n| n.position == node.position) {
            *slot = node;
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Which trace buffer an expanded node goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceSlot {
    Visited,
    Closed,
    JumpPoints,
}

/// Everything that distinguishes one strategy from another.
pub trait SearchPolicy {
    type Node: SearchNode;
    type Frontier: Frontier<Node = Self::Node>;

    const NAME: &'static str;
    const DIRECTIONS: &'static [(i32, i32)];
    const TRACE: TraceSlot;
    /// Surface (and pace) every open-list candidate while selecting.
    const ANIMATE_SCAN: bool = false;
    /// Record first insertions into the frontier in `SearchTrace::open`.
    const RECORD_OPEN: bool = false;

    fn start_node(start: GridPosition, end: GridPosition) -> Self::Node;

    fn successor(
        current: &Self::Node,
        neighbor: GridPosition,
        direction: (i32, i32),
        end: GridPosition,
    ) -> Self::Node;

    /// Whether `candidate` should replace a node still waiting in the
    /// frontier. Nodes already expanded are never revisited.
    fn improves(_candidate: &Self::Node, _existing: &Self::Node) -> bool {
        false
    }
}

/// Run state of one strategy instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Searching,
    Animating,
    /// Last run reached the end.
    Completed,
    /// Last run exhausted the frontier without reaching the end.
    Failed,
    /// Last animated run was stopped.
    Cancelled,
}

impl RunState {
    pub fn is_busy(self) -> bool {
        matches!(self, RunState::Searching | RunState::Animating)
    }
}

enum Exploration<N> {
    Found(FxHashMap<GridPosition, N>),
    NotFound,
    Cancelled,
}

struct Animation<'a> {
    notifier: &'a mut dyn StepNotifier,
    pacer: &'a mut dyn Pacer,
    cancel: CancellationToken,
    delay: Duration,
    trace: SearchTrace,
}

impl Animation<'_> {
    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Surface a step and suspend, checking for a stop on both sides.
    fn step(&mut self, position: GridPosition, marker: StepMarker) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            return Err(Interrupted);
        }
        log::trace!("{marker:?} {position}");
        self.notifier.notify(position, marker);
        self.pacer.wait(self.delay, &self.cancel);
        if self.is_cancelled() {
            return Err(Interrupted);
        }
        Ok(())
    }

    fn record(&mut self, slot: TraceSlot, position: GridPosition) {
        let buffer = match slot {
            TraceSlot::Visited => &mut self.trace.visited,
            TraceSlot::Closed => &mut self.trace.closed,
            TraceSlot::JumpPoints => &mut self.trace.jump_points,
        };
        buffer.push(position);
    }
}

/// One strategy instance: bounds, run state, last result and trace.
#[derive(Debug)]
pub struct GridSearch<P: SearchPolicy> {
    width: usize,
    height: usize,
    path: PathResult,
    state: RunState,
    anim_speed: Duration,
    cancel: CancellationToken,
    trace: SearchTrace,
    last_expanded: usize,
    policy: PhantomData<P>,
}

impl<P: SearchPolicy> Default for GridSearch<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SearchPolicy> GridSearch<P> {
    pub fn new() -> Self {
        GridSearch {
            width: 0,
            height: 0,
            path: PathResult::new(),
            state: RunState::Idle,
            anim_speed: Duration::from_millis(DEFAULT_ANIM_SPEED_MS),
            cancel: CancellationToken::new(),
            trace: SearchTrace::default(),
            last_expanded: 0,
            policy: PhantomData,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn is_valid_position(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.z >= 0 && (pos.x as usize) < self.width && (pos.z as usize) < self.height
    }

    fn validate(
        &self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
    ) -> Result<(), SearchError> {
        if self.width == 0 || self.height == 0 {
            return Err(SearchError::Uninitialized { algorithm: P::NAME });
        }
        let actual = (grid.width(), grid.height());
        if actual != (self.width, self.height) {
            return Err(SearchError::GridMismatch {
                expected: (self.width, self.height),
                actual,
            });
        }
        for position in [start, end] {
            if !self.is_valid_position(position) {
                return Err(SearchError::OutOfBounds {
                    position,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Ok(())
    }

    fn explore(
        &self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
        mut animation: Option<&mut Animation<'_>>,
    ) -> (Exploration<P::Node>, usize) {
        let mut frontier = P::Frontier::default();
        let mut nodes: FxHashMap<GridPosition, P::Node> = FxHashMap::default();
        let mut closed: FxHashSet<GridPosition> = FxHashSet::default();
        let mut expanded = 0;

        if grid.is_obstacle(start) {
            log::warn!("{}: start {start} is an obstacle", P::NAME);
            return (Exploration::NotFound, expanded);
        }

        let start_node = P::start_node(start, end);
        nodes.insert(start, start_node.clone());
        frontier.push(start_node);

        loop {
            let selected = match animation.as_deref_mut() {
                Some(anim) if anim.is_cancelled() => return (Exploration::Cancelled, expanded),
                Some(anim) if P::ANIMATE_SCAN => frontier.pop(&mut |node: &P::Node| {
                    let pos = node.position();
                    if pos == start || pos == end {
                        return Ok(());
                    }
                    anim.step(pos, StepMarker::Comparing)
                }),
                _ => frontier.pop(&mut |_: &P::Node| Ok(())),
            };
            let current = match selected {
                Ok(Some(node)) => node,
                Ok(None) => return (Exploration::NotFound, expanded),
                Err(Interrupted) => return (Exploration::Cancelled, expanded),
            };

            let pos = current.position();
            closed.insert(pos);
            expanded += 1;

            if let Some(anim) = animation.as_deref_mut() {
                if pos != start && pos != end {
                    anim.record(P::TRACE, pos);
                    if anim.step(pos, StepMarker::Expanding).is_err() {
                        return (Exploration::Cancelled, expanded);
                    }
                }
            }

            if pos == end {
                return (Exploration::Found(nodes), expanded);
            }

            for &direction in P::DIRECTIONS {
                let neighbor = pos.offset(direction.0, direction.1);
                if !self.is_valid_position(neighbor) || closed.contains(&neighbor) {
                    continue;
                }
                if grid.is_obstacle(neighbor) {
                    continue;
                }

                let candidate = P::successor(&current, neighbor, direction, end);
                match nodes
                    .get(&neighbor)
                    .map(|existing| P::improves(&candidate, existing))
                {
                    None => {
                        if P::RECORD_OPEN && neighbor != start && neighbor != end {
                            if let Some(anim) = animation.as_deref_mut() {
                                anim.trace.open.push(neighbor);
                            }
                        }
                        nodes.insert(neighbor, candidate.clone());
                        frontier.push(candidate);
                    }
                    Some(true) if frontier.contains(neighbor) => {
                        nodes.insert(neighbor, candidate.clone());
                        frontier.replace(candidate);
                    }
                    Some(_) => {}
                }
            }
        }
    }

    fn display_path(&self, start: GridPosition, end: GridPosition, animation: &mut Animation<'_>) {
        for &pos in self.path.positions() {
            if pos == start || pos == end {
                continue;
            }
            if animation.step(pos, StepMarker::OnPath).is_err() {
                log::info!("{}: path display stopped", P::NAME);
                return;
            }
        }
    }

    fn check_busy(&self, lane: SearchLane) -> Result<(), SearchError> {
        let busy = match lane {
            SearchLane::Synchronous => self.state == RunState::Searching,
            SearchLane::Animated => self.state.is_busy(),
        };
        if !busy {
            return Ok(());
        }
        let lane = if self.state == RunState::Searching {
            SearchLane::Synchronous
        } else {
            SearchLane::Animated
        };
        Err(SearchError::Busy {
            algorithm: P::NAME,
            lane,
        })
    }

    fn finish(&mut self, previous: RunState, outcome: RunState) {
        // A synchronous run inside an animated one hands the state back.
        self.state = if previous == RunState::Animating {
            previous
        } else {
            outcome
        };
    }
}

impl<P: SearchPolicy> PathfindingAlgorithm for GridSearch<P> {
    fn name(&self) -> &'static str {
        P::NAME
    }

    fn init_grid(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    fn try_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
    ) -> Result<bool, SearchError> {
        self.check_busy(SearchLane::Synchronous)?;
        self.validate(grid, start, end)?;
        let previous = mem::replace(&mut self.state, RunState::Searching);
        self.path.clear();

        log::info!("{}: searching from {start} to {end}", P::NAME);
        let (exploration, expanded) = self.explore(grid, start, end, None);
        self.last_expanded = expanded;

        let found = match exploration {
            Exploration::Found(nodes) => {
                self.path = build_path(&nodes, start, end, P::NAME);
                log::info!(
                    "{}: path found, {} positions, {} nodes expanded",
                    P::NAME,
                    self.path.len(),
                    expanded
                );
                true
            }
            Exploration::NotFound | Exploration::Cancelled => {
                log::warn!("{}: no path from {start} to {end}", P::NAME);
                false
            }
        };

        let outcome = if found {
            RunState::Completed
        } else {
            RunState::Failed
        };
        self.finish(previous, outcome);
        Ok(found)
    }

    fn try_animated_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
        notifier: &mut dyn StepNotifier,
        pacer: &mut dyn Pacer,
    ) -> Result<bool, SearchError> {
        self.check_busy(SearchLane::Animated)?;
        self.validate(grid, start, end)?;
        self.state = RunState::Animating;

        self.path.clear();
        self.trace.clear();
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        log::info!(
            "{}: animated search from {start} to {end}, {}ms per step",
            P::NAME,
            self.anim_speed.as_millis()
        );
        let mut animation = Animation {
            notifier,
            pacer,
            cancel: self.cancel.clone(),
            delay: self.anim_speed,
            trace: SearchTrace::default(),
        };
        let (exploration, expanded) = self.explore(grid, start, end, Some(&mut animation));
        self.last_expanded = expanded;

        let outcome = match exploration {
            Exploration::Found(nodes) => {
                self.path = build_path(&nodes, start, end, P::NAME);
                self.display_path(start, end, &mut animation);
                log::info!(
                    "{}: animated search done, {} positions",
                    P::NAME,
                    self.path.len()
                );
                RunState::Completed
            }
            Exploration::NotFound => {
                log::warn!("{}: animated search found no path", P::NAME);
                RunState::Failed
            }
            Exploration::Cancelled => {
                log::info!("{}: animated search cancelled", P::NAME);
                RunState::Cancelled
            }
        };

        self.trace = animation.trace;
        self.state = outcome;
        Ok(outcome == RunState::Completed)
    }

    fn path_result(&self) -> &PathResult {
        &self.path
    }

    fn clear_path(&mut self) {
        self.path.clear();
        self.trace.clear();
        self.stop_anim_pathfinding();
        self.state = RunState::Idle;
    }

    fn set_anim_speed(&mut self, speed_ms: u64) {
        self.anim_speed = Duration::from_millis(speed_ms);
    }

    fn anim_speed(&self) -> Duration {
        self.anim_speed
    }

    fn stop_anim_pathfinding(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        if self.state == RunState::Animating {
            self.state = RunState::Cancelled;
        }
    }

    fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn trace(&self) -> &SearchTrace {
        &self.trace
    }

    fn last_expanded(&self) -> usize {
        self.last_expanded
    }

    fn is_busy(&self) -> bool {
        self.state.is_busy()
    }
}
