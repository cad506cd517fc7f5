use crate::algorithms::search::{
    GridSearch, OpenList, ScoredNode, SearchPolicy, TraceSlot, CARDINAL_DIRECTIONS,
};
use crate::grid::GridPosition;

/// A* over the four cardinal directions with unit move cost and the
/// Manhattan heuristic.
///
/// The open list is scanned linearly: lowest f-cost first, lower h-cost on
/// ties. A cheaper route to a node still in the open list replaces it in
/// place. Once a node is closed it is never reopened, even if a cheaper
/// route to it turns up later.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar;

pub type AStarSearch = GridSearch<AStar>;

fn heuristic(from: GridPosition, to: GridPosition) -> f64 {
    f64::from(from.manhattan(to))
}

impl SearchPolicy for AStar {
    type Node = ScoredNode;
    type Frontier = OpenList;

    const NAME: &'static str = "A*";
    const DIRECTIONS: &'static [(i32, i32)] = &CARDINAL_DIRECTIONS;
    const TRACE: TraceSlot = TraceSlot::Closed;
    const ANIMATE_SCAN: bool = true;
    const RECORD_OPEN: bool = true;

    fn start_node(start: GridPosition, end: GridPosition) -> ScoredNode {
        ScoredNode {
            position: start,
            parent: None,
            g_cost: 0.0,
            h_cost: heuristic(start, end),
        }
    }

    fn successor(
        current: &ScoredNode,
        neighbor: GridPosition,
        _direction: (i32, i32),
        end: GridPosition,
    ) -> ScoredNode {
        ScoredNode {
            position: neighbor,
            parent: Some(current.position),
            g_cost: current.g_cost + 1.0,
            h_cost: heuristic(neighbor, end),
        }
    }

    fn improves(candidate: &ScoredNode, existing: &ScoredNode) -> bool {
        candidate.g_cost < existing.g_cost
    }
}
