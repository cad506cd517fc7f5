use crate::algorithms::search::{
    FifoFrontier, GridSearch, PathNode, SearchPolicy, TraceSlot, CARDINAL_DIRECTIONS,
};
use crate::grid::GridPosition;

/// Breadth-first search over the four cardinal directions.
///
/// Nodes leave the queue in non-decreasing hop count, so the first time the
/// end is dequeued the route is a shortest one. Parents are fixed on first
/// discovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bfs;

pub type BfsSearch = GridSearch<Bfs>;

impl SearchPolicy for Bfs {
    type Node = PathNode;
    type Frontier = FifoFrontier<PathNode>;

    const NAME: &'static str = "BFS";
    const DIRECTIONS: &'static [(i32, i32)] = &CARDINAL_DIRECTIONS;
    const TRACE: TraceSlot = TraceSlot::Visited;

    fn start_node(start: GridPosition, _end: GridPosition) -> PathNode {
        PathNode {
            position: start,
            parent: None,
            distance: 0,
        }
    }

    fn successor(
        current: &PathNode,
        neighbor: GridPosition,
        _direction: (i32, i32),
        _end: GridPosition,
    ) -> PathNode {
        PathNode {
            position: neighbor,
            parent: Some(current.position),
            distance: current.distance + 1,
        }
    }
}
