use crate::algorithms::search::{
    GridSearch, LifoFrontier, PathNode, SearchPolicy, TraceSlot, CARDINAL_DIRECTIONS,
};
use crate::grid::GridPosition;

/// Depth-first search over the four cardinal directions.
///
/// Cells are marked discovered when pushed, so no cell is stacked twice.
/// The route found is connected and obstacle free but usually not shortest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dfs;

pub type DfsSearch = GridSearch<Dfs>;

impl SearchPolicy for Dfs {
    type Node = PathNode;
    type Frontier = LifoFrontier<PathNode>;

    const NAME: &'static str = "DFS";
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
