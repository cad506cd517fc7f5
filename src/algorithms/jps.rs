use crate::algorithms::search::{
    GridSearch, OpenList, ScoredNode, SearchPolicy, TraceSlot, ALL_DIRECTIONS,
};
use crate::grid::GridPosition;
use std::f64::consts::SQRT_2;

/// Eight-directional A*, shown as "JPS".
///
/// No jumping or forced-neighbour pruning happens: every expanded node is
/// simply reported as a jump point. Cardinal moves cost 1, diagonal moves
/// √2, the heuristic is straight-line distance. Diagonal moves are allowed
/// between two blocked orthogonal cells. Open-list selection and the
/// no-reopen rule are the same as [`AStar`](crate::algorithms::a_star::AStar).
#[derive(Debug, Clone, Copy, Default)]
pub struct Jps;

pub type JpsSearch = GridSearch<Jps>;

fn move_cost((dx, dz): (i32, i32)) -> f64 {
    if dx.abs() + dz.abs() == 2 {
        SQRT_2
    } else {
        1.0
    }
}

impl SearchPolicy for Jps {
    type Node = ScoredNode;
    type Frontier = OpenList;

    const NAME: &'static str = "JPS";
    const DIRECTIONS: &'static [(i32, i32)] = &ALL_DIRECTIONS;
    const TRACE: TraceSlot = TraceSlot::JumpPoints;

    fn start_node(start: GridPosition, end: GridPosition) -> ScoredNode {
        ScoredNode {
            position: start,
            parent: None,
            g_cost: 0.0,
            h_cost: start.euclidean(end),
        }
    }

    fn successor(
        current: &ScoredNode,
        neighbor: GridPosition,
        direction: (i32, i32),
        end: GridPosition,
    ) -> ScoredNode {
        ScoredNode {
            position: neighbor,
            parent: Some(current.position),
            g_cost: current.g_cost + move_cost(direction),
            h_cost: neighbor.euclidean(end),
        }
    }

    fn improves(candidate: &ScoredNode, existing: &ScoredNode) -> bool {
        candidate.g_cost < existing.g_cost
    }
}
