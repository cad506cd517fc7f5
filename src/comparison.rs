use crate::algorithms::search::{ALL_DIRECTIONS, CARDINAL_DIRECTIONS};
use crate::engine::{AlgorithmKind, PathfindingEngine};
use crate::grid::{GridModel, GridPosition};
use crate::statistics::SearchStatistics;
use pathfinding::prelude::{bfs, dijkstra};
use std::f64::consts::SQRT_2;
use std::time::Instant;

/// Fixed-point scale for diagonal-aware reference costs.
const COST_SCALE: f64 = 1_000_000.0;

fn passable_neighbors(grid: &GridModel, pos: GridPosition, diagonal: bool) -> Vec<GridPosition> {
    let directions: &[(i32, i32)] = if diagonal {
        &ALL_DIRECTIONS
    } else {
        &CARDINAL_DIRECTIONS
    };
    directions
        .iter()
        .map(|&(dx, dz)| pos.offset(dx, dz))
        .filter(|&next| grid.contains(next) && !grid.is_obstacle(next))
        .collect()
}

/// Fewest steps from `start` to `end`, moving cardinally (or also
/// diagonally). `None` if the end is unreachable.
pub fn optimal_path_length(
    grid: &GridModel,
    start: GridPosition,
    end: GridPosition,
    diagonal: bool,
) -> Option<usize> {
    bfs(
        &start,
        |&pos| passable_neighbors(grid, pos, diagonal),
        |&pos| pos == end,
    )
    .map(|path| path.len().saturating_sub(1))
}

/// Cheapest route cost with 1 per cardinal step and √2 per diagonal step.
pub fn optimal_path_cost(
    grid: &GridModel,
    start: GridPosition,
    end: GridPosition,
    diagonal: bool,
) -> Option<f64> {
    let cardinal = COST_SCALE as u64;
    let diagonal_cost = (SQRT_2 * COST_SCALE).round() as u64;
    dijkstra(
        &start,
        |&pos| {
            passable_neighbors(grid, pos, diagonal)
                .into_iter()
                .map(move |next| {
                    let step = if next.x != pos.x && next.z != pos.z {
                        diagonal_cost
                    } else {
                        cardinal
                    };
                    (next, step)
                })
        },
        |&pos| pos == end,
    )
    .map(|(_, cost)| cost as f64 / COST_SCALE)
}

/// Run every strategy synchronously on the same grid. Each strategy's
/// previous result is cleared first; the engine's selection is untouched.
pub fn compare_algorithms(
    engine: &mut PathfindingEngine,
    grid: &GridModel,
    start: GridPosition,
    end: GridPosition,
) -> Vec<SearchStatistics> {
    let cardinal_optimum = optimal_path_length(grid, start, end, false);
    let diagonal_optimum = optimal_path_length(grid, start, end, true);
    let cardinal_cost = optimal_path_cost(grid, start, end, false);
    let diagonal_cost = optimal_path_cost(grid, start, end, true);

    log::info!(
        "comparing {} algorithms from {start} to {end}",
        AlgorithmKind::ALL.len()
    );

    AlgorithmKind::ALL
        .iter()
        .map(|&kind| {
            let strategy = engine.strategy_mut(kind);
            strategy.clear_path();

            let started = Instant::now();
            let found = strategy.find_path(grid, start, end);
            let elapsed = started.elapsed();

            let path = strategy.path_result();
            let (optimal_length, optimal_cost) = if kind.is_diagonal() {
                (diagonal_optimum, diagonal_cost)
            } else {
                (cardinal_optimum, cardinal_cost)
            };
            SearchStatistics {
                algorithm: kind,
                found,
                path_length: path.len(),
                path_cost: path.cost(),
                expanded: strategy.last_expanded(),
                elapsed,
                optimal_length,
                optimal_cost,
            }
        })
        .collect()
}

pub fn print_comparison_results(results: &[SearchStatistics]) {
    println!("\n=== ALGORITHM COMPARISON RESULTS ===");
    println!();
    println!(
        "{:<10} {:<8} {:<10} {:<10} {:<10} {:<10} {:<12} {:<12}",
        "Algorithm", "Found", "Length", "Cost", "Optimal", "Expanded", "Efficiency", "Time"
    );
    println!("{}", "-".repeat(88));

    for result in results {
        let found_str = if result.found { "✓" } else { "✗" };
        let optimal_str = result
            .optimal_cost
            .map(|cost| format!("{cost:.3}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<8} {:<10} {:<10.3} {:<10} {:<10} {:<12.3} {:<12}",
            result.algorithm.name(),
            found_str,
            result.path_length,
            result.path_cost,
            optimal_str,
            result.expanded,
            result.route_efficiency(),
            format!("{:.2?}", result.elapsed),
        );
    }
    println!();

    let successful: Vec<&SearchStatistics> = results.iter().filter(|r| r.found).collect();
    if successful.is_empty() {
        println!("No algorithm found a path.");
        return;
    }

    println!("=== PERFORMANCE ANALYSIS ===");
    if let Some(cheapest) = successful
        .iter()
        .min_by(|a, b| a.path_cost.total_cmp(&b.path_cost))
    {
        println!(
            "Cheapest path: {} (cost {:.3})",
            cheapest.algorithm, cheapest.path_cost
        );
    }
    if let Some(leanest) = successful.iter().min_by_key(|r| r.expanded) {
        println!(
            "Fewest expansions: {} ({} nodes)",
            leanest.algorithm, leanest.expanded
        );
    }
    if let Some(fastest) = successful.iter().min_by_key(|r| r.elapsed) {
        println!("Fastest: {} ({:.2?})", fastest.algorithm, fastest.elapsed);
    }
    for result in successful.iter().filter(|r| !r.is_optimal()) {
        println!(
            "{} took {} steps where {} would do",
            result.algorithm,
            result.steps(),
            result
                .optimal_length
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walled_grid() -> GridModel {
        GridModel::from_ascii(
            "S..#....\n\
             .#.#.##.\n\
             .#...#..\n\
             .####.#.\n\
             ......#E",
        )
        .unwrap()
    }

    #[test]
    fn reference_lengths_on_an_open_grid() {
        let grid = GridModel::new(5, 5);
        let start = GridPosition::new(0, 0);
        let end = GridPosition::new(4, 4);
        assert_eq!(optimal_path_length(&grid, start, end, false), Some(8));
        assert_eq!(optimal_path_length(&grid, start, end, true), Some(4));
        let cost = optimal_path_cost(&grid, start, end, true).unwrap();
        assert!((cost - 4.0 * SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn unreachable_end_has_no_reference() {
        let grid = GridModel::from_ascii(
            "S.#.\n\
             ..#E",
        )
        .unwrap();
        let (start, end) = grid.find_endpoints().unwrap();
        assert_eq!(optimal_path_length(&grid, start, end, true), None);
        assert_eq!(optimal_path_cost(&grid, start, end, false), None);
    }

    #[test]
    fn comparison_covers_every_algorithm() {
        let grid = walled_grid();
        let (start, end) = grid.find_endpoints().unwrap();
        let mut engine = PathfindingEngine::new();
        engine.init_grid(grid.width(), grid.height());
        engine.set_algorithm(AlgorithmKind::Dfs);

        let results = compare_algorithms(&mut engine, &grid, start, end);
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.found && r.expanded > 0));
        assert_eq!(engine.current_algorithm(), AlgorithmKind::Dfs);

        let by_kind = |kind: AlgorithmKind| results.iter().find(|r| r.algorithm == kind).unwrap();
        assert!(by_kind(AlgorithmKind::Bfs).is_optimal());
        assert!(by_kind(AlgorithmKind::AStar).is_optimal());
        assert!(by_kind(AlgorithmKind::Dfs).steps() >= by_kind(AlgorithmKind::Bfs).steps());
        let jps = by_kind(AlgorithmKind::Jps);
        assert!((jps.path_cost - jps.optimal_cost.unwrap()).abs() < 1e-5);
    }
}
