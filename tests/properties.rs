use grid_pathfinding::comparison::optimal_path_length;
use grid_pathfinding::{
    AlgorithmKind, CellState, GridModel, GridPosition, InstantPacer, NoopNotifier,
    PathfindingEngine, StepMarker,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine_for(grid: &GridModel) -> PathfindingEngine {
    let mut engine = PathfindingEngine::new();
    engine.init_grid(grid.width(), grid.height());
    engine
}

fn random_case(seed: u64) -> (GridModel, GridPosition, GridPosition) {
    let mut rng = StdRng::seed_from_u64(seed);
    let width = rng.gen_range(4..16);
    let height = rng.gen_range(4..16);
    let start = GridPosition::new(0, rng.gen_range(0..height as i32));
    let end = GridPosition::new(width as i32 - 1, rng.gen_range(0..height as i32));
    let obstacles = width * height / 3;
    let grid = GridModel::random(width, height, obstacles, start, end, &mut rng);
    (grid, start, end)
}

#[test]
fn bfs_on_open_grid_matches_manhattan_distance() {
    let grid = GridModel::new(7, 5);
    let mut engine = engine_for(&grid);
    for (start, end) in [
        (GridPosition::new(0, 0), GridPosition::new(6, 4)),
        (GridPosition::new(3, 2), GridPosition::new(0, 4)),
        (GridPosition::new(5, 1), GridPosition::new(5, 1)),
    ] {
        assert!(engine.find_path(&grid, start, end));
        let expected = start.manhattan(end) as usize + 1;
        assert_eq!(engine.path_result().len(), expected, "{start} -> {end}");
    }
}

#[test]
fn a_star_never_longer_than_bfs() {
    for seed in 0..40 {
        let (grid, start, end) = random_case(seed);
        let mut engine = engine_for(&grid);

        let bfs_found = engine.find_path(&grid, start, end);
        let bfs_len = engine.path_result().len();

        engine.set_algorithm(AlgorithmKind::AStar);
        let a_found = engine.find_path(&grid, start, end);
        assert_eq!(a_found, bfs_found, "seed {seed}");
        assert!(engine.path_result().len() <= bfs_len, "seed {seed}");

        let reference = optimal_path_length(&grid, start, end, false);
        assert_eq!(reference.is_some(), bfs_found, "seed {seed}");
        if let Some(steps) = reference {
            assert_eq!(bfs_len, steps + 1, "seed {seed}");
        }
    }
}

#[test]
fn every_found_path_is_contiguous_and_obstacle_free() {
    for seed in 100..130 {
        let (grid, start, end) = random_case(seed);
        let mut engine = engine_for(&grid);
        for kind in AlgorithmKind::ALL {
            engine.set_algorithm(kind);
            if !engine.find_path(&grid, start, end) {
                assert!(engine.path_result().is_empty());
                continue;
            }
            let path = engine.path_result();
            assert_eq!(path.start(), Some(start), "{kind} seed {seed}");
            assert_eq!(path.end(), Some(end), "{kind} seed {seed}");
            assert!(path.is_contiguous(kind.is_diagonal()), "{kind} seed {seed}");
            assert!(
                path.iter().all(|&pos| !grid.is_obstacle(pos)),
                "{kind} seed {seed}"
            );
        }
    }
}

#[test]
fn enclosed_end_is_unreachable_for_every_strategy() {
    let grid = GridModel::from_ascii(
        "S....\n\
         .###.\n\
         .#E#.\n\
         .###.\n\
         .....",
    )
    .unwrap();
    let (start, end) = grid.find_endpoints().unwrap();
    let mut engine = engine_for(&grid);
    for kind in AlgorithmKind::ALL {
        engine.set_algorithm(kind);
        assert!(!engine.find_path(&grid, start, end), "{kind}");
        assert!(engine.path_result().is_empty(), "{kind}");

        let mut pacer = InstantPacer::default();
        assert!(
            !engine.animated_find_path(&grid, start, end, &mut NoopNotifier, &mut pacer),
            "{kind}"
        );
        assert!(engine.path_result().is_empty(), "{kind}");
    }
}

#[test]
fn clearing_and_rerunning_is_deterministic() {
    let (grid, start, end) = random_case(7);
    let mut engine = engine_for(&grid);
    for kind in AlgorithmKind::ALL {
        engine.set_algorithm(kind);
        let found = engine.find_path(&grid, start, end);
        let first = engine.path_result().clone();
        let expanded = engine.last_expanded();

        engine.clear_path();
        assert_eq!(engine.find_path(&grid, start, end), found, "{kind}");
        assert_eq!(engine.path_result(), &first, "{kind}");
        assert_eq!(engine.last_expanded(), expanded, "{kind}");
    }
}

#[test]
fn animated_and_synchronous_runs_agree() {
    let (grid, start, end) = random_case(21);
    let mut engine = engine_for(&grid);
    for kind in AlgorithmKind::ALL {
        engine.set_algorithm(kind);
        let found = engine.find_path(&grid, start, end);
        let sync_path = engine.path_result().clone();

        let mut pacer = InstantPacer::default();
        let animated = engine.animated_find_path(&grid, start, end, &mut NoopNotifier, &mut pacer);
        assert_eq!(animated, found, "{kind}");
        assert_eq!(engine.path_result(), &sync_path, "{kind}");
    }
}

#[test]
fn example_scenario_on_five_by_five() {
    let grid = GridModel::new(5, 5);
    let start = GridPosition::new(0, 0);
    let end = GridPosition::new(4, 4);
    let mut engine = engine_for(&grid);

    engine.set_algorithm(AlgorithmKind::Bfs);
    assert!(engine.find_path(&grid, start, end));
    assert_eq!(engine.path_result().len(), 9);

    engine.set_algorithm(AlgorithmKind::AStar);
    assert!(engine.find_path(&grid, start, end));
    assert_eq!(engine.path_result().len(), 9);
    assert_eq!(engine.path_result().cost(), 8.0);

    engine.set_algorithm(AlgorithmKind::Jps);
    assert!(engine.find_path(&grid, start, end));
    assert!(engine.path_result().len() <= 9);
    assert!((engine.path_result().cost() - 5.66).abs() < 0.01);
}

#[test]
fn marking_the_path_keeps_endpoints() {
    let mut grid = GridModel::new(4, 3);
    let start = GridPosition::new(0, 0);
    let end = GridPosition::new(3, 2);
    grid.set_start(start);
    grid.set_end(end);
    let mut engine = engine_for(&grid);
    engine.set_algorithm(AlgorithmKind::AStar);
    assert!(engine.find_path(&grid, start, end));

    grid.mark_path(engine.path_result());
    assert_eq!(grid.get(start), Some(CellState::Start));
    assert_eq!(grid.get(end), Some(CellState::End));
    assert_eq!(grid.count(CellState::OnPath), engine.path_result().len() - 2);

    grid.clear_search_marks();
    assert_eq!(grid.count(CellState::OnPath), 0);
}

#[test]
fn path_display_reports_interior_cells_in_order() {
    let grid = GridModel::new(4, 1);
    let start = GridPosition::new(0, 0);
    let end = GridPosition::new(3, 0);
    let mut engine = engine_for(&grid);
    let mut on_path = Vec::new();
    let mut pacer = InstantPacer::default();
    assert!(engine.animated_find_path(
        &grid,
        start,
        end,
        &mut |pos: GridPosition, marker: StepMarker| {
            if marker == StepMarker::OnPath {
                on_path.push(pos);
            }
        },
        &mut pacer,
    ));
    assert_eq!(on_path, vec![GridPosition::new(1, 0), GridPosition::new(2, 0)]);
}

#[test]
fn start_on_an_obstacle_finds_nothing() {
    let mut grid = GridModel::new(3, 1);
    let start = GridPosition::new(0, 0);
    let end = GridPosition::new(2, 0);
    grid.set(start, CellState::Obstacle);
    let mut engine = engine_for(&grid);
    for kind in AlgorithmKind::ALL {
        engine.set_algorithm(kind);
        assert!(!engine.find_path(&grid, start, end), "{kind}");
        assert!(engine.path_result().is_empty(), "{kind}");
        assert_eq!(engine.last_expanded(), 0, "{kind}");

        let mut pacer = InstantPacer::default();
        assert!(
            !engine.animated_find_path(&grid, start, end, &mut NoopNotifier, &mut pacer),
            "{kind}"
        );
        assert!(engine.path_result().is_empty(), "{kind}");
    }
}
