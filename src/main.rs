use clap::Parser;

use grid_pathfinding::comparison::{
    compare_algorithms, optimal_path_cost, optimal_path_length, print_comparison_results,
};
use grid_pathfinding::config::Config;
use grid_pathfinding::statistics::SearchStatistics;
use grid_pathfinding::{
    CellState, GridModel, GridPosition, PathfindingEngine, SleepPacer, StepMarker,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::time::Instant;

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

fn build_grid(config: &Config) -> Result<(GridModel, GridPosition, GridPosition), String> {
    let mut grid = match &config.map {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read map {}: {e}", path.display()))?;
            text.parse::<GridModel>()
                .map_err(|e| format!("invalid map {}: {e}", path.display()))?
        }
        None => {
            if config.width == 0 || config.height == 0 {
                return Err("grid width and height must be at least 1".to_string());
            }
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let start = config.start.unwrap_or(GridPosition::new(0, 0));
            let end = config.end.unwrap_or(GridPosition::new(
                config.width as i32 - 1,
                config.height as i32 - 1,
            ));
            GridModel::random(
                config.width,
                config.height,
                config.obstacles,
                start,
                end,
                &mut rng,
            )
        }
    };

    if let Some(start) = config.start {
        if !grid.set_start(start) {
            return Err(format!("start {start} is outside the grid"));
        }
    }
    if let Some(end) = config.end {
        if !grid.set_end(end) {
            return Err(format!("end {end} is outside the grid"));
        }
    }

    let (start, end) = grid
        .find_endpoints()
        .ok_or_else(|| "the grid needs both a start (S) and an end (E) cell".to_string())?;
    Ok((grid, start, end))
}

fn run_single(
    engine: &mut PathfindingEngine,
    grid: &GridModel,
    start: GridPosition,
    end: GridPosition,
    config: &Config,
) -> SearchStatistics {
    let mut display = grid.clone();
    let mut steps = 0usize;
    let mut notifier = |pos: GridPosition, marker: StepMarker| {
        let state = match marker {
            StepMarker::Comparing => return,
            StepMarker::Expanding => CellState::Visited,
            StepMarker::OnPath => CellState::OnPath,
        };
        display.set(pos, state);
        steps += 1;
        clear_screen();
        println!("=== {} | step {steps} ===", config.algorithm);
        print!("{display}");
    };
    let mut pacer = SleepPacer::new();

    let started = Instant::now();
    let found = engine.search(grid, start, end, &mut notifier, &mut pacer);
    let elapsed = started.elapsed();

    let kind = engine.current_algorithm();
    let path = engine.path_result();
    SearchStatistics {
        algorithm: kind,
        found,
        path_length: path.len(),
        path_cost: path.cost(),
        expanded: engine.last_expanded(),
        elapsed,
        optimal_length: optimal_path_length(grid, start, end, kind.is_diagonal()),
        optimal_cost: optimal_path_cost(grid, start, end, kind.is_diagonal()),
    }
}

fn main() {
    let config = Config::parse();

    let default_filter = if config.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let (grid, start, end) = match build_grid(&config) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if !config.quiet {
        println!("Grid: {}x{}", grid.width(), grid.height());
        println!("Start: {start}, End: {end}");
        println!("Obstacles: {}", grid.count(CellState::Obstacle));
        println!("Algorithm: {}", config.algorithm);
        print!("{grid}");
        println!();
    }

    let mut engine = PathfindingEngine::with_config(config.pathfinding_config());
    engine.init_grid(grid.width(), grid.height());

    if config.runs_all() {
        let results = compare_algorithms(&mut engine, &grid, start, end);
        print_comparison_results(&results);
        return;
    }

    engine.set_algorithm_by_name(&config.algorithm);
    let stats = run_single(&mut engine, &grid, start, end, &config);

    let mut result_grid = grid.clone();
    result_grid.mark_path(engine.path_result());

    println!("\n=== FINAL RESULTS ===");
    print!("{result_grid}");
    println!();
    println!("{stats}");
    if stats.found && !config.quiet {
        println!("Path: {}", engine.path_result());
    }
}
