use crate::algorithms::a_star::AStarSearch;
use crate::algorithms::animation::{CancellationToken, Pacer, SearchTrace, StepNotifier};
use crate::algorithms::bfs::BfsSearch;
use crate::algorithms::common::{PathResult, PathfindingAlgorithm, SearchError};
use crate::algorithms::dfs::DfsSearch;
use crate::algorithms::jps::JpsSearch;
use crate::config::PathfindingConfig;
use crate::grid::{GridModel, GridPosition};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlgorithmKind {
    #[default]
    Bfs,
    Dfs,
    AStar,
    Jps,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::Bfs,
        AlgorithmKind::Dfs,
        AlgorithmKind::AStar,
        AlgorithmKind::Jps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Bfs => "BFS",
            AlgorithmKind::Dfs => "DFS",
            AlgorithmKind::AStar => "A*",
            AlgorithmKind::Jps => "JPS",
        }
    }

    /// Whether the strategy also moves diagonally.
    pub fn is_diagonal(self) -> bool {
        self == AlgorithmKind::Jps
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown algorithm '{0}', expected one of bfs, dfs, a_star, jps")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for AlgorithmKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(AlgorithmKind::Bfs),
            "dfs" => Ok(AlgorithmKind::Dfs),
            "a_star" | "astar" | "a*" => Ok(AlgorithmKind::AStar),
            "jps" => Ok(AlgorithmKind::Jps),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Front door to the four strategies.
///
/// Every search call goes to the selected strategy. Grid bounds and the
/// animation speed are pushed to all of them, so switching strategy between
/// runs needs no extra setup. Clearing and stopping also reach all four.
#[derive(Debug)]
pub struct PathfindingEngine {
    config: PathfindingConfig,
    bfs: BfsSearch,
    dfs: DfsSearch,
    a_star: AStarSearch,
    jps: JpsSearch,
}

impl Default for PathfindingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PathfindingEngine {
    pub fn new() -> Self {
        Self::with_config(PathfindingConfig::default())
    }

    pub fn with_config(config: PathfindingConfig) -> Self {
        let mut engine = PathfindingEngine {
            config,
            bfs: BfsSearch::new(),
            dfs: DfsSearch::new(),
            a_star: AStarSearch::new(),
            jps: JpsSearch::new(),
        };
        engine.set_anim_speed(config.anim_speed_ms);
        engine
    }

    pub fn config(&self) -> &PathfindingConfig {
        &self.config
    }

    pub fn current_algorithm(&self) -> AlgorithmKind {
        self.config.algorithm
    }

    /// Switch the selected strategy. The others keep their state.
    pub fn set_algorithm(&mut self, kind: AlgorithmKind) {
        log::debug!("selected {kind}");
        self.config.algorithm = kind;
    }

    /// Select by name, falling back to BFS for names that are not recognised.
    pub fn set_algorithm_by_name(&mut self, name: &str) -> AlgorithmKind {
        let kind: AlgorithmKind = name.parse().unwrap_or_else(|err: UnknownAlgorithm| {
            log::warn!("{err}, falling back to BFS");
            AlgorithmKind::Bfs
        });
        self.set_algorithm(kind);
        kind
    }

    pub fn set_show_search_process(&mut self, show: bool) {
        self.config.show_search_process = show;
    }

    pub fn strategy(&self, kind: AlgorithmKind) -> &dyn PathfindingAlgorithm {
        match kind {
            AlgorithmKind::Bfs => &self.bfs,
            AlgorithmKind::Dfs => &self.dfs,
            AlgorithmKind::AStar => &self.a_star,
            AlgorithmKind::Jps => &self.jps,
        }
    }

    pub fn strategy_mut(&mut self, kind: AlgorithmKind) -> &mut dyn PathfindingAlgorithm {
        match kind {
            AlgorithmKind::Bfs => &mut self.bfs,
            AlgorithmKind::Dfs => &mut self.dfs,
            AlgorithmKind::AStar => &mut self.a_star,
            AlgorithmKind::Jps => &mut self.jps,
        }
    }

    fn selected(&self) -> &dyn PathfindingAlgorithm {
        self.strategy(self.config.algorithm)
    }

    fn selected_mut(&mut self) -> &mut dyn PathfindingAlgorithm {
        self.strategy_mut(self.config.algorithm)
    }

    fn all_mut(&mut self) -> [&mut dyn PathfindingAlgorithm; 4] {
        [&mut self.bfs, &mut self.dfs, &mut self.a_star, &mut self.jps]
    }

    pub fn init_grid(&mut self, width: usize, height: usize) {
        log::debug!("grid initialised to {width}x{height}");
        for strategy in self.all_mut() {
            strategy.init_grid(width, height);
        }
    }

    pub fn set_anim_speed(&mut self, speed_ms: u64) {
        self.config.anim_speed_ms = speed_ms;
        for strategy in self.all_mut() {
            strategy.set_anim_speed(speed_ms);
        }
    }

    pub fn find_path(&mut self, grid: &GridModel, start: GridPosition, end: GridPosition) -> bool {
        self.selected_mut().find_path(grid, start, end)
    }

    pub fn try_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
    ) -> Result<bool, SearchError> {
        self.selected_mut().try_find_path(grid, start, end)
    }

    pub fn animated_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
        notifier: &mut dyn StepNotifier,
        pacer: &mut dyn Pacer,
    ) -> bool {
        self.selected_mut()
            .animated_find_path(grid, start, end, notifier, pacer)
    }

    pub fn try_animated_find_path(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
        notifier: &mut dyn StepNotifier,
        pacer: &mut dyn Pacer,
    ) -> Result<bool, SearchError> {
        self.selected_mut()
            .try_animated_find_path(grid, start, end, notifier, pacer)
    }

    /// Animated when the configuration asks to show the search process,
    /// synchronous otherwise.
    pub fn search(
        &mut self,
        grid: &GridModel,
        start: GridPosition,
        end: GridPosition,
        notifier: &mut dyn StepNotifier,
        pacer: &mut dyn Pacer,
    ) -> bool {
        if self.config.show_search_process {
            self.animated_find_path(grid, start, end, notifier, pacer)
        } else {
            self.find_path(grid, start, end)
        }
    }

    pub fn path_result(&self) -> &PathResult {
        self.selected().path_result()
    }

    pub fn trace(&self) -> &SearchTrace {
        self.selected().trace()
    }

    pub fn last_expanded(&self) -> usize {
        self.selected().last_expanded()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.selected().cancel_token()
    }

    pub fn is_busy(&self) -> bool {
        self.selected().is_busy()
    }

    pub fn clear_path(&mut self) {
        for strategy in self.all_mut() {
            strategy.clear_path();
        }
    }

    pub fn stop_anim_pathfinding(&mut self) {
        for strategy in self.all_mut() {
            strategy.stop_anim_pathfinding();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::animation::{InstantPacer, NoopNotifier};
    use std::time::Duration;

    fn engine_for(grid: &GridModel) -> PathfindingEngine {
        let mut engine = PathfindingEngine::new();
        engine.init_grid(grid.width(), grid.height());
        engine
    }

    #[test]
    fn defaults_to_bfs_at_200ms() {
        let engine = PathfindingEngine::new();
        assert_eq!(engine.current_algorithm(), AlgorithmKind::Bfs);
        for kind in AlgorithmKind::ALL {
            assert_eq!(engine.strategy(kind).anim_speed(), Duration::from_millis(200));
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!("BFS".parse::<AlgorithmKind>(), Ok(AlgorithmKind::Bfs));
        assert_eq!("astar".parse::<AlgorithmKind>(), Ok(AlgorithmKind::AStar));
        assert_eq!("a_star".parse::<AlgorithmKind>(), Ok(AlgorithmKind::AStar));
        assert_eq!(" jps ".parse::<AlgorithmKind>(), Ok(AlgorithmKind::Jps));
        assert_eq!(
            "dijkstra".parse::<AlgorithmKind>(),
            Err(UnknownAlgorithm("dijkstra".to_string()))
        );
    }

    #[test]
    fn unknown_name_falls_back_to_bfs() {
        let mut engine = PathfindingEngine::new();
        engine.set_algorithm(AlgorithmKind::Jps);
        assert_eq!(engine.set_algorithm_by_name("greedy"), AlgorithmKind::Bfs);
        assert_eq!(engine.current_algorithm(), AlgorithmKind::Bfs);
    }

    #[test]
    fn init_and_speed_reach_every_strategy() {
        let mut engine = PathfindingEngine::new();
        engine.init_grid(7, 4);
        engine.set_anim_speed(15);
        for kind in AlgorithmKind::ALL {
            assert_eq!(engine.strategy(kind).anim_speed(), Duration::from_millis(15));
        }
        assert_eq!(engine.config().anim_speed_ms, 15);
        assert_eq!(engine.a_star.dimensions(), (7, 4));
        assert_eq!(engine.jps.dimensions(), (7, 4));
    }

    #[test]
    fn switching_keeps_each_strategys_result() {
        let grid = GridModel::new(5, 5);
        let start = GridPosition::new(0, 0);
        let end = GridPosition::new(4, 4);
        let mut engine = engine_for(&grid);

        assert!(engine.find_path(&grid, start, end));
        assert_eq!(engine.path_result().len(), 9);

        engine.set_algorithm(AlgorithmKind::Jps);
        assert!(engine.path_result().is_empty());
        assert!(engine.find_path(&grid, start, end));
        assert_eq!(engine.path_result().len(), 5);

        engine.set_algorithm(AlgorithmKind::Bfs);
        assert_eq!(engine.path_result().len(), 9);
    }

    #[test]
    fn clear_path_is_broadcast() {
        let grid = GridModel::new(4, 4);
        let start = GridPosition::new(0, 0);
        let end = GridPosition::new(3, 3);
        let mut engine = engine_for(&grid);
        for kind in AlgorithmKind::ALL {
            engine.set_algorithm(kind);
            assert!(engine.find_path(&grid, start, end));
        }
        engine.clear_path();
        for kind in AlgorithmKind::ALL {
            assert!(engine.strategy(kind).path_result().is_empty());
        }
    }

    #[test]
    fn search_follows_show_search_process() {
        let grid = GridModel::new(3, 3);
        let start = GridPosition::new(0, 0);
        let end = GridPosition::new(2, 2);
        let mut engine = engine_for(&grid);
        let mut pacer = InstantPacer::default();

        assert!(engine.search(&grid, start, end, &mut NoopNotifier, &mut pacer));
        assert!(pacer.waits > 0);
        assert!(!engine.trace().is_empty());

        engine.clear_path();
        engine.set_show_search_process(false);
        let mut pacer = InstantPacer::default();
        assert!(engine.search(&grid, start, end, &mut NoopNotifier, &mut pacer));
        assert_eq!(pacer.waits, 0);
        assert!(engine.trace().is_empty());
    }

    #[test]
    fn uninitialised_engine_rejects_searches() {
        let grid = GridModel::new(3, 3);
        let mut engine = PathfindingEngine::new();
        assert_eq!(
            engine.try_find_path(&grid, GridPosition::new(0, 0), GridPosition::new(2, 2)),
            Err(SearchError::Uninitialized { algorithm: "BFS" })
        );
    }
}
