use crate::engine::AlgorithmKind;
use crate::grid::GridPosition;
use clap::Parser;
use std::path::PathBuf;

/// Dispatcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathfindingConfig {
    pub algorithm: AlgorithmKind,
    pub anim_speed_ms: u64,
    /// Run searches animated (`true`) or synchronously.
    pub show_search_process: bool,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        PathfindingConfig {
            algorithm: AlgorithmKind::Bfs,
            anim_speed_ms: 200,
            show_search_process: true,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub width: usize,

    #[arg(long, default_value_t = 20)]
    pub height: usize,

    #[arg(long, default_value_t = 80)]
    pub obstacles: usize,

    /// Seed for the random grid. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// bfs, dfs, a_star, jps or all
    #[arg(long, default_value = "a_star")]
    pub algorithm: String,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Redraw the grid after every search step.
    #[arg(long, default_value_t = false)]
    pub animate: bool,

    /// Read the grid from a map file (`.` free, `#` obstacle, `S` start, `E` end).
    #[arg(long)]
    pub map: Option<PathBuf>,

    #[arg(long, value_parser = parse_position)]
    pub start: Option<GridPosition>,

    #[arg(long, value_parser = parse_position)]
    pub end: Option<GridPosition>,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    pub fn runs_all(&self) -> bool {
        self.algorithm.eq_ignore_ascii_case("all")
    }

    pub fn pathfinding_config(&self) -> PathfindingConfig {
        PathfindingConfig {
            algorithm: self.algorithm.parse().unwrap_or_default(),
            anim_speed_ms: self.delay_ms,
            show_search_process: self.animate,
        }
    }
}

/// Parse `x,z`.
pub fn parse_position(s: &str) -> Result<GridPosition, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,z but got '{s}'"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid x coordinate '{x}'"))?;
    let z = z
        .trim()
        .parse()
        .map_err(|_| format!("invalid z coordinate '{z}'"))?;
    Ok(GridPosition::new(x, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_bfs_at_200ms() {
        let config = PathfindingConfig::default();
        assert_eq!(config.algorithm, AlgorithmKind::Bfs);
        assert_eq!(config.anim_speed_ms, 200);
        assert!(config.show_search_process);
    }

    #[test]
    fn positions_parse_from_pairs() {
        assert_eq!(parse_position("3,4"), Ok(GridPosition::new(3, 4)));
        assert_eq!(parse_position(" 0 , 12 "), Ok(GridPosition::new(0, 12)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,1").is_err());
    }

    #[test]
    fn command_line_maps_onto_engine_config() {
        let config = Config::parse_from([
            "grid_pathfinding",
            "--algorithm",
            "jps",
            "--delay-ms",
            "5",
            "--animate",
            "--start",
            "1,2",
        ]);
        assert_eq!(config.start, Some(GridPosition::new(1, 2)));
        assert!(!config.runs_all());
        let engine_config = config.pathfinding_config();
        assert_eq!(engine_config.algorithm, AlgorithmKind::Jps);
        assert_eq!(engine_config.anim_speed_ms, 5);
        assert!(engine_config.show_search_process);
    }

    #[test]
    fn unknown_algorithm_maps_to_bfs() {
        let config = Config::parse_from(["grid_pathfinding", "--algorithm", "all"]);
        assert!(config.runs_all());
        assert_eq!(config.pathfinding_config().algorithm, AlgorithmKind::Bfs);
    }
}
