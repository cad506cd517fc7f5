pub mod algorithms;
pub mod comparison;
pub mod config;
pub mod engine;
pub mod grid;
pub mod statistics;

pub use algorithms::animation::{
    CancellationToken, InstantPacer, NoopNotifier, Pacer, SearchTrace, SleepPacer, StepMarker,
    StepNotifier,
};
pub use algorithms::common::{PathResult, PathfindingAlgorithm, SearchError, SearchLane};
pub use algorithms::search::RunState;
pub use config::PathfindingConfig;
pub use engine::{AlgorithmKind, PathfindingEngine, UnknownAlgorithm};
pub use grid::{CellState, GridModel, GridParseError, GridPosition};
