use crate::engine::AlgorithmKind;
use std::fmt;
use std::time::Duration;

/// Outcome of one synchronous search, for the comparison report.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    pub algorithm: AlgorithmKind,
    pub found: bool,
    /// Positions on the path, start and end included.
    pub path_length: usize,
    pub path_cost: f64,
    pub expanded: usize,
    pub elapsed: Duration,
    /// Shortest possible number of steps under this algorithm's movement
    /// rules, if the end is reachable at all.
    pub optimal_length: Option<usize>,
    /// Cheapest possible route cost under the same rules.
    pub optimal_cost: Option<f64>,
}

impl SearchStatistics {
    pub fn steps(&self) -> usize {
        self.path_length.saturating_sub(1)
    }

    /// Path steps over optimal steps. 1.0 is optimal; 0.0 when there is
    /// nothing to compare.
    pub fn route_efficiency(&self) -> f64 {
        match self.optimal_length {
            Some(optimal) if self.found && optimal > 0 => self.steps() as f64 / optimal as f64,
            _ => 0.0,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.found && self.optimal_length == Some(self.steps())
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Path found: {}", if self.found { "yes" } else { "no" })?;
        if self.found {
            writeln!(f, "Path length: {} positions ({} steps)", self.path_length, self.steps())?;
            writeln!(f, "Path cost: {:.3}", self.path_cost)?;
        }
        writeln!(f, "Nodes expanded: {}", self.expanded)?;
        writeln!(f, "Search time: {:.2?}", self.elapsed)?;
        match self.optimal_length {
            Some(optimal) => writeln!(f, "Optimal length: {optimal} steps")?,
            None => writeln!(f, "Optimal length: unreachable")?,
        }
        if let Some(cost) = self.optimal_cost {
            writeln!(f, "Optimal cost: {cost:.3}")?;
        }
        if self.route_efficiency() > 0.0 {
            writeln!(f, "Route efficiency: {:.3}", self.route_efficiency())?;
        }
        Ok(())
    }
}
