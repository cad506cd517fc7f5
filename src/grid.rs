use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::algorithms::common::PathResult;

/// Integer cell coordinate. `x` is the column, `z` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridPosition {
    pub x: i32,
    pub z: i32,
}

impl GridPosition {
    pub const fn new(x: i32, z: i32) -> Self {
        GridPosition { x, z }
    }

    /// Offset this position by a direction vector.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        GridPosition {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    pub fn manhattan(self, other: GridPosition) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    pub fn euclidean(self, other: GridPosition) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dz = f64::from(self.z - other.z);
        (dx * dx + dz * dz).sqrt()
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Free,
    Start,
    End,
    Obstacle,
    Visited,
    OnPath,
}

impl CellState {
    pub fn glyph(self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Obstacle => '#',
            CellState::Visited => 'o',
            CellState::OnPath => '*',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(CellState::Free),
            'S' => Some(CellState::Start),
            'E' => Some(CellState::End),
            '#' => Some(CellState::Obstacle),
            'o' => Some(CellState::Visited),
            '*' => Some(CellState::OnPath),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("map is empty")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: GridPosition },
    #[error("more than one {0:?} cell in map")]
    DuplicateEndpoint(CellState),
}

/// The caller-owned cell buffer every search reads from.
///
/// Cells are stored column-major (`cells[x][z]`) so the buffer can be
/// indexed the same way positions are written. The buffer is only reachable
/// through [`get`](GridModel::get) and [`set`](GridModel::set), so its shape
/// always matches `width` x `height`:
///
/// ```compile_fail
/// let mut grid = grid_pathfinding::GridModel::new(3, 3);
/// grid.cells.pop();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    width: usize,
    height: usize,
    cells: Vec<Vec<CellState>>,
}

impl GridModel {
    pub fn new(width: usize, height: usize) -> Self {
        GridModel {
            width,
            height,
            cells: vec![vec![CellState::Free; height]; width],
        }
    }

    /// Parse a map where every line is one row (`z`) and every glyph one
    /// column (`x`).
    pub fn from_ascii(map: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(GridParseError::Empty);
        };
        let width = first.chars().count();
        let height = rows.len();
        let mut grid = GridModel::new(width, height);
        let mut seen_start = false;
        let mut seen_end = false;

        for (z, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow {
                    row: z,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let position = GridPosition::new(x as i32, z as i32);
                let state = CellState::from_glyph(glyph)
                    .ok_or(GridParseError::UnknownGlyph { glyph, position })?;
                match state {
                    CellState::Start if seen_start => {
                        return Err(GridParseError::DuplicateEndpoint(state))
                    }
                    CellState::End if seen_end => {
                        return Err(GridParseError::DuplicateEndpoint(state))
                    }
                    CellState::Start => seen_start = true,
                    CellState::End => seen_end = true,
                    _ => {}
                }
                grid.cells[x][z] = state;
            }
        }
        Ok(grid)
    }

    /// Generate a grid with `num_obstacles` randomly placed obstacles,
    /// never covering `start` or `end`.
    pub fn random<R: Rng>(
        width: usize,
        height: usize,
        num_obstacles: usize,
        start: GridPosition,
        end: GridPosition,
        rng: &mut R,
    ) -> Self {
        let mut grid = GridModel::new(width, height);
        grid.set_start(start);
        grid.set_end(end);

        let free_cells = (width * height).saturating_sub(2);
        let target = num_obstacles.min(free_cells);
        let mut placed = 0;
        let mut attempts = 0;
        while placed < target && attempts < target * 10 {
            let pos = GridPosition::new(
                rng.gen_range(0..width) as i32,
                rng.gen_range(0..height) as i32,
            );
            if grid.get(pos) == Some(CellState::Free) {
                grid.set(pos, CellState::Obstacle);
                placed += 1;
            }
            attempts += 1;
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.z >= 0 && (pos.x as usize) < self.width && (pos.z as usize) < self.height
    }

    pub fn get(&self, pos: GridPosition) -> Option<CellState> {
        if self.contains(pos) {
            Some(self.cells[pos.x as usize][pos.z as usize])
        } else {
            None
        }
    }

    /// Write a cell. Out-of-range positions are ignored and reported as `false`.
    pub fn set(&mut self, pos: GridPosition, state: CellState) -> bool {
        if !self.contains(pos) {
            return false;
        }
        self.cells[pos.x as usize][pos.z as usize] = state;
        true
    }

    pub fn is_obstacle(&self, pos: GridPosition) -> bool {
        self.get(pos) == Some(CellState::Obstacle)
    }

    /// Place the start cell, demoting any previous one to free.
    pub fn set_start(&mut self, pos: GridPosition) -> bool {
        self.place_unique(pos, CellState::Start)
    }

    /// Place the end cell, demoting any previous one to free.
    pub fn set_end(&mut self, pos: GridPosition) -> bool {
        self.place_unique(pos, CellState::End)
    }

    fn place_unique(&mut self, pos: GridPosition, state: CellState) -> bool {
        if !self.contains(pos) {
            return false;
        }
        for column in self.cells.iter_mut() {
            for cell in column.iter_mut() {
                if *cell == state {
                    *cell = CellState::Free;
                }
            }
        }
        self.set(pos, state)
    }

    /// Iterate every cell in x-major order.
    pub fn cells(&self) -> impl Iterator<Item = (GridPosition, CellState)> + '_ {
        self.cells.iter().enumerate().flat_map(|(x, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(z, &state)| (GridPosition::new(x as i32, z as i32), state))
        })
    }

    /// Locate the start and end cells, if both are present.
    pub fn find_endpoints(&self) -> Option<(GridPosition, GridPosition)> {
        let mut start = None;
        let mut end = None;
        for (pos, state) in self.cells() {
            match state {
                CellState::Start => start = Some(pos),
                CellState::End => end = Some(pos),
                _ => {}
            }
        }
        Some((start?, end?))
    }

    /// Turn visited and path marks back into free cells.
    pub fn clear_search_marks(&mut self) {
        for column in self.cells.iter_mut() {
            for cell in column.iter_mut() {
                if matches!(cell, CellState::Visited | CellState::OnPath) {
                    *cell = CellState::Free;
                }
            }
        }
    }

    /// Clear search marks and obstacles, keeping start and end.
    pub fn reset(&mut self) {
        for column in self.cells.iter_mut() {
            for cell in column.iter_mut() {
                if matches!(
                    cell,
                    CellState::Visited | CellState::OnPath | CellState::Obstacle
                ) {
                    *cell = CellState::Free;
                }
            }
        }
    }

    /// Paint a found path onto the grid, leaving start and end untouched.
    pub fn mark_path(&mut self, path: &PathResult) {
        for &pos in path.positions() {
            if let Some(state) = self.get(pos) {
                if state != CellState::Start && state != CellState::End {
                    self.set(pos, CellState::OnPath);
                }
            }
        }
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells().filter(|&(_, s)| s == state).count()
    }
}

impl FromStr for GridModel {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridModel::from_ascii(s)
    }
}

impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.cells[x][z].glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
