//! Run detection and clearing
//!
//! A run is three or more same-kind tokens in a row or column. Detection
//! slides a fixed three-cell window over every row and column; longer runs
//! are covered by overlapping windows and de-duplicated by the set.

use rustc_hash::FxHashSet;

use crate::board::Pos;
use crate::grid::Grid;

/// Minimum run length that counts as a match
pub const RUN_LENGTH: usize = 3;

/// Positions matched in one detection pass
pub type MatchSet = FxHashSet<Pos>;

/// Direction of a scan window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Positions of the window starting at `start`
    fn window(self, start: Pos) -> [Pos; RUN_LENGTH] {
        match self {
            Axis::Horizontal => [0, 1, 2].map(|i| Pos::new(start.row, start.col + i)),
            Axis::Vertical => [0, 1, 2].map(|i| Pos::new(start.row + i, start.col)),
        }
    }

    /// Every window start that fits on the grid
    fn starts(self, rows: usize, cols: usize) -> impl Iterator<Item = Pos> {
        let (row_end, col_end) = match self {
            Axis::Horizontal => (rows, (cols + 1).saturating_sub(RUN_LENGTH)),
            Axis::Vertical => ((rows + 1).saturating_sub(RUN_LENGTH), cols),
        };
        (0..row_end).flat_map(move |row| (0..col_end).map(move |col| Pos::new(row, col)))
    }
}

/// Check whether every cell in the window holds a token of one kind
fn is_run(grid: &Grid, window: &[Pos; RUN_LENGTH]) -> bool {
    let first = match grid.kind_at(window[0]) {
        Some(kind) => kind,
        None => return false,
    };
    window[1..].iter().all(|&pos| grid.kind_at(pos) == Some(first))
}

fn windows(grid: &Grid) -> impl Iterator<Item = [Pos; RUN_LENGTH]> + '_ {
    let (rows, cols) = (grid.rows(), grid.cols());
    [Axis::Horizontal, Axis::Vertical]
        .into_iter()
        .flat_map(move |axis| axis.starts(rows, cols).map(move |start| axis.window(start)))
}

/// Check if the grid contains any run, stopping at the first one
pub fn has_run(grid: &Grid) -> bool {
    windows(grid).any(|window| is_run(grid, &window))
}

/// Collect every matched position without touching the grid
pub fn find_matches(grid: &Grid) -> MatchSet {
    let mut matched = MatchSet::default();
    for window in windows(grid) {
        if is_run(grid, &window) {
            matched.extend(window);
        }
    }
    matched
}

/// Find every run, empty its cells, and return the cleared positions
pub fn detect_and_clear(grid: &mut Grid) -> MatchSet {
    let matched = find_matches(grid);
    for &pos in &matched {
        grid[pos] = None;
    }
    matched
}
