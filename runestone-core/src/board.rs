//! Board geometry: grid coordinates and screen-space layout

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Default number of rows
pub const DEFAULT_ROWS: usize = 5;

/// Default number of columns
pub const DEFAULT_COLS: usize = 6;

/// Default cell edge length in screen pixels
pub const DEFAULT_CELL_SIZE: u32 = 100;

/// Default screen position of the grid's top-left corner
pub const DEFAULT_ORIGIN: (i32, i32) = (50, 300);

/// Grid coordinate (row 0 is the top)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if this position lies on a `rows x cols` grid
    pub fn is_within(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// Orthogonal neighbours that lie on the grid
    pub fn neighbors(&self, rows: usize, cols: usize) -> impl Iterator<Item = Pos> {
        let Pos { row, col } = *self;
        let up = row.checked_sub(1).map(|r| Pos::new(r, col));
        let left = col.checked_sub(1).map(|c| Pos::new(row, c));
        let down = (row + 1 < rows).then(|| Pos::new(row + 1, col));
        let right = (col + 1 < cols).then(|| Pos::new(row, col + 1));
        [up, right, down, left].into_iter().flatten()
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos::new(row, col)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Screen-space point as reported by the pointer device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// Mapping between screen points and grid cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub cell_size: u32,
    pub origin_x: i32,
    pub origin_y: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            origin_x: DEFAULT_ORIGIN.0,
            origin_y: DEFAULT_ORIGIN.1,
        }
    }
}

impl Layout {
    pub const fn new(cell_size: u32, origin_x: i32, origin_y: i32) -> Self {
        Self {
            cell_size,
            origin_x,
            origin_y,
        }
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        if self.cell_size == 0 {
            return Err(BoardError::InvalidLayout);
        }
        Ok(())
    }

    /// Map a screen point to the cell under it.
    ///
    /// Uses floor division, so points left of or above the origin land on
    /// negative indices and are rejected.
    pub fn locate(&self, point: Point, rows: usize, cols: usize) -> Result<Pos, BoardError> {
        if self.cell_size == 0 {
            return Err(BoardError::InvalidLayout);
        }
        let size = i64::from(self.cell_size);
        let col = (i64::from(point.x) - i64::from(self.origin_x)).div_euclid(size);
        let row = (i64::from(point.y) - i64::from(self.origin_y)).div_euclid(size);

        if row < 0 || col < 0 || row >= rows as i64 || col >= cols as i64 {
            return Err(BoardError::out_of_bounds(row, col, rows, cols));
        }
        Ok(Pos::new(row as usize, col as usize))
    }

    /// Screen point at the centre of a cell, saturating at the edges of
    /// screen space for positions too far out to represent
    pub fn center_of(&self, pos: Pos) -> Point {
        let size = i64::from(self.cell_size);
        let axis = |origin: i32, index: usize| -> i32 {
            let index = i64::try_from(index).unwrap_or(i64::MAX);
            let coord = i64::from(origin)
                .saturating_add(index.saturating_mul(size))
                .saturating_add(size / 2);
            coord.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        Point::new(axis(self.origin_x, pos.col), axis(self.origin_y, pos.row))
    }
}
