//! Rectangular grid of cells

use serde::Serialize;

use crate::board::Pos;
use crate::error::BoardError;
use crate::token::{Cell, Token, TokenKind};

/// Fixed-size grid, stored row-major
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a grid with every cell empty
    pub fn empty(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        })
    }

    /// Build from explicit rows (top row first)
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(BoardError::InvalidDimensions {
                rows: height,
                cols: width,
            });
        }

        let mut cells = Vec::with_capacity(height * width);
        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != width {
                return Err(BoardError::RaggedRows {
                    row,
                    len: line.len(),
                    expected: width,
                });
            }
            cells.extend(line);
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    /// Build a fully occupied grid from kinds
    pub fn from_kinds(rows: &[&[TokenKind]]) -> Result<Self, BoardError> {
        Self::from_rows(
            rows.iter()
                .map(|line| line.iter().map(|&k| Some(Token::new(k))).collect())
                .collect(),
        )
    }

    /// Parse a text board: one line per row, one symbol per cell, `.` for empty.
    /// Whitespace inside a line is ignored.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| match c {
                        '.' => Ok(None),
                        _ => c.to_string().parse::<TokenKind>().map(|k| Some(Token::new(k))),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.is_within(self.rows, self.cols)
    }

    /// Get the cell at a position (`None` when off the grid)
    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.offset(pos).map(|i| &self.cells[i])
    }

    /// Kind at a position, if occupied
    pub fn kind_at(&self, pos: Pos) -> Option<TokenKind> {
        self.get(pos).and_then(|cell| cell.as_ref()).map(|t| t.kind)
    }

    pub fn is_empty_at(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(None))
    }

    /// Iterate cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Pos::new(i / cols, i % cols), cell))
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Check that no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Replace a cell, returning the previous content
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<Cell, BoardError> {
        let i = self.checked_index(pos)?;
        Ok(std::mem::replace(&mut self.cells[i], cell))
    }

    /// Empty a cell, returning what was there
    pub fn take(&mut self, pos: Pos) -> Result<Cell, BoardError> {
        let i = self.checked_index(pos)?;
        Ok(self.cells[i].take())
    }

    /// Exchange the contents of two cells (token or empty)
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), BoardError> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    // ========================================================================
    // INDEXING
    // ========================================================================

    fn offset(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.cols + pos.col)
    }

    fn checked_index(&self, pos: Pos) -> Result<usize, BoardError> {
        self.offset(pos)
            .ok_or_else(|| BoardError::pos_out_of_bounds(pos, self.rows, self.cols))
    }
}

impl std::ops::Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Cell {
        assert!(self.contains(pos), "position {} outside grid", pos);
        &self.cells[pos.row * self.cols + pos.col]
    }
}

impl std::ops::IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Cell {
        assert!(self.contains(pos), "position {} outside grid", pos);
        &mut self.cells[pos.row * self.cols + pos.col]
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = self
                .row(row)
                .iter()
                .map(|cell| match cell {
                    Some(token) => token.kind.symbol().to_string(),
                    None => ".".to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    #[test]
    fn test_parse_and_display() {
        let grid = Grid::parse("C B K\nS . T\n").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.kind_at(Pos::new(0, 2)), Some(Bike));
        assert!(grid.is_empty_at(Pos::new(1, 1)));
        assert_eq!(grid.to_string(), "C B K\nS . T\n");
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::parse("CBK\nST").unwrap_err();
        assert_eq!(err, BoardError::RaggedRows { row: 1, len: 2, expected: 3 });
    }

    #[test]
    fn test_empty_dimensions_rejected() {
        assert!(Grid::empty(0, 6).is_err());
        assert!(Grid::empty(5, 0).is_err());
        assert!(Grid::parse("").is_err());
    }

    #[test]
    fn test_swap_is_its_own_inverse() {
        let original = Grid::from_kinds(&[&[Car, Bus, Bike], &[Train, Scooter, Car]]).unwrap();
        let mut grid = original.clone();
        let a = Pos::new(0, 0);
        let b = Pos::new(1, 0);

        grid.swap(a, b).unwrap();
        assert_eq!(grid.kind_at(a), Some(Train));
        assert_eq!(grid.kind_at(b), Some(Car));
        assert_ne!(grid, original);
        grid.swap(a, b).unwrap();
        assert_eq!(grid, original);
    }

    #[test]
    fn test_swap_moves_empty_cells() {
        let mut grid = Grid::parse("C.\n").unwrap();
        grid.swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        assert!(grid.is_empty_at(Pos::new(0, 0)));
        assert_eq!(grid.kind_at(Pos::new(0, 1)), Some(Car));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut grid = Grid::empty(2, 2).unwrap();
        assert!(grid.get(Pos::new(2, 0)).is_none());
        assert!(grid.swap(Pos::new(0, 0), Pos::new(0, 2)).is_err());
        assert!(grid.set(Pos::new(5, 5), None).is_err());
    }

    #[test]
    fn test_take_and_counts() {
        let mut grid = Grid::from_kinds(&[&[Car, Bus]]).unwrap();
        assert!(grid.is_full());
        let taken = grid.take(Pos::new(0, 1)).unwrap();
        assert_eq!(taken.map(|t| t.kind), Some(Bus));
        assert_eq!(grid.empty_count(), 1);
        assert!(!grid.is_full());
    }
}
