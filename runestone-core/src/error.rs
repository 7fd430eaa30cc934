//! Error types for board construction and input mapping

use crate::board::Pos;

/// Error types for the board engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Coordinate ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Invalid layout: cell size must be positive")]
    InvalidLayout,

    #[error("Row {row} has {len} cells, expected {expected}")]
    RaggedRows { row: usize, len: usize, expected: usize },

    #[error("Unknown token kind: {0}")]
    UnknownTokenKind(String),
}

impl BoardError {
    pub(crate) fn out_of_bounds(row: i64, col: i64, rows: usize, cols: usize) -> Self {
        BoardError::OutOfBounds { row, col, rows, cols }
    }

    /// Out-of-bounds error for an unsigned position
    pub(crate) fn pos_out_of_bounds(pos: Pos, rows: usize, cols: usize) -> Self {
        Self::out_of_bounds(pos.row as i64, pos.col as i64, rows, cols)
    }
}
