//! Error types for grid mutation and board generation.

use thiserror::Error;

use crate::types::Pos;

/// Errors from [`TileGrid`](crate::TileGrid) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Position lies outside `[0, width) x [0, height)`.
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Pos, width: usize, height: usize },

    /// Swap between cells that are not orthogonal neighbours.
    #[error("cells {a} and {b} are not adjacent")]
    NotAdjacent { a: Pos, b: Pos },

    /// Refill requested on a cell that still holds a tile.
    #[error("cell {pos} is already filled")]
    AlreadyFilled { pos: Pos },

    /// Read or move of a destroyed cell.
    #[error("cell {pos} is vacant")]
    Vacant { pos: Pos },

    /// Drop entry whose landing slot is still occupied.
    #[error("drop from {from} lands on occupied cell {to}")]
    InvalidDrop { from: Pos, to: Pos },

    /// Rows passed to a constructor do not form a rectangle.
    #[error("grid rows must be non-empty and of equal length")]
    Shape,
}

/// Errors from [`generate_board`](crate::generate_board).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("palette size {0} is too small (need at least 3)")]
    InvalidPalette(u8),

    #[error("a {width}x{height} board cannot hold a possible move")]
    TooSmall { width: usize, height: usize },

    /// Rejection sampling and the repair fallback both failed.
    #[error("no playable board after {attempts} attempts")]
    Exhausted { attempts: u32 },
}
