//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the board engine.
//! All types are plain data with no behavior beyond small helpers, making them
//! usable in any context (core logic, cascade engine, host view layer).
//!
//! # Coordinates
//!
//! Positions are `(x, y)` with `x` growing to the right and `y` growing **up**:
//!
//! - `y = 0` is the bottom row; tiles fall toward it
//! - `y = height - 1` is the top row; refills enter from above it
//! - Positions are signed so callers can describe off-board spawn points
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 8 | Columns |
//! | `DEFAULT_HEIGHT` | 8 | Rows |
//! | `DEFAULT_PALETTE_SIZE` | 6 | Distinct tile types |
//! | `DEFAULT_TILE_RATIO` | 10 | Points per matched tile |
//! | `DEFAULT_COMBO_RATIO` | 1 | Combo multiplier weight |
//! | `DEFAULT_DEADLOCK_WAIT_MS` | 3000 | Wait before reshuffling a deadlocked board |
//! | `DEFAULT_ROUND_DURATION_MS` | 60000 | Length of one timed round |
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//!
//! # Examples
//!
//! ```
//! use tile_cascade_types::{CascadeState, Pos};
//!
//! let a = Pos::new(2, 2);
//! let b = Pos::new(2, 3);
//! assert!(a.is_adjacent(b));
//! assert!(!a.is_adjacent(Pos::new(3, 3)));
//!
//! assert!(CascadeState::Idle.is_idle());
//! assert_eq!(CascadeState::Clearing.as_str(), "clearing");
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_WIDTH: usize = 8;

/// Default board height in cells
pub const DEFAULT_HEIGHT: usize = 8;

/// Default number of distinct tile types
pub const DEFAULT_PALETTE_SIZE: u8 = 6;

/// Points awarded per matched tile (before combo weighting)
pub const DEFAULT_TILE_RATIO: u32 = 10;

/// Weight applied to the combo index
pub const DEFAULT_COMBO_RATIO: u32 = 1;

/// Wait before a deadlocked board is regenerated (3s)
pub const DEFAULT_DEADLOCK_WAIT_MS: u32 = 3_000;

/// Length of one timed round (60s)
pub const DEFAULT_ROUND_DURATION_MS: u32 = 60_000;

/// Rejection-sampling attempts before board generation falls back to repair
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 10_000;

/// Shortest run of equal tiles that counts as a match
pub const MIN_RUN: usize = 3;

/// A tile type drawn from a palette of `palette_size` values (`0..palette_size`).
///
/// Equality is the only meaningful relation between tile types.
pub type TileType = u8;

/// Stable identifier of one logical tile.
///
/// Ids follow the tile's content as it swaps and falls, so the view layer can
/// correlate animation requests with the sprite it already shows. Refilled
/// tiles always get fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A grid position (`y` grows upward, see module docs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by `(dx, dy)`
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True when `other` differs by exactly one unit on exactly one axis
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_cascade_types::Pos;
    ///
    /// let p = Pos::new(1, 1);
    /// assert!(p.is_adjacent(Pos::new(1, 0)));
    /// assert!(p.is_adjacent(Pos::new(2, 1)));
    /// assert!(!p.is_adjacent(Pos::new(2, 2))); // diagonal
    /// assert!(!p.is_adjacent(Pos::new(1, 3))); // two rows away
    /// assert!(!p.is_adjacent(p));
    /// ```
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx + dy == 1
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Phases of the cascade state machine
///
/// The cycle is
/// `Idle -> Swapping -> Matching -> Clearing -> Dropping -> Refilling -> Repositioning -> Matching`
/// and `Matching` returns to `Idle` once a pass finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CascadeState {
    Idle,
    Swapping,
    Matching,
    Clearing,
    Dropping,
    Refilling,
    Repositioning,
}

impl CascadeState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CascadeState::Idle)
    }

    /// Lowercase name (used in logs and demo output)
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeState::Idle => "idle",
            CascadeState::Swapping => "swapping",
            CascadeState::Matching => "matching",
            CascadeState::Clearing => "clearing",
            CascadeState::Dropping => "dropping",
            CascadeState::Refilling => "refilling",
            CascadeState::Repositioning => "repositioning",
        }
    }
}

impl std::fmt::Display for CascadeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_symmetric_and_axis_aligned() {
        let p = Pos::new(3, 3);
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let q = p.offset(dx, dy);
            assert!(p.is_adjacent(q));
            assert!(q.is_adjacent(p));
        }
        for (dx, dy) in [(1, 1), (-1, 1), (2, 0), (0, -2), (0, 0)] {
            assert!(!p.is_adjacent(p.offset(dx, dy)), "({dx}, {dy})");
        }
    }

    #[test]
    fn default_constants() {
        assert_eq!(MIN_RUN, 3);
        assert_eq!(DEFAULT_DEADLOCK_WAIT_MS, 3_000);
        assert!(DEFAULT_PALETTE_SIZE >= 3);
    }
}
