//! Move analysis - does any single adjacent swap produce a match?
//!
//! The analyzer never mutates the grid. For a candidate swap of `a` and `b`
//! it reads the board through a view in which the two types are exchanged and
//! measures the runs through `a` and `b` only. A swap can only create runs
//! that pass through one of the two swapped cells, so this is exact.
//!
//! Every neighbour read is bounds-checked; cells on the border simply have
//! fewer candidates and never fail.

use crate::grid::TileGrid;
use crate::types::{Pos, TileType, MIN_RUN};

/// True when at least one adjacent swap would create a run of three
pub fn exists_possible_move(grid: &TileGrid) -> bool {
    find_possible_move(grid).is_some()
}

/// First swap (in scan order) that would create a run of three.
///
/// Short-circuits on the first candidate found.
pub fn find_possible_move(grid: &TileGrid) -> Option<(Pos, Pos)> {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let a = Pos::new(x, y);
            for b in grid.swap_partners(a) {
                if swap_creates_match(grid, a, b) {
                    return Some((a, b));
                }
            }
        }
    }
    None
}

/// Every swap that would create a run of three, each pair listed once
pub fn all_possible_moves(grid: &TileGrid) -> Vec<(Pos, Pos)> {
    let mut out = Vec::new();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let a = Pos::new(x, y);
            for b in grid.swap_partners(a) {
                if swap_creates_match(grid, a, b) {
                    out.push((a, b));
                }
            }
        }
    }
    out
}

/// Would swapping `a` and `b` leave a run of three through either cell?
///
/// Returns `false` for out-of-bounds, non-adjacent or destroyed cells, and for
/// swaps of two equal types (which change nothing).
pub fn swap_creates_match(grid: &TileGrid, a: Pos, b: Pos) -> bool {
    if !a.is_adjacent(b) {
        return false;
    }
    let (Some(ka), Some(kb)) = (grid.kind_at(a), grid.kind_at(b)) else {
        return false;
    };
    if ka == kb {
        return false;
    }

    let view = SwappedView { grid, a, b, ka, kb };
    view.run_through(a) || view.run_through(b)
}

/// Read-only view of the grid with the contents of `a` and `b` exchanged
struct SwappedView<'a> {
    grid: &'a TileGrid,
    a: Pos,
    b: Pos,
    ka: TileType,
    kb: TileType,
}

impl SwappedView<'_> {
    #[inline]
    fn kind_at(&self, pos: Pos) -> Option<TileType> {
        if pos == self.a {
            Some(self.kb)
        } else if pos == self.b {
            Some(self.ka)
        } else {
            self.grid.kind_at(pos)
        }
    }

    /// Equal cells beyond `pos` in direction `(dx, dy)`, capped at `MIN_RUN - 1`
    fn reach(&self, pos: Pos, kind: TileType, dx: i32, dy: i32) -> usize {
        let mut n = 0;
        let mut p = pos.offset(dx, dy);
        while n < MIN_RUN - 1 && self.kind_at(p) == Some(kind) {
            n += 1;
            p = p.offset(dx, dy);
        }
        n
    }

    fn run_through(&self, pos: Pos) -> bool {
        let Some(kind) = self.kind_at(pos) else {
            return false;
        };
        let horizontal = 1 + self.reach(pos, kind, -1, 0) + self.reach(pos, kind, 1, 0);
        let vertical = 1 + self.reach(pos, kind, 0, -1) + self.reach(pos, kind, 0, 1);
        horizontal >= MIN_RUN || vertical >= MIN_RUN
    }
}
