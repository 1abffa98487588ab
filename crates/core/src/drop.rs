//! Drop planning - how far each surviving tile falls after a clear
//!
//! For every column, walk bottom to top keeping a count of destroyed cells
//! seen so far. Each filled cell above at least one destroyed cell falls by
//! that count. Columns are independent of each other.

use crate::grid::TileGrid;
use crate::types::Pos;

/// One tile to relocate: it falls `distance` rows from `from`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEntry {
    pub from: Pos,
    pub distance: u32,
}

impl DropEntry {
    /// Slot the tile lands in
    pub fn landing(&self) -> Pos {
        self.from.offset(0, -(self.distance as i32))
    }
}

/// Fall distances for one drop phase. A value result, not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropPlan {
    entries: Vec<DropEntry>,
}

impl DropPlan {
    /// Compute the plan from the grid's current destroyed cells
    pub fn compute(grid: &TileGrid) -> Self {
        let mut entries = Vec::new();
        for x in 0..grid.width() as i32 {
            let mut gap = 0u32;
            for y in 0..grid.height() as i32 {
                let pos = Pos::new(x, y);
                if grid.kind_at(pos).is_none() {
                    gap += 1;
                } else if gap > 0 {
                    entries.push(DropEntry {
                        from: pos,
                        distance: gap,
                    });
                }
            }
        }
        Self { entries }
    }

    pub fn from_entries(entries: Vec<DropEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DropEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fall distance planned for the tile at `from`, if any
    pub fn distance_for(&self, from: Pos) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.from == from)
            .map(|e| e.distance)
    }
}
