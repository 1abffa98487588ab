//! Grid module - owns the W x H array of tile cells
//!
//! Uses a flat vector (row-major, `y * width + x`) for cache locality.
//! Coordinates: `(x, y)` with `x` in `0..width` (left to right) and `y` in
//! `0..height` (bottom to top). Dimensions are fixed at construction.
//!
//! Positions are fixed; contents move. A swap exchanges the tiles held by two
//! slots, a drop moves a tile down its column. A destroyed cell holds no tile
//! until it is refilled.

use arrayvec::ArrayVec;

use crate::drop::DropPlan;
use crate::error::GridError;
use crate::snapshot::BoardSnapshot;
use crate::types::{Pos, TileId, TileType};

/// One logical tile: a stable id plus its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileType,
}

/// A slot in the grid. `None` means the cell is destroyed (awaiting refill).
pub type Cell = Option<Tile>;

/// A tile relocated by [`TileGrid::apply_drop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMove {
    pub id: TileId,
    pub from: Pos,
    pub to: Pos,
}

/// The W x H board of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    next_id: u32,
}

impl TileGrid {
    /// Create a grid with every cell destroyed (ready to be filled)
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            next_id: 0,
        }
    }

    /// Build a grid from rows listed **top first**, so the literal reads like the board.
    ///
    /// ```
    /// use tile_cascade_core::TileGrid;
    /// use tile_cascade_core::types::Pos;
    ///
    /// let grid = TileGrid::from_rows(&[
    ///     &[1, 2, 3],
    ///     &[0, 1, 2],
    /// ])
    /// .unwrap();
    /// assert_eq!(grid.get(Pos::new(0, 0)), Ok(0)); // bottom-left
    /// assert_eq!(grid.get(Pos::new(2, 1)), Ok(3)); // top-right
    /// ```
    pub fn from_rows(rows: &[&[TileType]]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(GridError::Shape);
        }

        let mut grid = Self::new(width, height);
        for (row_idx, row) in rows.iter().enumerate() {
            let y = (height - 1 - row_idx) as i32;
            for (x, &kind) in row.iter().enumerate() {
                grid.refill(Pos::new(x as i32, y), kind)?;
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Flat index for `pos`, or `None` when out of bounds
    #[inline(always)]
    pub fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        Some(pos.y as usize * self.width + pos.x as usize)
    }

    /// Position of a flat index (inverse of [`index`](Self::index))
    pub fn pos_of(&self, index: usize) -> Pos {
        Pos::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    fn checked_index(&self, pos: Pos) -> Result<usize, GridError> {
        self.index(pos).ok_or(GridError::OutOfBounds {
            pos,
            width: self.width,
            height: self.height,
        })
    }

    /// Raw cell access; `None` when out of bounds
    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Tile type at `pos`, or `None` if out of bounds or destroyed.
    ///
    /// This is the lenient accessor used by the scanners.
    #[inline]
    pub fn kind_at(&self, pos: Pos) -> Option<TileType> {
        self.cell(pos).flatten().map(|t| t.kind)
    }

    /// Tile type at `pos`
    pub fn get(&self, pos: Pos) -> Result<TileType, GridError> {
        self.tile(pos).map(|t| t.kind)
    }

    /// Tile (id and type) at `pos`
    pub fn tile(&self, pos: Pos) -> Result<Tile, GridError> {
        let idx = self.checked_index(pos)?;
        self.cells[idx].ok_or(GridError::Vacant { pos })
    }

    /// Overwrite the type at `pos`.
    ///
    /// An existing tile keeps its id; a destroyed cell receives a fresh tile.
    pub fn set(&mut self, pos: Pos, kind: TileType) -> Result<(), GridError> {
        let idx = self.checked_index(pos)?;
        if let Some(tile) = self.cells[idx].as_mut() {
            tile.kind = kind;
            return Ok(());
        }
        self.refill(pos, kind).map(|_| ())
    }

    /// In-bounds cells to the right of and above `pos`.
    ///
    /// Walking these from every cell visits each adjacent pair exactly once.
    pub fn swap_partners(&self, pos: Pos) -> ArrayVec<Pos, 2> {
        let mut out = ArrayVec::new();
        for (dx, dy) in [(1, 0), (0, 1)] {
            let n = pos.offset(dx, dy);
            if self.in_bounds(n) {
                out.push(n);
            }
        }
        out
    }

    /// Exchange the contents of two adjacent cells.
    ///
    /// Returns the new positions of the tiles originally at `a` and `b`
    /// (that is, `(b, a)`). Nothing changes on error.
    pub fn swap_cells(&mut self, a: Pos, b: Pos) -> Result<(Pos, Pos), GridError> {
        if !a.is_adjacent(b) {
            return Err(GridError::NotAdjacent { a, b });
        }
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        Ok((b, a))
    }

    /// Mark every listed position destroyed, returning the tiles removed.
    ///
    /// Idempotent: already-destroyed cells contribute nothing. Bounds are
    /// checked up front so an error leaves the grid untouched.
    pub fn mark_destroyed<I>(&mut self, positions: I) -> Result<Vec<(Pos, Tile)>, GridError>
    where
        I: IntoIterator<Item = Pos>,
    {
        let positions: Vec<Pos> = positions.into_iter().collect();
        for &pos in &positions {
            self.checked_index(pos)?;
        }

        let mut removed = Vec::with_capacity(positions.len());
        for pos in positions {
            let idx = pos.y as usize * self.width + pos.x as usize;
            if let Some(tile) = self.cells[idx].take() {
                removed.push((pos, tile));
            }
        }
        Ok(removed)
    }

    pub fn is_destroyed(&self, pos: Pos) -> Result<bool, GridError> {
        let idx = self.checked_index(pos)?;
        Ok(self.cells[idx].is_none())
    }

    /// All destroyed positions, column by column, bottom to top
    pub fn destroyed_positions(&self) -> Vec<Pos> {
        let mut out = Vec::new();
        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                let pos = Pos::new(x, y);
                if self.kind_at(pos).is_none() {
                    out.push(pos);
                }
            }
        }
        out
    }

    /// Move tiles down their columns per `plan`, leaving each vacated source destroyed.
    ///
    /// Entries are applied lowest-first within each column, which makes the
    /// result independent of the plan's iteration order. The plan is fully
    /// validated before anything moves.
    pub fn apply_drop(&mut self, plan: &DropPlan) -> Result<Vec<TileMove>, GridError> {
        let mut entries: Vec<_> = plan.entries().to_vec();
        entries.sort_by_key(|e| (e.from.x, e.from.y));

        for entry in &entries {
            let to = entry.landing();
            self.checked_index(to)?;
            if self.kind_at(entry.from).is_none() {
                return Err(GridError::Vacant { pos: entry.from });
            }
        }

        let mut moves = Vec::with_capacity(entries.len());
        for entry in entries {
            let to = entry.landing();
            let src = self.checked_index(entry.from)?;
            let dst = self.checked_index(to)?;
            if self.cells[dst].is_some() {
                return Err(GridError::InvalidDrop {
                    from: entry.from,
                    to,
                });
            }
            let tile = self.cells[src].take().ok_or(GridError::Vacant { pos: entry.from })?;
            self.cells[dst] = Some(tile);
            moves.push(TileMove {
                id: tile.id,
                from: entry.from,
                to,
            });
        }
        Ok(moves)
    }

    /// Put a fresh tile of `kind` into a destroyed cell
    pub fn refill(&mut self, pos: Pos, kind: TileType) -> Result<TileId, GridError> {
        let idx = self.checked_index(pos)?;
        if self.cells[idx].is_some() {
            return Err(GridError::AlreadyFilled { pos });
        }
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.cells[idx] = Some(Tile { id, kind });
        Ok(id)
    }

    /// Current slot of the tile with `id` (linear scan)
    pub fn position_of(&self, id: TileId) -> Option<Pos> {
        self.cells
            .iter()
            .position(|c| c.map(|t| t.id) == Some(id))
            .map(|idx| self.pos_of(idx))
    }

    /// Every filled cell with its position, row-major from the bottom row
    pub fn tiles(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| cell.map(|t| (self.pos_of(idx), t)))
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Continue id allocation after `other`, so ids never repeat across regenerations
    pub fn continue_ids_from(&mut self, other: &TileGrid) {
        let offset = other.next_id;
        for tile in self.cells.iter_mut().flatten() {
            tile.id = TileId(tile.id.0.wrapping_add(offset));
        }
        self.next_id = self.next_id.wrapping_add(offset);
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.width = self.width;
        out.height = self.height;
        out.cells.clear();
        out.cells.extend(self.cells.iter().map(|c| c.map(|t| t.kind)));
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
