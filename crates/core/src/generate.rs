//! Board generation - rejection sampling for a playable start
//!
//! A fresh board must have no matches and at least one possible move. Boards
//! are filled independently at random and thrown away whole until both hold.
//! After `max_attempts` rejections the last match-free sample is repaired by
//! recolouring single cells; if even that fails, generation gives up.

use tracing::{debug, warn};

use crate::error::GenerateError;
use crate::grid::TileGrid;
use crate::matcher::{find_all_matches, has_match_at};
use crate::moves::exists_possible_move;
use crate::rng::RandomSource;
use crate::types::{Pos, MIN_RUN};

/// Fill every cell of a `width x height` grid with an independent draw
pub fn fill_random<R: RandomSource + ?Sized>(
    width: usize,
    height: usize,
    palette_size: u8,
    rng: &mut R,
) -> TileGrid {
    let mut grid = TileGrid::new(width, height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            // Fresh grid: every cell is vacant and in bounds.
            let _ = grid.refill(Pos::new(x, y), rng.next(palette_size));
        }
    }
    grid
}

/// True when the board may be shown to the player
pub fn is_playable(grid: &TileGrid) -> bool {
    find_all_matches(grid).is_empty() && exists_possible_move(grid)
}

/// Generate a match-free board with at least one possible move
pub fn generate_board<R: RandomSource + ?Sized>(
    width: usize,
    height: usize,
    palette_size: u8,
    rng: &mut R,
    max_attempts: u32,
) -> Result<TileGrid, GenerateError> {
    if palette_size < 3 {
        return Err(GenerateError::InvalidPalette(palette_size));
    }
    if width.max(height) < MIN_RUN || width.min(height) < 2 {
        return Err(GenerateError::TooSmall { width, height });
    }

    let mut fallback: Option<TileGrid> = None;
    for attempt in 1..=max_attempts.max(1) {
        let grid = fill_random(width, height, palette_size, rng);
        if !find_all_matches(&grid).is_empty() {
            if fallback.is_none() {
                fallback = Some(grid);
            }
            continue;
        }
        if exists_possible_move(&grid) {
            debug!(attempt, width, height, "generated playable board");
            return Ok(grid);
        }
        // Prefer the latest match-free sample for repair.
        fallback = Some(grid);
    }

    warn!(
        attempts = max_attempts,
        "board generation hit its attempt cap, repairing last sample"
    );
    fallback
        .and_then(|grid| repair(grid, palette_size))
        .ok_or(GenerateError::Exhausted {
            attempts: max_attempts,
        })
}

/// Degraded fallback: find one cell recolouring that makes the board playable.
///
/// Matches are first broken greedily (a recolour can only create runs through
/// the recoloured cell), then single cells are recoloured until a possible
/// move appears without creating a match.
fn repair(mut grid: TileGrid, palette_size: u8) -> Option<TileGrid> {
    let positions: Vec<Pos> = grid.tiles().map(|(p, _)| p).collect();

    for &pos in &positions {
        if !has_match_at(&grid, pos) {
            continue;
        }
        for kind in 0..palette_size {
            let _ = grid.set(pos, kind);
            if !has_match_at(&grid, pos) {
                break;
            }
        }
    }
    if !find_all_matches(&grid).is_empty() {
        return None;
    }
    if exists_possible_move(&grid) {
        return Some(grid);
    }

    for &pos in &positions {
        let original = grid.get(pos).ok()?;
        for kind in 0..palette_size {
            if kind == original {
                continue;
            }
            let _ = grid.set(pos, kind);
            if is_playable(&grid) {
                return Some(grid);
            }
        }
        let _ = grid.set(pos, original);
    }
    None
}
