//! Match finding - runs of three or more equal tiles
//!
//! Each row is scanned left to right and each column bottom to top. A scan
//! finds the end of the current run, records it if long enough, and jumps
//! straight past it, so every cell is inspected once per axis. Members are
//! collected in a per-cell mark table, which merges overlapping horizontal
//! and vertical runs without a set.

use crate::grid::TileGrid;
use crate::types::{Pos, MIN_RUN};

/// Deduplicated set of matched positions from one detection pass.
///
/// Positions are kept in grid order (row-major from the bottom row), so two
/// passes over equal grids compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    positions: Vec<Pos>,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.positions.binary_search_by_key(&(pos.y, pos.x), |p| (p.y, p.x)).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions.iter().copied()
    }

    pub fn as_slice(&self) -> &[Pos] {
        &self.positions
    }
}

impl IntoIterator for MatchSet {
    type Item = Pos;
    type IntoIter = std::vec::IntoIter<Pos>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.into_iter()
    }
}

/// Union of all maximal same-type runs of length >= 3 on both axes
pub fn find_all_matches(grid: &TileGrid) -> MatchSet {
    let (width, height) = grid.size();
    let mut marked = vec![false; width * height];

    // Horizontal runs
    for y in 0..height {
        scan_line(grid, width, |i| Pos::new(i as i32, y as i32), &mut marked);
    }

    // Vertical runs
    for x in 0..width {
        scan_line(grid, height, |i| Pos::new(x as i32, i as i32), &mut marked);
    }

    let positions = marked
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m)
        .map(|(idx, _)| grid.pos_of(idx))
        .collect();
    MatchSet { positions }
}

/// Scan one line of `len` cells, marking members of runs >= `MIN_RUN`
fn scan_line<F>(grid: &TileGrid, len: usize, at: F, marked: &mut [bool])
where
    F: Fn(usize) -> Pos,
{
    let mut start = 0;
    while start < len {
        let Some(kind) = grid.kind_at(at(start)) else {
            start += 1;
            continue;
        };

        let mut end = start + 1;
        while end < len && grid.kind_at(at(end)) == Some(kind) {
            end += 1;
        }

        if end - start >= MIN_RUN {
            for i in start..end {
                if let Some(idx) = grid.index(at(i)) {
                    marked[idx] = true;
                }
            }
        }

        start = end;
    }
}

/// True when the run through `pos` along either axis reaches `MIN_RUN`.
///
/// Used for point queries where a full scan would be wasteful.
pub fn has_match_at(grid: &TileGrid, pos: Pos) -> bool {
    let Some(kind) = grid.kind_at(pos) else {
        return false;
    };
    let count = |dx: i32, dy: i32| {
        let mut n = 0;
        let mut p = pos.offset(dx, dy);
        while grid.kind_at(p) == Some(kind) {
            n += 1;
            p = p.offset(dx, dy);
        }
        n
    };
    1 + count(-1, 0) + count(1, 0) >= MIN_RUN || 1 + count(0, -1) + count(0, 1) >= MIN_RUN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matches_on_checkerboard() {
        let grid = TileGrid::from_rows(&[
            &[0, 1, 0, 1],
            &[1, 0, 1, 0],
            &[0, 1, 0, 1],
        ])
        .unwrap();
        assert!(find_all_matches(&grid).is_empty());
    }

    #[test]
    fn test_horizontal_run_of_three() {
        let grid = TileGrid::from_rows(&[
            &[0, 1, 0, 1],
            &[2, 2, 2, 0],
            &[0, 1, 0, 1],
        ])
        .unwrap();
        let m = find_all_matches(&grid);
        assert_eq!(m.len(), 3);
        for x in 0..3 {
            assert!(m.contains(Pos::new(x, 1)));
        }
        assert!(!m.contains(Pos::new(3, 1)));
    }

    #[test]
    fn test_run_of_two_is_not_a_match() {
        let grid = TileGrid::from_rows(&[&[3, 3, 1], &[1, 2, 3]]).unwrap();
        assert!(find_all_matches(&grid).is_empty());
    }

    #[test]
    fn test_whole_row_run() {
        let grid = TileGrid::from_rows(&[&[4, 4, 4, 4, 4], &[0, 1, 2, 3, 0]]).unwrap();
        assert_eq!(find_all_matches(&grid).len(), 5);
    }

    #[test]
    fn test_destroyed_cells_break_runs() {
        let mut grid = TileGrid::from_rows(&[&[1, 1, 1, 1]]).unwrap();
        grid.mark_destroyed([Pos::new(1, 0)]).unwrap();
        assert!(find_all_matches(&grid).is_empty());
    }

    #[test]
    fn test_has_match_at() {
        let grid = TileGrid::from_rows(&[
            &[0, 3, 1],
            &[2, 3, 0],
            &[1, 3, 2],
        ])
        .unwrap();
        assert!(has_match_at(&grid, Pos::new(1, 0)));
        assert!(has_match_at(&grid, Pos::new(1, 2)));
        assert!(!has_match_at(&grid, Pos::new(0, 0)));
    }
}
