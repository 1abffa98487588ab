use serde::Serialize;

use crate::types::{Pos, TileType};

/// Plain copy of the board's tile types, row-major from the bottom row.
///
/// `None` marks a destroyed cell. Tile ids are deliberately left out so two
/// boards with the same layout compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Option<TileType>>,
}

impl BoardSnapshot {
    pub fn get(&self, pos: Pos) -> Option<TileType> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        self.cells
            .get(pos.y as usize * self.width + pos.x as usize)
            .copied()
            .flatten()
    }

    /// Rows top first, `.` for destroyed cells (for logs and test failure output)
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width * 2 + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                if x > 0 {
                    out.push(' ');
                }
                match self.cells.get(y * self.width + x).copied().flatten() {
                    Some(kind) => out.push_str(&kind.to_string()),
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::TileGrid;

    use super::*;

    #[test]
    fn snapshot_reads_like_from_rows() {
        let mut grid = TileGrid::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        grid.mark_destroyed([Pos::new(1, 1)]).unwrap();
        let snap = grid.snapshot();
        assert_eq!(snap.to_text(), "1 .\n3 4\n");
        assert_eq!(snap.get(Pos::new(0, 0)), Some(3));
        assert_eq!(snap.get(Pos::new(1, 1)), None);
        assert_eq!(snap.get(Pos::new(2, 0)), None);
    }

    #[test]
    fn short_cells_read_as_destroyed() {
        let snap = BoardSnapshot {
            width: 2,
            height: 2,
            cells: vec![Some(5)],
        };
        assert_eq!(snap.get(Pos::new(0, 0)), Some(5));
        assert_eq!(snap.get(Pos::new(1, 1)), None);
        assert_eq!(snap.to_text(), ". .\n5 .\n");
    }
}
