//! Grid tests - bounds, adjacency, destroy marks, drops and refills

use tile_cascade::core::{DropPlan, GridError, TileGrid};
use tile_cascade::types::Pos;

fn board() -> TileGrid {
    TileGrid::from_rows(&[
        &[0, 1, 2, 3],
        &[1, 2, 3, 0],
        &[2, 3, 0, 1],
    ])
    .unwrap()
}

#[test]
fn test_get_and_set_are_bounds_checked() {
    let mut grid = board();
    assert_eq!(grid.size(), (4, 3));

    for pos in [Pos::new(-1, 0), Pos::new(0, -1), Pos::new(4, 0), Pos::new(0, 3)] {
        assert!(matches!(grid.get(pos), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(grid.set(pos, 1), Err(GridError::OutOfBounds { .. })));
    }

    let id = grid.tile(Pos::new(1, 1)).unwrap().id;
    grid.set(Pos::new(1, 1), 3).unwrap();
    assert_eq!(grid.get(Pos::new(1, 1)), Ok(3));
    assert_eq!(grid.tile(Pos::new(1, 1)).unwrap().id, id);
}

#[test]
fn test_swap_requires_orthogonal_neighbours() {
    let mut grid = board();
    let before = grid.snapshot();
    let a = Pos::new(1, 1);

    for b in [
        Pos::new(2, 2), // diagonal
        Pos::new(3, 1), // two columns away
        Pos::new(1, 1), // itself
    ] {
        assert_eq!(grid.swap_cells(a, b), Err(GridError::NotAdjacent { a, b }));
    }
    assert!(matches!(
        grid.swap_cells(Pos::new(3, 2), Pos::new(4, 2)),
        Err(GridError::OutOfBounds { .. })
    ));
    // Distance decides first, even when a cell is off the board.
    let far = Pos::new(9, 9);
    assert_eq!(
        grid.swap_cells(Pos::new(0, 0), far),
        Err(GridError::NotAdjacent { a: Pos::new(0, 0), b: far })
    );
    assert_eq!(grid.snapshot(), before);

    let b = Pos::new(1, 2);
    let (ka, kb) = (grid.get(a).unwrap(), grid.get(b).unwrap());
    assert_eq!(grid.swap_cells(a, b), Ok((b, a)));
    assert_eq!(grid.get(a), Ok(kb));
    assert_eq!(grid.get(b), Ok(ka));
}

#[test]
fn test_clear_drop_refill_cycle() {
    let mut grid = board();
    // Clear the middle row.
    let row: Vec<Pos> = (0..4).map(|x| Pos::new(x, 1)).collect();
    let removed = grid.mark_destroyed(row.iter().copied()).unwrap();
    assert_eq!(removed.len(), 4);
    assert!(row.iter().all(|&p| grid.is_destroyed(p) == Ok(true)));

    let top_ids: Vec<_> = (0..4).map(|x| grid.tile(Pos::new(x, 2)).unwrap().id).collect();
    let plan = DropPlan::compute(&grid);
    assert_eq!(plan.len(), 4);
    assert!(plan.entries().iter().all(|e| e.distance == 1));

    let moves = grid.apply_drop(&plan).unwrap();
    assert_eq!(moves.len(), 4);
    for x in 0..4 {
        assert_eq!(grid.tile(Pos::new(x, 1)).unwrap().id, top_ids[x as usize]);
        assert_eq!(grid.is_destroyed(Pos::new(x, 2)), Ok(true));
    }

    let empty = grid.destroyed_positions();
    assert_eq!(empty, (0..4).map(|x| Pos::new(x, 2)).collect::<Vec<_>>());
    for pos in empty {
        grid.refill(pos, 1).unwrap();
    }
    assert!(grid.destroyed_positions().is_empty());
    assert_eq!(
        grid.refill(Pos::new(0, 2), 2),
        Err(GridError::AlreadyFilled { pos: Pos::new(0, 2) })
    );
}

#[test]
fn test_snapshot_text_is_top_first() {
    let mut grid = board();
    grid.mark_destroyed([Pos::new(0, 2)]).unwrap();
    assert_eq!(grid.snapshot().to_text(), ". 1 2 3\n1 2 3 0\n2 3 0 1\n");
}
