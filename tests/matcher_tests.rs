//! Match finding - maximal runs of three or more, merged and deduplicated

use tile_cascade::core::{find_all_matches, has_match_at, TileGrid};
use tile_cascade::types::Pos;

fn positions(list: &[(i32, i32)]) -> Vec<Pos> {
    let mut out: Vec<Pos> = list.iter().map(|&p| Pos::from(p)).collect();
    out.sort_by_key(|p| (p.y, p.x));
    out
}

#[test]
fn test_crossing_runs_are_merged() {
    // A horizontal run of four on row 2 and a vertical run of three in
    // column 2 share the cell (2, 2).
    let grid = TileGrid::from_rows(&[
        &[1, 2, 0, 3, 1, 2],
        &[3, 1, 0, 2, 3, 1],
        &[2, 0, 0, 0, 0, 3],
        &[1, 3, 2, 1, 2, 1],
        &[2, 1, 3, 2, 1, 2],
    ])
    .unwrap();

    let matches = find_all_matches(&grid);
    assert_eq!(matches.len(), 6);
    assert_eq!(
        matches.as_slice(),
        positions(&[(1, 2), (2, 2), (3, 2), (4, 2), (2, 3), (2, 4)]).as_slice()
    );
    assert!(has_match_at(&grid, Pos::new(2, 4)));
    assert!(!has_match_at(&grid, Pos::new(0, 2)));
}

#[test]
fn test_no_runs_no_matches() {
    let grid = TileGrid::from_rows(&[
        &[0, 0, 1, 1],
        &[1, 1, 0, 0],
        &[0, 0, 1, 1],
    ])
    .unwrap();
    assert!(find_all_matches(&grid).is_empty());
}

#[test]
fn test_full_row_and_full_column() {
    let grid = TileGrid::from_rows(&[
        &[4, 1, 2, 3, 0],
        &[4, 2, 3, 0, 1],
        &[4, 4, 4, 4, 4],
    ])
    .unwrap();

    let matches = find_all_matches(&grid);
    assert_eq!(matches.len(), 7);
    for x in 0..5 {
        assert!(matches.contains(Pos::new(x, 0)));
    }
    assert!(matches.contains(Pos::new(0, 1)));
    assert!(matches.contains(Pos::new(0, 2)));
}

#[test]
fn test_destroyed_cells_break_runs() {
    let mut grid = TileGrid::from_rows(&[&[1, 1, 1, 1, 1]]).unwrap();
    assert_eq!(find_all_matches(&grid).len(), 5);

    grid.mark_destroyed([Pos::new(2, 0)]).unwrap();
    assert!(find_all_matches(&grid).is_empty());

    grid.refill(Pos::new(2, 0), 1).unwrap();
    grid.mark_destroyed([Pos::new(1, 0)]).unwrap();
    let matches = find_all_matches(&grid);
    assert_eq!(matches.as_slice(), positions(&[(2, 0), (3, 0), (4, 0)]).as_slice());
}

#[test]
fn test_result_is_independent_of_layout_orientation() {
    // The same shape rotated a quarter turn finds the same number of cells.
    let wide = TileGrid::from_rows(&[
        &[2, 3, 2, 3],
        &[1, 1, 1, 0],
        &[3, 2, 1, 2],
    ])
    .unwrap();
    let tall = TileGrid::from_rows(&[
        &[3, 0, 2],
        &[2, 1, 1],
        &[3, 1, 2],
        &[2, 1, 3],
    ])
    .unwrap();
    assert_eq!(find_all_matches(&wide).len(), 3);
    assert_eq!(find_all_matches(&tall).len(), 3);
}
