//! Ship span detection: the contiguous run of ship cells through a hit.

use alloc::vec;
use alloc::vec::Vec;

use crate::board::{Board, Cell, Coord};

fn is_ship_cell<const N: usize>(board: &Board<N>, x: isize, y: isize) -> bool {
    board.probe(x, y).is_some_and(Cell::is_occupied)
}

/// Collect the full span of the ship through `at`, origin first, then the
/// cells towards the low end, then towards the high end.
///
/// Orientation comes from the immediate neighbours: horizontal if either
/// side neighbour is a ship cell, else vertical if either vertical neighbour
/// is. A cell with no occupied neighbour is a span of one.
pub fn collect_ship_span<const N: usize>(board: &Board<N>, at: Coord) -> Vec<Coord> {
    let mut cells = vec![at];
    let (x, y) = (at.x as isize, at.y as isize);

    let horizontal = is_ship_cell(board, x - 1, y) || is_ship_cell(board, x + 1, y);
    let vertical = is_ship_cell(board, x, y - 1) || is_ship_cell(board, x, y + 1);

    let (dx, dy) = if horizontal {
        (1, 0)
    } else if vertical {
        (0, 1)
    } else {
        return cells;
    };

    for dir in [-1isize, 1] {
        let (mut cx, mut cy) = (x + dx * dir, y + dy * dir);
        while is_ship_cell(board, cx, cy) {
            cells.push(Coord::new(cx as usize, cy as usize));
            cx += dx * dir;
            cy += dy * dir;
        }
    }
    cells
}

/// A span is sunk once none of its cells is still an intact `Ship`.
pub fn span_is_sunk<const N: usize>(board: &Board<N>, span: &[Coord]) -> bool {
    span.iter().all(|&at| board.get(at) != Some(Cell::Ship))
}
