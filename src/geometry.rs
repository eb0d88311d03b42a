//! Bounds, overlap and no-touch checks for ship placement.

use crate::board::{Board, Cell};
use crate::ship::ShipPlacement;

/// Offsets of the 8-neighbourhood plus the cell itself.
pub(crate) const NEIGHBOURHOOD: [(isize, isize); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// `true` iff `0 ≤ x, y < N`.
pub fn in_bounds<const N: usize>(x: isize, y: isize) -> bool {
    Board::<N>::in_bounds(x, y)
}

/// Check that every cell of `ship` is on the board, empty, and has no
/// occupied ship cell among its 8 neighbours. No side effects.
pub fn can_place<const N: usize>(board: &Board<N>, ship: &ShipPlacement) -> bool {
    ship.cells().all(|at| {
        if !Board::<N>::contains(at) || board.get(at) != Some(Cell::Empty) {
            return false;
        }
        let (x, y) = (at.x as isize, at.y as isize);
        NEIGHBOURHOOD.iter().all(|&(dx, dy)| {
            !board
                .probe(x + dx, y + dy)
                .is_some_and(Cell::is_occupied)
        })
    })
}

/// Mark the cells of `ship` as `Ship`.
///
/// Callers must have confirmed [`can_place`] first; nothing is re-validated here.
pub fn apply_ship<const N: usize>(board: &mut Board<N>, ship: &ShipPlacement) {
    debug_assert!(can_place(board, ship), "apply_ship without can_place: {:?}", ship);
    for at in ship.cells() {
        board.mark_ship(at);
    }
}
