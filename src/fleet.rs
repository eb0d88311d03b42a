//! Fleet validation and random fleet generation.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::Board;
use crate::common::EngineError;
use crate::config::{required_count, FLEET, FLEET_LENGTHS, NUM_SHIPS, PLACEMENT_ATTEMPTS};
use crate::geometry::{apply_ship, can_place};
use crate::ship::{Orientation, ShipPlacement};

/// `true` iff the multiset of submitted sizes equals the required fleet.
pub fn composition_matches(ships: &[ShipPlacement]) -> bool {
    if ships.len() != NUM_SHIPS {
        return false;
    }
    if ships.iter().any(|s| required_count(s.size) == 0) {
        return false;
    }
    FLEET
        .iter()
        .all(|class| ships.iter().filter(|s| s.size == class.size()).count() == class.count())
}

/// Validate a submitted fleet and build its board.
///
/// Composition is checked first, then ships are placed in submission
/// order. The first invalid placement fails the whole fleet; no partial
/// board escapes.
pub fn validate_fleet<const N: usize>(ships: &[ShipPlacement]) -> Result<Board<N>, EngineError> {
    if !composition_matches(ships) {
        return Err(EngineError::InvalidFleetComposition);
    }
    let mut board = Board::<N>::new();
    for ship in ships {
        if !can_place(&board, ship) {
            log::debug!("rejecting fleet at {:?}", ship);
            return Err(EngineError::InvalidPlacement);
        }
        apply_ship(&mut board, ship);
    }
    Ok(board)
}

/// Generate a random valid fleet, largest ships first.
///
/// Each ship samples uniformly random `(x, y, orientation)` triples until one
/// fits, for at most [`PLACEMENT_ATTEMPTS`] samples. Running out is a bug
/// signal rather than an expected error path.
pub fn random_fleet<const N: usize, R: Rng + ?Sized>(
    rng: &mut R,
) -> Result<(Board<N>, Vec<ShipPlacement>), EngineError> {
    let mut board = Board::<N>::new();
    let mut ships = Vec::with_capacity(NUM_SHIPS);

    'ships: for &size in FLEET_LENGTHS.iter() {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let x = rng.random_range(0..N);
            let y = rng.random_range(0..N);
            let ship = ShipPlacement::new(x, y, size, orientation);
            if can_place(&board, &ship) {
                apply_ship(&mut board, &ship);
                ships.push(ship);
                continue 'ships;
            }
        }
        log::error!(
            "random fleet gave up on a size {} ship after {} attempts ({} placed)",
            size,
            PLACEMENT_ATTEMPTS,
            ships.len()
        );
        return Err(EngineError::PlacementExhausted { size });
    }
    Ok((board, ships))
}
