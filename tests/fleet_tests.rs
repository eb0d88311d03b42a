mod support;

use broadside::{
    collect_ship_span, composition_matches, random_fleet, validate_fleet, Board, Cell, Coord, EngineError,
    Orientation, ShipPlacement, BOARD_SIZE, FLEET, TOTAL_SHIP_CELLS,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use support::standard_fleet;

/// Sizes of every ship on `board`, found by walking spans from their first
/// cell in row-major order.
fn ship_sizes<const N: usize>(board: &Board<N>) -> Vec<usize> {
    let mut seen = vec![false; N * N];
    let mut sizes = Vec::new();
    for (at, cell) in board.iter() {
        if cell != Cell::Ship || seen[at.y * N + at.x] {
            continue;
        }
        let span = collect_ship_span(board, at);
        for c in &span {
            seen[c.y * N + c.x] = true;
        }
        sizes.push(span.len());
    }
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

fn no_ships_touch<const N: usize>(board: &Board<N>) -> bool {
    // every ship cell may only border ship cells along its own line
    board.iter().filter(|(_, c)| *c == Cell::Ship).all(|(at, _)| {
        [(-1isize, -1isize), (1, -1), (-1, 1), (1, 1)]
            .iter()
            .all(|&(dx, dy)| board.probe(at.x as isize + dx, at.y as isize + dy) != Some(Cell::Ship))
    })
}

fn expected_sizes() -> Vec<usize> {
    let mut sizes: Vec<usize> = FLEET
        .iter()
        .flat_map(|class| std::iter::repeat(class.size()).take(class.count()))
        .collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

#[test]
fn test_standard_fleet_validates() {
    let board: Board = validate_fleet(&standard_fleet()).unwrap();
    assert_eq!(board.count(Cell::Ship), TOTAL_SHIP_CELLS);
    assert_eq!(ship_sizes(&board), expected_sizes());
}

#[test]
fn test_extra_ship_is_bad_composition() {
    let mut ships = standard_fleet();
    ships.push(ShipPlacement::new(0, 9, 2, Orientation::Horizontal));
    assert!(!composition_matches(&ships));
    assert_eq!(validate_fleet::<BOARD_SIZE>(&ships), Err(EngineError::InvalidFleetComposition));
}

#[test]
fn test_missing_or_foreign_sizes_are_bad_composition() {
    let mut ships = standard_fleet();
    ships.pop();
    assert_eq!(validate_fleet::<BOARD_SIZE>(&ships), Err(EngineError::InvalidFleetComposition));

    let mut ships = standard_fleet();
    ships[9] = ShipPlacement::new(0, 6, 6, Orientation::Horizontal);
    assert_eq!(validate_fleet::<BOARD_SIZE>(&ships), Err(EngineError::InvalidFleetComposition));
}

#[test]
fn test_overlap_is_invalid_placement() {
    let mut ships = standard_fleet();
    // the first size-4 ship now runs down through the size-5 ship
    ships[1] = ShipPlacement::new(2, 0, 4, Orientation::Vertical);
    assert_eq!(validate_fleet::<BOARD_SIZE>(&ships), Err(EngineError::InvalidPlacement));
}

#[test]
fn test_touching_and_out_of_bounds_are_invalid_placement() {
    let mut ships = standard_fleet();
    ships[9] = ShipPlacement::new(3, 5, 2, Orientation::Horizontal);
    assert_eq!(validate_fleet::<BOARD_SIZE>(&ships), Err(EngineError::InvalidPlacement));

    let mut ships = standard_fleet();
    ships[9] = ShipPlacement::new(11, 8, 2, Orientation::Horizontal);
    assert_eq!(validate_fleet::<BOARD_SIZE>(&ships), Err(EngineError::InvalidPlacement));
}

#[test]
fn test_random_fleet_gives_up_on_tiny_board() {
    let mut rng = SmallRng::seed_from_u64(7);
    let err = random_fleet::<6, _>(&mut rng).unwrap_err();
    assert!(matches!(err, EngineError::PlacementExhausted { .. }));
}

#[test]
fn test_random_fleet_is_deterministic_per_seed() {
    let a = random_fleet::<BOARD_SIZE, _>(&mut SmallRng::seed_from_u64(99)).unwrap();
    let b = random_fleet::<BOARD_SIZE, _>(&mut SmallRng::seed_from_u64(99)).unwrap();
    assert_eq!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_fleet_conserves_composition(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (board, ships) = random_fleet::<BOARD_SIZE, _>(&mut rng).unwrap();
        prop_assert_eq!(board.count(Cell::Ship), TOTAL_SHIP_CELLS);
        prop_assert_eq!(ship_sizes(&board), expected_sizes());
        prop_assert!(no_ships_touch(&board));
        // the returned list re-validates to the same board
        let again: Board = validate_fleet(&ships).unwrap();
        prop_assert_eq!(again, board);
    }

    #[test]
    fn validated_fleet_cells_match_ships(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (_, ships) = random_fleet::<BOARD_SIZE, _>(&mut rng).unwrap();
        let board: Board = validate_fleet(&ships).unwrap();
        for ship in &ships {
            for at in ship.cells() {
                prop_assert_eq!(board.get(at), Some(Cell::Ship));
            }
        }
        prop_assert_eq!(board.get(Coord::new(BOARD_SIZE, 0)), None);
    }
}
