use broadside::{apply_ship, can_place, in_bounds, Board, Cell, Coord, EngineError, Orientation, ShipPlacement, Strike};

#[test]
fn test_strike_transitions() {
    let mut board: Board = Board::new();
    apply_ship(&mut board, &ShipPlacement::new(2, 3, 2, Orientation::Vertical));

    assert_eq!(board.strike(Coord::new(2, 3)), Ok(Strike::Hit));
    assert_eq!(board.get(Coord::new(2, 3)), Some(Cell::Hit));
    assert_eq!(board.strike(Coord::new(0, 0)), Ok(Strike::Miss));
    assert_eq!(board.get(Coord::new(0, 0)), Some(Cell::Miss));

    let before = board;
    assert_eq!(board.strike(Coord::new(2, 3)), Ok(Strike::Already));
    assert_eq!(board.strike(Coord::new(0, 0)), Ok(Strike::Already));
    assert_eq!(board, before);
}

#[test]
fn test_strike_out_of_bounds() {
    let mut board: Board = Board::new();
    let err = board.strike(Coord::new(12, 0)).unwrap_err();
    assert_eq!(err, EngineError::OutOfBounds { x: 12, y: 0 });
    assert_eq!(board, Board::new());
}

#[test]
fn test_defeated_once_no_ship_left() {
    let mut board: Board = Board::new();
    let ship = ShipPlacement::new(5, 5, 3, Orientation::Horizontal);
    apply_ship(&mut board, &ship);
    assert_eq!(board.ships_afloat(), 3);
    for at in ship.cells() {
        assert!(!board.is_defeated());
        board.strike(at).unwrap();
    }
    assert!(board.is_defeated());
    assert_eq!(board.count(Cell::Hit), 3);
}

#[test]
fn test_in_bounds() {
    assert!(in_bounds::<12>(0, 0));
    assert!(in_bounds::<12>(11, 11));
    assert!(!in_bounds::<12>(-1, 0));
    assert!(!in_bounds::<12>(0, 12));
}

#[test]
fn test_can_place_rejects_bounds_overlap_and_touch() {
    let mut board: Board = Board::new();
    let ship = ShipPlacement::new(4, 4, 3, Orientation::Horizontal);
    assert!(can_place(&board, &ship));
    apply_ship(&mut board, &ship);

    // overlap
    assert!(!can_place(&board, &ShipPlacement::new(5, 3, 2, Orientation::Vertical)));
    // side and diagonal contact
    assert!(!can_place(&board, &ShipPlacement::new(7, 4, 2, Orientation::Horizontal)));
    assert!(!can_place(&board, &ShipPlacement::new(7, 5, 2, Orientation::Vertical)));
    assert!(!can_place(&board, &ShipPlacement::new(1, 3, 3, Orientation::Horizontal)));
    // off the edge
    assert!(!can_place(&board, &ShipPlacement::new(10, 0, 3, Orientation::Horizontal)));
    assert!(!can_place(&board, &ShipPlacement::new(0, 11, 2, Orientation::Vertical)));
    // one clear cell away is fine
    assert!(can_place(&board, &ShipPlacement::new(8, 4, 2, Orientation::Horizontal)));
    assert!(can_place(&board, &ShipPlacement::new(4, 6, 3, Orientation::Horizontal)));
}

#[test]
fn test_render_hides_ships_unless_revealed() {
    let mut board = Board::<4>::new();
    apply_ship(&mut board, &ShipPlacement::new(0, 0, 2, Orientation::Horizontal));
    board.strike(Coord::new(0, 0)).unwrap();
    board.strike(Coord::new(3, 3)).unwrap();

    let hidden = board.render(false).to_string();
    let shown = board.render(true).to_string();
    assert_eq!(hidden.matches(Cell::Ship.glyph(true)).count(), 0);
    assert_eq!(shown.matches(Cell::Ship.glyph(true)).count(), 1);
    assert!(hidden.contains(Cell::Hit.glyph(false)));
    assert!(hidden.contains(Cell::Miss.glyph(false)));
}

#[test]
fn test_board_json_is_nested_rows() {
    let mut board = Board::<3>::new();
    apply_ship(&mut board, &ShipPlacement::new(0, 1, 2, Orientation::Horizontal));
    board.strike(Coord::new(2, 2)).unwrap();

    let json = serde_json::to_string(&board).unwrap();
    assert_eq!(
        json,
        r#"[["empty","empty","empty"],["ship","ship","empty"],["empty","empty","miss"]]"#
    );
    let back: Board<3> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, board);

    let short = r#"[["empty","empty","empty"]]"#;
    assert!(serde_json::from_str::<Board<3>>(short).is_err());
}
