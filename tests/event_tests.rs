use broadside::{Coord, GameEvent, GameId, GameStatus, PlayerId, PlayerRef, ShotResult, SunkShip};

#[test]
fn test_event_json_has_no_board_data() {
    let event = GameEvent::ShotFired {
        game: GameId(4),
        player: PlayerRef {
            id: PlayerId(2),
            name: "ben".to_string(),
        },
        x: 3,
        y: 7,
        result: ShotResult::Sunk,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "shot_fired");
    assert_eq!(json["game"], 4);
    assert_eq!(json["player"]["id"], 2);
    assert_eq!(json["result"], "sunk");
    assert_eq!(event.name(), "shot_fired");
    assert_eq!(event.game(), GameId(4));
}

#[test]
fn test_finished_event_roundtrip() {
    let event = GameEvent::GameFinished {
        game: GameId(1),
        status: GameStatus::Completed,
        winner: PlayerRef {
            id: PlayerId(1),
            name: "ann".to_string(),
        },
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains(r#""status":"completed""#));
    let back: GameEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_sunk_cells_are_coordinate_pairs() {
    let event = GameEvent::ShipSunk {
        game: GameId(2),
        player: PlayerRef {
            id: PlayerId(1),
            name: "ann".to_string(),
        },
        size: 3,
        cells: vec![Coord::new(2, 0), Coord::new(1, 0), Coord::new(0, 0)],
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["cells"], serde_json::json!([[2, 0], [1, 0], [0, 0]]));
    let back: GameEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);

    let sunk = SunkShip {
        size: 2,
        cells: vec![Coord::new(4, 4), Coord::new(4, 5)],
    };
    let json = serde_json::to_string(&sunk).unwrap();
    assert_eq!(json, r#"{"size":2,"cells":[[4,4],[4,5]]}"#);
    assert_eq!(serde_json::from_str::<SunkShip>(&json).unwrap(), sunk);
}
