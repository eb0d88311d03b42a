#![allow(dead_code)]

use broadside::{
    GameId, Match, Orientation, PlayerId, PlayerRef, ShipPlacement,
};

pub const ANN: PlayerId = PlayerId(1);
pub const BEN: PlayerId = PlayerId(2);

pub fn ann() -> PlayerRef {
    PlayerRef {
        id: ANN,
        name: "ann".to_string(),
    }
}

pub fn ben() -> PlayerRef {
    PlayerRef {
        id: BEN,
        name: "ben".to_string(),
    }
}

/// Valid fleet packed into rows 0..=6; rows 5 and 7..=11 stay empty.
pub fn standard_fleet() -> Vec<ShipPlacement> {
    use Orientation::Horizontal as H;
    vec![
        ShipPlacement::new(0, 0, 5, H),
        ShipPlacement::new(6, 0, 4, H),
        ShipPlacement::new(0, 2, 4, H),
        ShipPlacement::new(5, 2, 3, H),
        ShipPlacement::new(9, 2, 3, H),
        ShipPlacement::new(0, 4, 3, H),
        ShipPlacement::new(4, 4, 2, H),
        ShipPlacement::new(7, 4, 2, H),
        ShipPlacement::new(10, 4, 2, H),
        ShipPlacement::new(0, 6, 2, H),
    ]
}

/// Two seated, ready players with the standard fleet; ann starts.
pub fn started_match() -> Match {
    let mut game: Match = Match::create(GameId(1), &ann());
    game.join(&ben()).unwrap();
    game.place_fleet(ANN, &standard_fleet()).unwrap();
    game.place_fleet(BEN, &standard_fleet()).unwrap();
    game
}

/// Every cell of `ships`, for firing a fleet down.
pub fn fleet_cells(ships: &[ShipPlacement]) -> Vec<broadside::Coord> {
    ships.iter().flat_map(|s| s.cells()).collect()
}
