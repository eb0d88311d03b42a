mod support;

use broadside::{
    Coord, EngineError, GameEvent, GameId, GameStatus, Match, PlayerId, PlayerRef, RematchStatus, ShotResult,
};
use rand::{rngs::SmallRng, SeedableRng};
use support::{ann, ben, fleet_cells, standard_fleet, started_match, ANN, BEN};

fn finished_match() -> Match {
    let mut game = started_match();
    for at in fleet_cells(&standard_fleet()) {
        game.shoot(ANN, at).unwrap();
    }
    assert_eq!(game.status(), GameStatus::Completed);
    game
}

#[test]
fn test_create_join_place_start() {
    let mut game: Match = Match::create(GameId(3), &ann());
    assert_eq!(game.status(), GameStatus::Waiting);
    assert_eq!(game.current_turn(), Some(ANN));

    let joined = game.join(&ben()).unwrap();
    assert!(matches!(&joined[0], GameEvent::PlayerJoined { player, .. } if player.id == BEN));
    assert_eq!(game.status(), GameStatus::Creating);
    assert!(!game.player(BEN).unwrap().is_turn);

    let third = PlayerRef {
        id: PlayerId(3),
        name: "cy".to_string(),
    };
    assert_eq!(game.join(&third).unwrap_err(), EngineError::GameFull);

    let events = game.place_fleet(BEN, &standard_fleet()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(game.status(), GameStatus::Creating);
    assert_eq!(game.shoot(ANN, Coord::new(0, 0)).unwrap_err(), EngineError::GameNotInProgress);

    let events = game.place_fleet(ANN, &standard_fleet()).unwrap();
    assert!(matches!(&events[0], GameEvent::PlayerReady { player, .. } if player.id == ANN));
    assert!(matches!(&events[1], GameEvent::GameStarted { current, .. } if current.id == ANN));
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.players().iter().filter(|p| p.is_turn).count(), 1);
}

#[test]
fn test_placing_twice_is_rejected() {
    let mut game = started_match();
    assert_eq!(game.place_fleet(ANN, &standard_fleet()).unwrap_err(), EngineError::AlreadyReady);
    let mut rng = SmallRng::seed_from_u64(1);
    assert_eq!(game.random_fleet_for(BEN, &mut rng).unwrap_err(), EngineError::AlreadyReady);
    assert_eq!(
        game.place_fleet(PlayerId(40), &standard_fleet()).unwrap_err(),
        EngineError::UnknownPlayer
    );
}

#[test]
fn test_invalid_fleet_leaves_seat_untouched() {
    let mut game: Match = Match::create(GameId(3), &ann());
    let mut ships = standard_fleet();
    ships.truncate(9);
    assert_eq!(game.place_fleet(ANN, &ships).unwrap_err(), EngineError::InvalidFleetComposition);
    let seat = game.player(ANN).unwrap();
    assert!(!seat.is_ready);
    assert!(seat.ships.is_empty());
}

#[test]
fn test_against_bot_seats_ready_bot() {
    let mut rng = SmallRng::seed_from_u64(8);
    let bot = PlayerRef {
        id: PlayerId(99),
        name: "Bot".to_string(),
    };
    let (mut game, events) = Match::<12>::against_bot(GameId(5), &ann(), &bot, &mut rng).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(game.status(), GameStatus::Creating);
    assert!(game.is_bot_match());
    let seat = game.player(PlayerId(99)).unwrap();
    assert!(seat.is_bot && seat.is_ready && !seat.is_turn);
    assert_eq!(seat.ships.len(), 10);

    game.random_fleet_for(ANN, &mut rng).unwrap();
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.current_turn(), Some(ANN));
}

#[test]
fn test_state_view_projects_both_histories() {
    let mut game = started_match();
    let mut log = Vec::new();
    log.extend(game.shoot(ANN, Coord::new(0, 0)).unwrap().moves);
    log.extend(game.shoot(ANN, Coord::new(11, 11)).unwrap().moves);
    log.extend(game.shoot(BEN, Coord::new(11, 10)).unwrap().moves);

    let view = game.state_view(ANN, &log).unwrap();
    assert_eq!(view.player.id, ANN);
    assert!(view.player.is_turn);
    assert_eq!(view.shots.player.len(), 2);
    assert_eq!(view.shots.player[0].result, ShotResult::Hit);
    assert_eq!(view.shots.enemy.len(), 1);
    assert_eq!(view.enemy.as_ref().map(|e| e.id), Some(BEN));
    assert_eq!(view.game.status, GameStatus::InProgress);
    assert!(view.winner.is_none());

    // the enemy view carries no board
    let json = serde_json::to_value(&view).unwrap();
    assert!(json["enemy"].get("board").is_none());
    assert!(json["player"]["board"].is_array());

    assert_eq!(game.state_view(PlayerId(50), &log).unwrap_err(), EngineError::UnknownPlayer);
}

#[test]
fn test_rematch_seats_winner_first() {
    let mut game = finished_match();
    let mut rng = SmallRng::seed_from_u64(2);

    assert_eq!(
        game.rematch(GameId(2), [PlayerId(10), PlayerId(11)], &mut rng).unwrap_err(),
        EngineError::RematchUnavailable
    );
    assert_eq!(game.request_rematch(BEN).unwrap(), RematchStatus::Waiting);
    assert_eq!(game.request_rematch(ANN).unwrap(), RematchStatus::Agreed);

    let (next, events) = game.rematch(GameId(2), [PlayerId(10), PlayerId(11)], &mut rng).unwrap();
    assert_eq!(next.id(), GameId(2));
    assert_eq!(next.status(), GameStatus::Creating);
    assert_eq!(next.players()[0].name, "ann");
    assert_eq!(next.current_turn(), Some(PlayerId(10)));
    assert!(next.players().iter().all(|p| !p.is_ready && p.ability_usage.total() == 0));

    match &events[0] {
        GameEvent::RematchReady { game: old, new_game, seats } => {
            assert_eq!(*old, GameId(1));
            assert_eq!(*new_game, GameId(2));
            assert_eq!(seats[0].old_player_id, ANN);
            assert_eq!(seats[0].new_player_id, PlayerId(10));
            assert!(seats[0].is_turn);
            assert_eq!(seats[1].old_player_id, BEN);
            assert!(!seats[1].is_turn);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_rematch_needs_completed_game() {
    let mut game = started_match();
    assert_eq!(game.request_rematch(ANN).unwrap_err(), EngineError::RematchUnavailable);
}

#[test]
fn test_match_bincode_roundtrip() {
    let mut game = started_match();
    game.shoot(ANN, Coord::new(0, 0)).unwrap();
    game.shoot(ANN, Coord::new(11, 11)).unwrap();

    let bytes = game.to_bytes().unwrap();
    let back: Match = Match::from_bytes(&bytes).unwrap();
    assert_eq!(back, game);
}
