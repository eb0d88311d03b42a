mod support;

use broadside::{
    collect_ship_span, random_fleet, AbilityKind, AbilityPayload, Axis, Battle, Cell, Coord, EngineError, GameId,
    GameInfo, GameStatus, Match, PlayerState, ShotResult, BOARD_SIZE,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use support::{ann, ben, ANN, BEN};

fn seats(seed: u64) -> (GameInfo, PlayerState, PlayerState) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let info = GameInfo {
        id: GameId(1),
        status: GameStatus::InProgress,
        winner: None,
    };
    let mut att: PlayerState = PlayerState::new(&ann());
    att.is_turn = true;
    let mut def: PlayerState = PlayerState::new(&ben());
    let (board, ships) = random_fleet::<BOARD_SIZE, _>(&mut rng).unwrap();
    def.board = board;
    def.ships = ships;
    (info, att, def)
}

fn random_match(seed: u64) -> Match {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game: Match = Match::create(GameId(1), &ann());
    game.join(&ben()).unwrap();
    game.random_fleet_for(ANN, &mut rng).unwrap();
    game.random_fleet_for(BEN, &mut rng).unwrap();
    game
}

fn coord() -> impl Strategy<Value = Coord> {
    (0..BOARD_SIZE, 0..BOARD_SIZE).prop_map(|(x, y)| Coord::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn repeat_shot_is_inert(seed in any::<u64>(), at in coord()) {
        let (mut info, mut att, mut def) = seats(seed);
        let first = Battle::new(&mut info, &mut att, &mut def).resolve_shot(at).unwrap();
        prop_assert_ne!(first.report.shots[0].result, ShotResult::Already);
        let after_first = def.board;

        att.is_turn = true;
        def.is_turn = false;
        let second = Battle::new(&mut info, &mut att, &mut def).resolve_shot(at).unwrap();
        prop_assert_eq!(second.report.shots[0].result, ShotResult::Already);
        prop_assert_eq!(def.board, after_first);
    }

    #[test]
    fn sunk_iff_whole_span_hit(seed in any::<u64>(), shots in prop::collection::vec(coord(), 1..200)) {
        let (mut info, mut att, mut def) = seats(seed);
        for at in shots {
            if info.status != GameStatus::InProgress {
                break;
            }
            att.is_turn = true;
            def.is_turn = false;
            let res = Battle::new(&mut info, &mut att, &mut def).resolve_shot(at).unwrap();
            let result = res.report.shots[0].result;
            if result.is_hit() {
                let span = collect_ship_span(&def.board, at);
                let intact = span.iter().any(|&c| def.board.get(c) == Some(Cell::Ship));
                prop_assert_eq!(result == ShotResult::Sunk, !intact);
            }
            for ship in &res.report.sunk {
                for &c in &ship.cells {
                    prop_assert_eq!(def.board.get(c), Some(Cell::Hit));
                }
            }
        }
    }

    #[test]
    fn exactly_one_turn_holder(seed in any::<u64>(), shots in prop::collection::vec(coord(), 1..300)) {
        let mut game = random_match(seed);
        for at in shots {
            if game.status() != GameStatus::InProgress {
                prop_assert_eq!(game.current_turn(), None);
                break;
            }
            prop_assert_eq!(game.players().iter().filter(|p| p.is_turn).count(), 1);
            let shooter = game.current_turn().unwrap();
            let res = game.shoot(shooter, at).unwrap();
            if res.report.game_over {
                continue;
            }
            match res.report.shots[0].result {
                ShotResult::Miss => prop_assert_ne!(game.current_turn(), Some(shooter)),
                _ => prop_assert_eq!(game.current_turn(), Some(shooter)),
            }
        }
    }

    #[test]
    fn ability_limits_hold(seed in any::<u64>(), attempts in prop::collection::vec(0u8..4, 1..40)) {
        let mut game = random_match(seed);
        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
        for pick in attempts {
            if game.status() != GameStatus::InProgress {
                break;
            }
            let shooter = game.current_turn().unwrap();
            let me = game.player(shooter).unwrap().clone();
            let (kind, payload) = match pick {
                0 => (AbilityKind::Plane, AbilityPayload::plane(Axis::Row, rng.random_range(0..12))),
                1 => (AbilityKind::Splatter, AbilityPayload::default()),
                2 => (
                    AbilityKind::Comb,
                    AbilityPayload::comb(Coord::new(rng.random_range(0..12), rng.random_range(0..12))),
                ),
                _ => {
                    let at = Coord::new(rng.random_range(0..12), rng.random_range(0..12));
                    game.shoot(shooter, at).unwrap();
                    continue;
                }
            };
            match game.use_ability(shooter, kind, &payload, &mut rng) {
                Ok(_) => {
                    prop_assert!(me.ability_usage.used(kind) < kind.limit());
                    if kind == AbilityKind::Comb {
                        prop_assert!(me.turn_kills >= 2);
                    }
                }
                Err(EngineError::AbilityExhausted(k)) => {
                    prop_assert_eq!(k, kind);
                    prop_assert_eq!(me.ability_usage.used(kind), kind.limit());
                }
                Err(EngineError::AbilityLocked) => prop_assert!(me.turn_kills < 2),
                Err(e) => prop_assert!(false, "unexpected error {:?}", e),
            }
            for p in game.players() {
                for k in AbilityKind::ALL {
                    prop_assert!(p.ability_usage.used(k) <= k.limit());
                }
            }
        }
    }
}
