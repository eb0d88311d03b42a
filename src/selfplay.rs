//! Bot-versus-bot games played entirely in memory.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::ability::AbilityUsage;
use crate::battle::Move;
use crate::common::{EngineError, ShotResult};
use crate::config::BOT_ACTION_CAP;
use crate::event::PlayerRef;
use crate::game::{GameId, GameStatus, Match, PlayerId};
use crate::opponent::{play_bot_turn, Opponent};

/// Per-seat statistics of a finished duel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct DuelSeat {
    pub name: String,
    pub shots: usize,
    pub hits: usize,
    pub sunk: usize,
    pub ability_usage: AbilityUsage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct DuelSummary {
    pub game: GameId,
    pub winner: Option<String>,
    /// Bot turn invocations until the game ended.
    pub turns: usize,
    pub seats: Vec<DuelSeat>,
    /// A bot ran out of decisions before the game ended.
    pub stalled: bool,
}

/// Play `alpha` (first seat, starts) against `bravo` until one fleet is
/// gone or a bot stalls.
pub fn play_duel<const N: usize, A, B>(
    game_id: GameId,
    alpha: &mut A,
    bravo: &mut B,
    rng: &mut SmallRng,
) -> Result<DuelSummary, EngineError>
where
    A: Opponent<N> + ?Sized,
    B: Opponent<N> + ?Sized,
{
    let a = PlayerRef {
        id: PlayerId(1),
        name: "alpha".to_string(),
    };
    let b = PlayerRef {
        id: PlayerId(2),
        name: "bravo".to_string(),
    };

    let mut game = Match::<N>::create(game_id, &a);
    game.join(&b)?;
    let (_, ships) = alpha.place_fleet(rng)?;
    game.place_fleet(a.id, &ships)?;
    let (_, ships) = bravo.place_fleet(rng)?;
    game.place_fleet(b.id, &ships)?;

    let mut moves: Vec<Move> = Vec::new();
    let mut turns = 0;
    let mut stalled = false;

    while game.status() == GameStatus::InProgress {
        let Some(current) = game.current_turn() else {
            break;
        };
        turns += 1;
        let turn = if current == a.id {
            play_bot_turn(&mut game, current, &moves, alpha, rng, BOT_ACTION_CAP)?
        } else {
            play_bot_turn(&mut game, current, &moves, bravo, rng, BOT_ACTION_CAP)?
        };
        match turn {
            Some(turn) => moves.extend(turn.moves),
            None => {
                log::warn!("duel {}: {} stalled", game_id, current);
                stalled = true;
                break;
            }
        }
    }

    let seats = game
        .players()
        .iter()
        .map(|p| {
            let mut seat = DuelSeat {
                name: p.name.clone(),
                shots: 0,
                hits: 0,
                sunk: 0,
                ability_usage: p.ability_usage,
            };
            for m in moves.iter().filter(|m| m.player_id == p.id) {
                seat.shots += 1;
                seat.hits += usize::from(m.result.is_hit());
                seat.sunk += usize::from(m.result == ShotResult::Sunk);
            }
            seat
        })
        .collect();

    Ok(DuelSummary {
        game: game_id,
        winner: game.winner().map(|w| w.name.clone()),
        turns,
        seats,
        stalled,
    })
}
