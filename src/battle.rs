//! Shot and ability resolution against a defender's board.
//!
//! A [`Battle`] borrows the game record and both seats for the duration of
//! one resolve call. Preconditions are checked before the first cell is
//! touched; after that every target cell is applied as one unit and the
//! created moves, events and result payload come back in a [`Resolution`]
//! for the host to persist and publish.

use alloc::vec::Vec;
use rand::Rng;

use crate::ability::{ability_targets, AbilityKind, AbilityPayload, AbilityUsage};
use crate::board::{Board, Coord, Strike};
use crate::common::{EngineError, ShotResult};
use crate::config::COMB_KILLS_REQUIRED;
use crate::event::{GameEvent, PlayerRef};
use crate::game::{GameId, GameInfo, GameStatus, PlayerId, PlayerState};
use crate::span::{collect_ship_span, span_is_sunk};

/// Append-only record of one resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub x: usize,
    pub y: usize,
    pub result: ShotResult,
}

impl Move {
    pub fn at(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotRecord {
    pub x: usize,
    pub y: usize,
    pub result: ShotResult,
}

/// A ship destroyed by the resolution, cells in span-walk order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SunkShip {
    pub size: usize,
    #[cfg_attr(feature = "std", serde(with = "crate::board::coord_pairs"))]
    pub cells: Vec<Coord>,
}

/// Result payload returned to the acting client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct BattleReport {
    pub shots: Vec<ShotRecord>,
    pub sunk: Vec<SunkShip>,
    pub game_over: bool,
    pub winner: Option<PlayerRef>,
    pub ability_usage: AbilityUsage,
    pub turn_kills: u32,
}

/// Everything one resolve call produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub report: BattleReport,
    /// New move records, in chronological order.
    pub moves: Vec<Move>,
    /// Events to publish, in emission order.
    pub events: Vec<GameEvent>,
}

/// Attacker/defender pair for a single resolution.
pub struct Battle<'a, const N: usize> {
    game: &'a mut GameInfo,
    attacker: &'a mut PlayerState<N>,
    defender: &'a mut PlayerState<N>,
}

impl<'a, const N: usize> Battle<'a, N> {
    pub fn new(
        game: &'a mut GameInfo,
        attacker: &'a mut PlayerState<N>,
        defender: &'a mut PlayerState<N>,
    ) -> Self {
        Self {
            game,
            attacker,
            defender,
        }
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.game.status != GameStatus::InProgress {
            return Err(EngineError::GameNotInProgress);
        }
        if !self.attacker.is_turn {
            return Err(EngineError::NotYourTurn);
        }
        Ok(())
    }

    /// Fire a single shot at `target`.
    ///
    /// A miss passes the turn; a hit or sink keeps it. Repeat fire on a
    /// struck cell is legal, reported as `already` and changes nothing.
    pub fn resolve_shot(&mut self, target: Coord) -> Result<Resolution, EngineError> {
        self.ensure_open()?;
        if !Board::<N>::contains(target) {
            return Err(EngineError::OutOfBounds {
                x: target.x,
                y: target.y,
            });
        }
        let mut res = Resolution::default();
        let result = self.fire_at(target, &mut res)?;
        Ok(self.conclude(result == ShotResult::Miss, res))
    }

    /// Use an ability. Any hit among its targets keeps the turn; the usage
    /// counter is consumed whatever the outcome.
    pub fn resolve_ability<R: Rng + ?Sized>(
        &mut self,
        kind: AbilityKind,
        payload: &AbilityPayload,
        rng: &mut R,
    ) -> Result<Resolution, EngineError> {
        self.ensure_open()?;
        if self.attacker.ability_usage.is_exhausted(kind) {
            return Err(EngineError::AbilityExhausted(kind));
        }
        if kind == AbilityKind::Comb && self.attacker.turn_kills < COMB_KILLS_REQUIRED {
            return Err(EngineError::AbilityLocked);
        }
        let targets = ability_targets::<N, R>(kind, payload, rng)?;
        log::debug!(
            "player {} uses {} on {} cells",
            self.attacker.id,
            kind,
            targets.len()
        );

        let mut res = Resolution::default();
        let mut any_hit = false;
        for target in targets {
            any_hit |= self.fire_at(target, &mut res)?.is_hit();
        }
        self.attacker.ability_usage.record(kind);
        Ok(self.conclude(!any_hit, res))
    }

    /// Apply one cell: classify, mutate, detect a sink, record the move and
    /// queue the events.
    fn fire_at(&mut self, target: Coord, res: &mut Resolution) -> Result<ShotResult, EngineError> {
        let strike = self.defender.board.strike(target)?;
        let mut result = match strike {
            Strike::Hit => ShotResult::Hit,
            Strike::Miss => ShotResult::Miss,
            Strike::Already => ShotResult::Already,
        };

        let mut sunk = None;
        if strike == Strike::Hit {
            let span = collect_ship_span(&self.defender.board, target);
            if span_is_sunk(&self.defender.board, &span) {
                result = ShotResult::Sunk;
                self.attacker.turn_kills += 1;
                sunk = Some(SunkShip {
                    size: span.len(),
                    cells: span,
                });
            }
        }
        log::debug!("player {} fires at {}: {}", self.attacker.id, target, result);

        res.moves.push(Move {
            game_id: self.game.id,
            player_id: self.attacker.id,
            x: target.x,
            y: target.y,
            result,
        });
        res.report.shots.push(ShotRecord {
            x: target.x,
            y: target.y,
            result,
        });
        res.events.push(GameEvent::ShotFired {
            game: self.game.id,
            player: self.attacker.to_ref(),
            x: target.x,
            y: target.y,
            result,
        });
        if let Some(ship) = sunk {
            log::info!(
                "player {} sank a ship of size {}",
                self.attacker.id,
                ship.size
            );
            res.events.push(GameEvent::ShipSunk {
                game: self.game.id,
                player: self.attacker.to_ref(),
                size: ship.size,
                cells: ship.cells.clone(),
            });
            res.report.sunk.push(ship);
        }
        Ok(result)
    }

    /// Game-over check on the final board, else the turn hand-off.
    fn conclude(&mut self, pass_turn: bool, mut res: Resolution) -> Resolution {
        if self.defender.board.is_defeated() {
            self.finish(&mut res);
        } else if pass_turn {
            self.switch_turn(&mut res);
        }
        res.report.ability_usage = self.attacker.ability_usage;
        res.report.turn_kills = self.attacker.turn_kills;
        res
    }

    fn finish(&mut self, res: &mut Resolution) {
        self.attacker.is_turn = false;
        self.defender.is_turn = false;
        self.game.status = GameStatus::Completed;
        self.game.winner = Some(self.attacker.id);

        let winner = self.attacker.to_ref();
        log::info!("game {} finished, winner {}", self.game.id, winner.name);
        res.events.push(GameEvent::GameFinished {
            game: self.game.id,
            status: self.game.status,
            winner: winner.clone(),
        });
        res.report.game_over = true;
        res.report.winner = Some(winner);
    }

    fn switch_turn(&mut self, res: &mut Resolution) {
        self.attacker.is_turn = false;
        self.attacker.turn_kills = 0;
        self.defender.is_turn = true;
        self.defender.turn_kills = 0;
        log::info!("game {}: turn passes to {}", self.game.id, self.defender.id);
        res.events.push(GameEvent::TurnChanged {
            game: self.game.id,
            next: self.defender.to_ref(),
        });
    }
}
