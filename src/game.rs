//! Match lifecycle: seating, fleet submission, start, resolution entry
//! points, state projection and rematches.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::ability::{AbilityKind, AbilityPayload, AbilityUsage};
use crate::battle::{Battle, Move, Resolution, ShotRecord};
use crate::board::{Board, Coord};
use crate::common::EngineError;
use crate::config::BOARD_SIZE;
use crate::event::{GameEvent, PlayerRef, RematchSeat};
use crate::fleet::{random_fleet, validate_fleet};
use crate::ship::ShipPlacement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct PlayerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct GameId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `waiting → creating → in_progress → completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum GameStatus {
    /// Created, waiting for a second player.
    Waiting,
    /// Both seats taken, fleets being placed.
    Creating,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameInfo {
    pub id: GameId,
    pub status: GameStatus,
    pub winner: Option<PlayerId>,
}

/// Everything the engine knows about one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState<const N: usize = BOARD_SIZE> {
    pub id: PlayerId,
    pub name: String,
    pub board: Board<N>,
    pub ships: Vec<ShipPlacement>,
    pub is_turn: bool,
    pub is_ready: bool,
    pub ability_usage: AbilityUsage,
    /// Ships sunk during the current uninterrupted turn.
    pub turn_kills: u32,
    pub wants_rematch: bool,
    pub is_bot: bool,
}

impl<const N: usize> PlayerState<N> {
    /// Fresh seat: empty board, no ships, default ability usage.
    pub fn new(player: &PlayerRef) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            board: Board::new(),
            ships: Vec::new(),
            is_turn: false,
            is_ready: false,
            ability_usage: AbilityUsage::default(),
            turn_kills: 0,
            wants_rematch: false,
            is_bot: false,
        }
    }

    pub fn to_ref(&self) -> PlayerRef {
        PlayerRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Where a rematch request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RematchStatus {
    /// No opponent seated, or the opponent has not asked yet.
    Waiting,
    /// Both players asked; [`Match::rematch`] may be called.
    Agreed,
}

/// One two-player game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Match<const N: usize = BOARD_SIZE> {
    info: GameInfo,
    /// Seats in creation order.
    seats: Vec<PlayerState<N>>,
}

impl<const N: usize> Match<N> {
    /// Open a game with its creator, who is the default starter.
    pub fn create(id: GameId, creator: &PlayerRef) -> Self {
        let mut seat = PlayerState::new(creator);
        seat.is_turn = true;
        Self {
            info: GameInfo {
                id,
                status: GameStatus::Waiting,
                winner: None,
            },
            seats: alloc::vec![seat],
        }
    }

    /// Seat `human` against a bot whose fleet is generated and ready.
    pub fn against_bot<R: Rng + ?Sized>(
        id: GameId,
        human: &PlayerRef,
        bot: &PlayerRef,
        rng: &mut R,
    ) -> Result<(Self, Vec<GameEvent>), EngineError> {
        let mut game = Self::create(id, human);
        let mut seat = PlayerState::new(bot);
        seat.is_bot = true;
        let (board, ships) = random_fleet::<N, R>(rng)?;
        seat.board = board;
        seat.ships = ships;
        seat.is_ready = true;
        game.seats.push(seat);
        game.info.status = GameStatus::Creating;
        let events = alloc::vec![GameEvent::PlayerJoined {
            game: id,
            player: bot.clone(),
        }];
        Ok((game, events))
    }

    pub fn info(&self) -> &GameInfo {
        &self.info
    }

    pub fn id(&self) -> GameId {
        self.info.id
    }

    pub fn status(&self) -> GameStatus {
        self.info.status
    }

    pub fn winner(&self) -> Option<&PlayerState<N>> {
        self.info.winner.and_then(|id| self.player(id))
    }

    pub fn players(&self) -> &[PlayerState<N>] {
        &self.seats
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState<N>> {
        self.seats.iter().find(|s| s.id == id)
    }

    pub fn opponent_of(&self, id: PlayerId) -> Option<&PlayerState<N>> {
        if self.player(id).is_none() {
            return None;
        }
        self.seats.iter().find(|s| s.id != id)
    }

    /// Holder of the turn, if any.
    pub fn current_turn(&self) -> Option<PlayerId> {
        self.seats.iter().find(|s| s.is_turn).map(|s| s.id)
    }

    pub fn is_bot_match(&self) -> bool {
        self.seats.iter().any(|s| s.is_bot)
    }

    fn seat_index(&self, id: PlayerId) -> Result<usize, EngineError> {
        self.seats
            .iter()
            .position(|s| s.id == id)
            .ok_or(EngineError::UnknownPlayer)
    }

    /// Take the second seat.
    pub fn join(&mut self, player: &PlayerRef) -> Result<Vec<GameEvent>, EngineError> {
        if self.info.status == GameStatus::Completed {
            return Err(EngineError::GameNotInProgress);
        }
        if self.seats.len() >= 2 {
            return Err(EngineError::GameFull);
        }
        if self.player(player.id).is_some() {
            return Err(EngineError::GameFull);
        }
        self.seats.push(PlayerState::new(player));
        self.info.status = GameStatus::Creating;
        log::info!("game {}: {} joined", self.info.id, player.name);
        Ok(alloc::vec![GameEvent::PlayerJoined {
            game: self.info.id,
            player: player.clone(),
        }])
    }

    /// Submit a fleet for `player`; starts the match once both are ready.
    pub fn place_fleet(
        &mut self,
        player: PlayerId,
        ships: &[ShipPlacement],
    ) -> Result<Vec<GameEvent>, EngineError> {
        let idx = self.seat_index(player)?;
        if self.seats[idx].is_ready {
            return Err(EngineError::AlreadyReady);
        }
        let board = validate_fleet::<N>(ships)?;
        Ok(self.commit_fleet(idx, board, ships.to_vec()))
    }

    /// Generate and submit a random fleet for `player`.
    pub fn random_fleet_for<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, EngineError> {
        let idx = self.seat_index(player)?;
        if self.seats[idx].is_ready {
            return Err(EngineError::AlreadyReady);
        }
        let (board, ships) = random_fleet::<N, R>(rng)?;
        Ok(self.commit_fleet(idx, board, ships))
    }

    fn commit_fleet(&mut self, idx: usize, board: Board<N>, ships: Vec<ShipPlacement>) -> Vec<GameEvent> {
        let seat = &mut self.seats[idx];
        seat.board = board;
        seat.ships = ships;
        seat.is_ready = true;
        let mut events = alloc::vec![GameEvent::PlayerReady {
            game: self.info.id,
            player: seat.to_ref(),
        }];
        self.try_start(&mut events);
        events
    }

    /// With two ready seats, make sure exactly one holds the turn (first
    /// seat by creation order otherwise) and start the match.
    fn try_start(&mut self, events: &mut Vec<GameEvent>) {
        if self.seats.len() != 2 || !self.seats.iter().all(|s| s.is_ready) {
            return;
        }
        if matches!(self.info.status, GameStatus::InProgress | GameStatus::Completed) {
            return;
        }
        if self.seats.iter().filter(|s| s.is_turn).count() != 1 {
            for seat in self.seats.iter_mut() {
                seat.is_turn = false;
            }
            self.seats[0].is_turn = true;
            self.seats[0].turn_kills = 0;
        }
        self.info.status = GameStatus::InProgress;
        if let Some(current) = self.seats.iter().find(|s| s.is_turn) {
            log::info!("game {} started, {} moves first", self.info.id, current.name);
            events.push(GameEvent::GameStarted {
                game: self.info.id,
                current: current.to_ref(),
            });
        }
    }

    /// Borrow the attacker and its opponent for one resolution.
    pub fn battle(&mut self, attacker: PlayerId) -> Result<Battle<'_, N>, EngineError> {
        let idx = self.seat_index(attacker)?;
        if self.seats.len() != 2 {
            return Err(EngineError::GameNotInProgress);
        }
        let (first, second) = self.seats.split_at_mut(1);
        let (att, def) = if idx == 0 {
            (&mut first[0], &mut second[0])
        } else {
            (&mut second[0], &mut first[0])
        };
        Ok(Battle::new(&mut self.info, att, def))
    }

    pub fn shoot(&mut self, attacker: PlayerId, target: Coord) -> Result<Resolution, EngineError> {
        self.battle(attacker)?.resolve_shot(target)
    }

    pub fn use_ability<R: Rng + ?Sized>(
        &mut self,
        attacker: PlayerId,
        kind: AbilityKind,
        payload: &AbilityPayload,
        rng: &mut R,
    ) -> Result<Resolution, EngineError> {
        self.battle(attacker)?.resolve_ability(kind, payload, rng)
    }

    /// Read-only projection for `player`. `moves` is the game's move log;
    /// entries for other games are ignored.
    pub fn state_view(&self, player: PlayerId, moves: &[Move]) -> Result<StateView<N>, EngineError> {
        let me = self.player(player).ok_or(EngineError::UnknownPlayer)?;
        let enemy = self.opponent_of(player);
        let shots_by = |id: PlayerId| -> Vec<ShotRecord> {
            moves
                .iter()
                .filter(|m| m.game_id == self.info.id && m.player_id == id)
                .map(|m| ShotRecord {
                    x: m.x,
                    y: m.y,
                    result: m.result,
                })
                .collect()
        };

        Ok(StateView {
            player: SeatView {
                id: me.id,
                name: me.name.clone(),
                board: me.board,
                is_turn: me.is_turn,
                is_ready: me.is_ready,
                ability_usage: me.ability_usage,
                turn_kills: me.turn_kills,
            },
            enemy: enemy.map(|e| EnemyView {
                id: e.id,
                name: e.name.clone(),
                is_turn: e.is_turn,
                is_ready: e.is_ready,
            }),
            shots: ShotLog {
                player: shots_by(me.id),
                enemy: enemy.map(|e| shots_by(e.id)).unwrap_or_default(),
            },
            game: self.info,
            winner: self.winner().map(PlayerState::to_ref),
        })
    }

    /// Register that `player` wants a rematch of a completed game.
    pub fn request_rematch(&mut self, player: PlayerId) -> Result<RematchStatus, EngineError> {
        if self.info.status != GameStatus::Completed {
            return Err(EngineError::RematchUnavailable);
        }
        let idx = self.seat_index(player)?;
        self.seats[idx].wants_rematch = true;
        let agreed = self.seats.len() == 2 && self.seats.iter().all(|s| s.wants_rematch || s.is_bot);
        Ok(if agreed {
            RematchStatus::Agreed
        } else {
            RematchStatus::Waiting
        })
    }

    /// Build the follow-up match once both players agreed.
    ///
    /// The winner is seated first and starts; `new_ids` are assigned in that
    /// seat order. Bots get a fresh random fleet.
    pub fn rematch<R: Rng + ?Sized>(
        &mut self,
        new_game: GameId,
        new_ids: [PlayerId; 2],
        rng: &mut R,
    ) -> Result<(Match<N>, Vec<GameEvent>), EngineError> {
        if self.info.status != GameStatus::Completed
            || self.seats.len() != 2
            || !self.seats.iter().all(|s| s.wants_rematch || s.is_bot)
        {
            return Err(EngineError::RematchUnavailable);
        }

        let mut order: Vec<&PlayerState<N>> = self.seats.iter().collect();
        if let Some(winner) = self.info.winner {
            // stable: ties keep creation order
            order.sort_by_key(|s| s.id != winner);
        }

        let mut seats = Vec::with_capacity(2);
        let mut mapping = Vec::with_capacity(2);
        for (i, (old, &new_id)) in order.iter().zip(new_ids.iter()).enumerate() {
            let mut seat = PlayerState::new(&PlayerRef {
                id: new_id,
                name: old.name.clone(),
            });
            seat.is_turn = i == 0;
            seat.is_bot = old.is_bot;
            if old.is_bot {
                let (board, ships) = random_fleet::<N, R>(rng)?;
                seat.board = board;
                seat.ships = ships;
                seat.is_ready = true;
            }
            mapping.push(RematchSeat {
                old_player_id: old.id,
                new_player_id: new_id,
                name: old.name.to_string(),
                is_turn: seat.is_turn,
            });
            seats.push(seat);
        }

        for seat in self.seats.iter_mut() {
            seat.wants_rematch = false;
        }

        let next = Match {
            info: GameInfo {
                id: new_game,
                status: GameStatus::Creating,
                winner: None,
            },
            seats,
        };
        log::info!("game {} rematched as {}", self.info.id, new_game);
        let events = alloc::vec![GameEvent::RematchReady {
            game: self.info.id,
            new_game,
            seats: mapping,
        }];
        Ok((next, events))
    }
}

#[cfg(feature = "std")]
impl<const N: usize> Match<N> {
    /// Compact binary snapshot for a host's storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// The requesting player's own seat, board included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct SeatView<const N: usize = BOARD_SIZE> {
    pub id: PlayerId,
    pub name: String,
    pub board: Board<N>,
    pub is_turn: bool,
    pub is_ready: bool,
    pub ability_usage: AbilityUsage,
    pub turn_kills: u32,
}

/// Public view of the opponent: no board.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct EnemyView {
    pub id: PlayerId,
    pub name: String,
    pub is_turn: bool,
    pub is_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotLog {
    pub player: Vec<ShotRecord>,
    pub enemy: Vec<ShotRecord>,
}

/// Projection returned by [`Match::state_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct StateView<const N: usize = BOARD_SIZE> {
    pub player: SeatView<N>,
    pub enemy: Option<EnemyView>,
    pub shots: ShotLog,
    pub game: GameInfo,
    pub winner: Option<PlayerRef>,
}
