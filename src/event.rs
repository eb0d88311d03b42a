//! Domain events handed to the host for publishing.
//!
//! Events carry ids, names and coordinates only, never board arrays, so
//! relaying them to both players keeps the fog of war intact.

use alloc::string::String;
use alloc::vec::Vec;

use crate::board::Coord;
use crate::common::ShotResult;
use crate::game::{GameId, GameStatus, PlayerId};

/// Public identity of a player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

/// Old-to-new seat mapping announced when a rematch starts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct RematchSeat {
    pub old_player_id: PlayerId,
    pub new_player_id: PlayerId,
    pub name: String,
    pub is_turn: bool,
}

/// Why a game was torn down before it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum AbortReason {
    OpponentLeft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(tag = "event", rename_all = "snake_case"))]
pub enum GameEvent {
    PlayerJoined {
        game: GameId,
        player: PlayerRef,
    },
    PlayerReady {
        game: GameId,
        player: PlayerRef,
    },
    GameStarted {
        game: GameId,
        current: PlayerRef,
    },
    ShotFired {
        game: GameId,
        player: PlayerRef,
        x: usize,
        y: usize,
        result: ShotResult,
    },
    ShipSunk {
        game: GameId,
        player: PlayerRef,
        size: usize,
        #[cfg_attr(feature = "std", serde(with = "crate::board::coord_pairs"))]
        cells: Vec<Coord>,
    },
    TurnChanged {
        game: GameId,
        next: PlayerRef,
    },
    GameFinished {
        game: GameId,
        status: GameStatus,
        winner: PlayerRef,
    },
    RematchReady {
        game: GameId,
        new_game: GameId,
        seats: Vec<RematchSeat>,
    },
    GameAborted {
        game: GameId,
        reason: AbortReason,
    },
}

impl GameEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::PlayerReady { .. } => "player_ready",
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::ShotFired { .. } => "shot_fired",
            GameEvent::ShipSunk { .. } => "ship_sunk",
            GameEvent::TurnChanged { .. } => "turn_changed",
            GameEvent::GameFinished { .. } => "game_finished",
            GameEvent::RematchReady { .. } => "rematch_ready",
            GameEvent::GameAborted { .. } => "game_aborted",
        }
    }

    /// Game channel the event belongs to.
    pub fn game(&self) -> GameId {
        match self {
            GameEvent::PlayerJoined { game, .. }
            | GameEvent::PlayerReady { game, .. }
            | GameEvent::GameStarted { game, .. }
            | GameEvent::ShotFired { game, .. }
            | GameEvent::ShipSunk { game, .. }
            | GameEvent::TurnChanged { game, .. }
            | GameEvent::GameFinished { game, .. }
            | GameEvent::RematchReady { game, .. }
            | GameEvent::GameAborted { game, .. } => *game,
        }
    }
}
