#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ability;
mod battle;
pub mod bitgrid;
mod board;
mod common;
mod config;
mod event;
mod fleet;
mod game;
mod geometry;
pub mod intel;
#[cfg(feature = "std")]
pub mod lobby;
#[cfg(feature = "std")]
mod logging;
pub mod opponent;
mod selfplay;
mod ship;
mod span;

pub use ability::*;
pub use battle::*;
pub use bitgrid::{BitGrid, BitGridError, Mask};
pub use board::*;
pub use common::*;
pub use config::*;
pub use event::*;
pub use fleet::*;
pub use game::*;
pub use geometry::{apply_ship, can_place, in_bounds};
pub use intel::{HeatMap, Intel, Segment, Sighting};
#[cfg(feature = "std")]
pub use lobby::{
    ActionOutcome, ChannelSink, EventSink, Lobby, LobbyConfig, OpenGame, RecordingSink, RematchOutcome,
};
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with, LOG_ENV};
pub use opponent::{play_bot_turn, BotTurn, Decision, HeatSeeker, Opponent};
pub use selfplay::*;
pub use ship::*;
pub use span::*;
