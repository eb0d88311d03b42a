#![cfg(feature = "std")]

//! In-process game host: one exclusive lock per game, an append-only move
//! log per room, event fan-out through an [`EventSink`], and automatic bot
//! turns in bot matches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, Mutex};

use crate::ability::{AbilityKind, AbilityPayload};
use crate::battle::{BattleReport, Move, Resolution};
use crate::board::Coord;
use crate::config::{BOARD_SIZE, BOT_ACTION_CAP};
use crate::common::EngineError;
use crate::event::{AbortReason, GameEvent, PlayerRef, RematchSeat};
use crate::game::{GameId, GameStatus, Match, PlayerId, RematchStatus, StateView};
use crate::opponent::{play_bot_turn, BotTurn, HeatSeeker};
use crate::ship::ShipPlacement;

/// Destination for domain events.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &GameEvent) -> anyhow::Result<()>;
}

/// Fans events out on a broadcast channel.
pub struct ChannelSink {
    tx: broadcast::Sender<GameEvent>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }
}

#[async_trait::async_trait]
impl EventSink for ChannelSink {
    async fn publish(&self, event: &GameEvent) -> anyhow::Result<()> {
        // no subscribers is not an error
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}

/// Keeps every published event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far.
    pub async fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait::async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, event: &GameEvent) -> anyhow::Result<()> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LobbyConfig {
    /// Most bot actions taken after a single human action.
    pub bot_action_cap: usize,
    /// Seed for room RNGs; each room mixes in its game id.
    pub seed: Option<u64>,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            bot_action_cap: BOT_ACTION_CAP,
            seed: None,
        }
    }
}

/// State guarded by one game's lock.
pub struct Room {
    game: Match<BOARD_SIZE>,
    moves: Vec<Move>,
    rng: SmallRng,
}

impl Room {
    pub fn game(&self) -> &Match<BOARD_SIZE> {
        &self.game
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }
}

/// What a shot or ability produced, including any bot reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub report: BattleReport,
    pub bot: Option<BotTurn>,
}

/// Result of a rematch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RematchOutcome {
    Waiting,
    Ready { game: GameId, seats: Vec<RematchSeat> },
}

/// A game still waiting for its second player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGame {
    pub game: GameId,
    pub host: PlayerRef,
}

pub struct Lobby<S: EventSink> {
    config: LobbyConfig,
    sink: S,
    rooms: Mutex<HashMap<GameId, Arc<Mutex<Room>>>>,
    next_game: AtomicU64,
    next_player: AtomicU64,
}

impl<S: EventSink> Lobby<S> {
    pub fn new(config: LobbyConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            rooms: Mutex::new(HashMap::new()),
            next_game: AtomicU64::new(1),
            next_player: AtomicU64::new(1),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn game_id(&self) -> GameId {
        GameId(self.next_game.fetch_add(1, Ordering::Relaxed))
    }

    fn player_id(&self) -> PlayerId {
        PlayerId(self.next_player.fetch_add(1, Ordering::Relaxed))
    }

    fn player(&self, name: &str) -> PlayerRef {
        PlayerRef {
            id: self.player_id(),
            name: name.to_string(),
        }
    }

    fn room_rng(&self, id: GameId) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(id.0)),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }

    async fn insert(&self, room: Room) {
        let id = room.game.id();
        self.rooms.lock().await.insert(id, Arc::new(Mutex::new(room)));
    }

    async fn room(&self, id: GameId) -> anyhow::Result<Arc<Mutex<Room>>> {
        self.rooms
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("no game with id {}", id))
    }

    async fn publish(&self, events: &[GameEvent]) -> anyhow::Result<()> {
        for event in events {
            self.sink.publish(event).await?;
        }
        Ok(())
    }

    /// Open a game and seat its creator.
    pub async fn create_game(&self, name: &str) -> anyhow::Result<(GameId, PlayerRef)> {
        let id = self.game_id();
        let creator = self.player(name);
        let room = Room {
            game: Match::create(id, &creator),
            moves: Vec::new(),
            rng: self.room_rng(id),
        };
        self.insert(room).await;
        log::info!("game {} created by {}", id, creator.name);
        Ok((id, creator))
    }

    /// Open a game against the built-in bot.
    pub async fn create_bot_match(&self, name: &str) -> anyhow::Result<(GameId, PlayerRef)> {
        let id = self.game_id();
        let human = self.player(name);
        let bot = self.player("Bot");
        let mut rng = self.room_rng(id);
        let (game, events) = Match::against_bot(id, &human, &bot, &mut rng)?;
        self.insert(Room {
            game,
            moves: Vec::new(),
            rng,
        })
        .await;
        self.publish(&events).await?;
        Ok((id, human))
    }

    pub async fn join(&self, game: GameId, name: &str) -> anyhow::Result<PlayerRef> {
        let room = self.room(game).await?;
        let mut room = room.lock().await;
        let player = self.player(name);
        let events = room.game.join(&player)?;
        self.publish(&events).await?;
        Ok(player)
    }

    pub async fn place_fleet(&self, game: GameId, player: PlayerId, ships: &[ShipPlacement]) -> anyhow::Result<()> {
        let room = self.room(game).await?;
        let mut room = room.lock().await;
        let mut events = room.game.place_fleet(player, ships)?;
        // a bot that won the previous game opens the rematch
        if let Some(turn) = self.bot_reply(&mut room)? {
            events.extend(turn.events);
        }
        self.publish(&events).await
    }

    pub async fn random_fleet(&self, game: GameId, player: PlayerId) -> anyhow::Result<()> {
        let room = self.room(game).await?;
        let mut room = room.lock().await;
        let room = &mut *room;
        let mut events = room.game.random_fleet_for(player, &mut room.rng)?;
        if let Some(turn) = self.bot_reply(room)? {
            events.extend(turn.events);
        }
        self.publish(&events).await
    }

    pub async fn shoot(&self, game: GameId, player: PlayerId, at: Coord) -> anyhow::Result<ActionOutcome> {
        let room = self.room(game).await?;
        let mut room = room.lock().await;
        let res = room.game.shoot(player, at)?;
        self.finish_action(&mut room, res).await
    }

    pub async fn use_ability(
        &self,
        game: GameId,
        player: PlayerId,
        kind: AbilityKind,
        payload: &AbilityPayload,
    ) -> anyhow::Result<ActionOutcome> {
        let room = self.room(game).await?;
        let mut room = room.lock().await;
        let room_ref = &mut *room;
        let res = room_ref.game.use_ability(player, kind, payload, &mut room_ref.rng)?;
        self.finish_action(&mut room, res).await
    }

    /// Log the human's moves, let the bot answer, publish in order.
    async fn finish_action(&self, room: &mut Room, res: Resolution) -> anyhow::Result<ActionOutcome> {
        room.moves.extend_from_slice(&res.moves);
        let mut events = res.events;
        let bot = self.bot_reply(room)?;
        if let Some(turn) = &bot {
            events.extend(turn.events.iter().cloned());
        }
        self.publish(&events).await?;
        Ok(ActionOutcome {
            report: res.report,
            bot,
        })
    }

    /// Run the bot seat if it holds the turn; its moves go to the log.
    fn bot_reply(&self, room: &mut Room) -> anyhow::Result<Option<BotTurn>> {
        let Some(bot) = room.game.players().iter().find(|p| p.is_bot && p.is_turn).map(|p| p.id) else {
            return Ok(None);
        };
        let turn = play_bot_turn(
            &mut room.game,
            bot,
            &room.moves,
            &mut HeatSeeker,
            &mut room.rng,
            self.config.bot_action_cap,
        )?;
        if let Some(turn) = &turn {
            room.moves.extend_from_slice(&turn.moves);
        }
        Ok(turn)
    }

    /// Let a bot that still holds the turn carry on, e.g. after it stopped
    /// at the action cap.
    pub async fn sync(&self, game: GameId) -> anyhow::Result<Option<BotTurn>> {
        let room = self.room(game).await?;
        let mut room = room.lock().await;
        let turn = self.bot_reply(&mut room)?;
        if let Some(turn) = &turn {
            self.publish(&turn.events).await?;
        }
        Ok(turn)
    }

    pub async fn state(&self, game: GameId, player: PlayerId) -> anyhow::Result<StateView<BOARD_SIZE>> {
        let room = self.room(game).await?;
        let room = room.lock().await;
        Ok(room.game.state_view(player, &room.moves)?)
    }

    /// Ask for a rematch; the second request (or the first, against a bot)
    /// opens the new game.
    pub async fn rematch(&self, game: GameId, player: PlayerId) -> anyhow::Result<RematchOutcome> {
        let room = self.room(game).await?;
        let mut room = room.lock().await;
        let room = &mut *room;
        if room.game.request_rematch(player)? == RematchStatus::Waiting {
            return Ok(RematchOutcome::Waiting);
        }

        let new_game = self.game_id();
        let ids = [self.player_id(), self.player_id()];
        let (next, events) = room.game.rematch(new_game, ids, &mut room.rng)?;
        let seats = events
            .iter()
            .find_map(|e| match e {
                GameEvent::RematchReady { seats, .. } => Some(seats.clone()),
                _ => None,
            })
            .unwrap_or_default();
        self.insert(Room {
            game: next,
            moves: Vec::new(),
            rng: self.room_rng(new_game),
        })
        .await;
        self.rooms.lock().await.remove(&game);
        self.publish(&events).await?;
        Ok(RematchOutcome::Ready { game: new_game, seats })
    }

    /// Remove `player`'s game. A seated opponent is told the game was aborted.
    pub async fn leave(&self, game: GameId, player: PlayerId) -> anyhow::Result<()> {
        let room = self.room(game).await?;
        let room = room.lock().await;
        let leaver = room.game.player(player).ok_or(EngineError::UnknownPlayer)?;
        let opponent_seated = room.game.opponent_of(player).is_some();
        log::info!("{} left game {}", leaver.name, game);
        self.rooms.lock().await.remove(&game);
        if opponent_seated {
            self.publish(&[GameEvent::GameAborted {
                game,
                reason: AbortReason::OpponentLeft,
            }])
            .await?;
        }
        Ok(())
    }

    /// Games waiting for a second player, newest first.
    pub async fn open_games(&self) -> Vec<OpenGame> {
        let rooms: Vec<Arc<Mutex<Room>>> = self.rooms.lock().await.values().cloned().collect();
        let mut open = Vec::new();
        for room in rooms {
            let room = room.lock().await;
            if room.game.status() != GameStatus::Waiting {
                continue;
            }
            if let Some(host) = room.game.players().first() {
                open.push(OpenGame {
                    game: room.game.id(),
                    host: host.to_ref(),
                });
            }
        }
        open.sort_by(|a, b| b.game.cmp(&a.game));
        open
    }

    /// Run `f` with shared access to a room.
    pub async fn inspect<T>(&self, game: GameId, f: impl FnOnce(&Room) -> T) -> anyhow::Result<T> {
        let room = self.room(game).await?;
        let room = room.lock().await;
        Ok(f(&room))
    }
}
