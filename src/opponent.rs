//! Autonomous opponent: decision procedure and the turn driver that feeds
//! its decisions through the battle resolver.

use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::ability::{AbilityKind, AbilityPayload, AbilityUsage, Axis};
use crate::battle::{Move, Resolution, ShotRecord, SunkShip};
use crate::board::{Board, Coord};
use crate::common::EngineError;
use crate::config::{COMB_KILLS_REQUIRED, SPLATTER_MAX_HEAT, SPLATTER_MIN_TURNS};
use crate::event::{GameEvent, PlayerRef};
use crate::fleet::random_fleet;
use crate::game::{GameStatus, Match, PlayerId};
use crate::intel::{HeatMap, Intel, Segment};
use crate::ship::{Orientation, ShipPlacement};

/// One action chosen by an opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(tag = "type", rename_all = "lowercase"))]
pub enum Decision {
    Shot { at: Coord },
    Ability { kind: AbilityKind, payload: AbilityPayload },
}

/// Interface implemented by bot strategies.
pub trait Opponent<const N: usize> {
    /// Produce a fleet for a new game.
    fn place_fleet(&mut self, rng: &mut SmallRng) -> Result<(Board<N>, Vec<ShipPlacement>), EngineError> {
        random_fleet::<N, SmallRng>(rng)
    }

    /// Choose the next action, or `None` when nothing sensible is left.
    fn decide(
        &mut self,
        intel: &Intel<N>,
        usage: &AbilityUsage,
        turn_kills: u32,
        rng: &mut SmallRng,
    ) -> Option<Decision>;
}

/// Heat-map driven bot: opening plane, comb after a double kill, splatter
/// on a flat map, then target mode and parity-biased hunting.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatSeeker;

impl<const N: usize> Opponent<N> for HeatSeeker {
    fn decide(
        &mut self,
        intel: &Intel<N>,
        usage: &AbilityUsage,
        turn_kills: u32,
        rng: &mut SmallRng,
    ) -> Option<Decision> {
        let heat = intel.heat_map();

        if let Some(d) = opening_plane(intel, usage, &heat) {
            return Some(d);
        }
        if let Some(d) = comb_strike(intel, usage, turn_kills) {
            return Some(d);
        }
        if !usage.is_exhausted(AbilityKind::Splatter)
            && intel.open().is_empty()
            && heat.max() <= SPLATTER_MAX_HEAT
            && intel.turn_count() >= SPLATTER_MIN_TURNS
        {
            return Some(Decision::Ability {
                kind: AbilityKind::Splatter,
                payload: AbilityPayload::default(),
            });
        }
        if let Some(at) = target_cell(intel) {
            return Some(Decision::Shot { at });
        }
        hunt_cell(intel, &heat, rng).map(|at| Decision::Shot { at })
    }
}

/// First action of the game: sweep the hottest row or column.
fn opening_plane<const N: usize>(
    intel: &Intel<N>,
    usage: &AbilityUsage,
    heat: &HeatMap<N>,
) -> Option<Decision> {
    if usage.used(AbilityKind::Plane) != 0 || intel.turn_count() != 0 {
        return None;
    }
    let (row, row_max) = argmax((0..N).map(|y| heat.row_sum(y)))?;
    let (col, col_max) = argmax((0..N).map(|x| heat.col_sum(x)))?;
    let payload = if row_max >= col_max {
        AbilityPayload::plane(Axis::Row, row as i64)
    } else {
        AbilityPayload::plane(Axis::Col, col as i64)
    };
    Some(Decision::Ability {
        kind: AbilityKind::Plane,
        payload,
    })
}

/// First index holding the maximum.
fn argmax(values: impl Iterator<Item = u32>) -> Option<(usize, u32)> {
    values
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}

fn comb_strike<const N: usize>(intel: &Intel<N>, usage: &AbilityUsage, turn_kills: u32) -> Option<Decision> {
    if usage.used(AbilityKind::Comb) != 0 || turn_kills < COMB_KILLS_REQUIRED {
        return None;
    }
    let seg = intel.open().iter().find(|s| s.orientation.is_some())?;
    Some(Decision::Ability {
        kind: AbilityKind::Comb,
        payload: AbilityPayload::comb(comb_center::<N>(seg)),
    })
}

/// Rounded centroid, pulled in so the 5×5 pattern stays on the board.
fn comb_center<const N: usize>(seg: &Segment) -> Coord {
    let (cx, cy) = seg.centroid();
    let hi = N.saturating_sub(3);
    let clamp = |v: f64| (libm::round(v).max(0.0) as usize).max(2).min(hi);
    Coord::new(clamp(cx), clamp(cy))
}

/// Extend the first open segment that still has an untried end.
fn target_cell<const N: usize>(intel: &Intel<N>) -> Option<Coord> {
    for seg in intel.open() {
        let candidates: Vec<Option<Coord>> = match (seg.orientation, seg.ends()) {
            (Some(Orientation::Horizontal), Some((lo, hi))) => {
                alloc::vec![lo.offset(-1, 0), hi.offset(1, 0)]
            }
            (Some(Orientation::Vertical), Some((lo, hi))) => {
                alloc::vec![lo.offset(0, -1), hi.offset(0, 1)]
            }
            _ => {
                let Some(&first) = seg.cells.first() else {
                    continue;
                };
                // up, right, down, left
                [(0, -1), (1, 0), (0, 1), (-1, 0)]
                    .into_iter()
                    .map(|(dx, dy)| first.offset(dx, dy))
                    .collect()
            }
        };
        if let Some(at) = candidates.into_iter().flatten().find(|&c| intel.is_candidate(c)) {
            return Some(at);
        }
    }
    None
}

/// Hottest unknown cell, even parity preferred, remaining ties at random.
fn hunt_cell<const N: usize>(intel: &Intel<N>, heat: &HeatMap<N>, rng: &mut SmallRng) -> Option<Coord> {
    let mut best = 0;
    let mut pool: Vec<Coord> = Vec::new();
    for y in 0..N {
        for x in 0..N {
            let at = Coord::new(x, y);
            let h = heat.get(at);
            if h == 0 || !intel.is_unknown(at) {
                continue;
            }
            if h > best {
                best = h;
                pool.clear();
            }
            if h == best {
                pool.push(at);
            }
        }
    }
    if pool.iter().any(|c| c.is_even()) {
        pool.retain(|c| c.is_even());
    }
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}

/// Summary of one bot turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct BotTurn {
    pub actions: Vec<Decision>,
    pub shots: Vec<ShotRecord>,
    pub sunk: Vec<SunkShip>,
    pub game_over: bool,
    pub winner: Option<PlayerRef>,
    /// New move records, for the host's log.
    #[cfg_attr(feature = "std", serde(skip))]
    pub moves: Vec<Move>,
    /// Events to publish, in order.
    #[cfg_attr(feature = "std", serde(skip))]
    pub events: Vec<GameEvent>,
}

impl BotTurn {
    fn absorb(&mut self, decision: Decision, res: Resolution) {
        self.actions.push(decision);
        self.shots.extend(res.report.shots);
        self.sunk.extend(res.report.sunk);
        if res.report.game_over {
            self.game_over = true;
            self.winner = res.report.winner;
        }
        self.moves.extend(res.moves);
        self.events.extend(res.events);
    }
}

/// Run `bot` until it loses the turn, the game ends, it has no decision,
/// or `cap` actions were taken.
///
/// Knowledge is rebuilt from `moves` (the game's log so far) plus the moves
/// made in this call before every decision. Returns `None` when the bot did
/// not get to shoot.
pub fn play_bot_turn<const N: usize, O>(
    game: &mut Match<N>,
    bot: PlayerId,
    moves: &[Move],
    opponent: &mut O,
    rng: &mut SmallRng,
    cap: usize,
) -> Result<Option<BotTurn>, EngineError>
where
    O: Opponent<N> + ?Sized,
{
    let mut history = moves.to_vec();
    let mut turn = BotTurn::default();

    for _ in 0..cap {
        let me = game.player(bot).ok_or(EngineError::UnknownPlayer)?;
        if game.status() != GameStatus::InProgress || !me.is_turn {
            break;
        }
        let usage = me.ability_usage;
        let kills = me.turn_kills;

        let intel = Intel::<N>::from_moves(bot, &history);
        let Some(decision) = opponent.decide(&intel, &usage, kills, rng) else {
            log::debug!("bot {} has no decision", bot);
            break;
        };
        log::debug!("bot {} decides {:?}", bot, decision);

        let res = match decision {
            Decision::Shot { at } => game.shoot(bot, at)?,
            Decision::Ability { kind, payload } => game.use_ability(bot, kind, &payload, rng)?,
        };
        history.extend_from_slice(&res.moves);
        turn.absorb(decision, res);
    }

    if turn.shots.is_empty() && !turn.game_over {
        return Ok(None);
    }
    Ok(Some(turn))
}
