//! One-shot abilities: kinds, usage counters, payloads and target cells.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use rand::Rng;

use crate::board::Coord;
use crate::common::EngineError;
use crate::config::{COMB_LIMIT, PLANE_LIMIT, SPLATTER_LIMIT, SPLATTER_SHOTS};

/// The three limited-use special attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum AbilityKind {
    /// Sweep a full row or column.
    Plane,
    /// Twelve distinct random cells.
    Splatter,
    /// 5×5 block minus its corners; needs two kills this turn.
    Comb,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 3] = [AbilityKind::Plane, AbilityKind::Splatter, AbilityKind::Comb];

    /// Uses allowed per player per game.
    pub fn limit(self) -> u32 {
        match self {
            AbilityKind::Plane => PLANE_LIMIT,
            AbilityKind::Splatter => SPLATTER_LIMIT,
            AbilityKind::Comb => COMB_LIMIT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbilityKind::Plane => "plane",
            AbilityKind::Splatter => "splatter",
            AbilityKind::Comb => "comb",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbilityKind {
    type Err = EngineError;

    /// Case-insensitive; anything else is [`EngineError::InvalidAbility`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AbilityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(EngineError::InvalidAbility)
    }
}

/// Per-player ability counters. Every player starts at zero for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityUsage {
    pub plane: u32,
    pub splatter: u32,
    pub comb: u32,
}

impl AbilityUsage {
    pub fn used(&self, kind: AbilityKind) -> u32 {
        match kind {
            AbilityKind::Plane => self.plane,
            AbilityKind::Splatter => self.splatter,
            AbilityKind::Comb => self.comb,
        }
    }

    pub fn remaining(&self, kind: AbilityKind) -> u32 {
        kind.limit().saturating_sub(self.used(kind))
    }

    pub fn is_exhausted(&self, kind: AbilityKind) -> bool {
        self.used(kind) >= kind.limit()
    }

    /// Consume one use of `kind`.
    pub fn record(&mut self, kind: AbilityKind) {
        let slot = match kind {
            AbilityKind::Plane => &mut self.plane,
            AbilityKind::Splatter => &mut self.splatter,
            AbilityKind::Comb => &mut self.comb,
        };
        *slot += 1;
    }

    /// Total uses across all kinds.
    pub fn total(&self) -> u32 {
        self.plane + self.splatter + self.comb
    }
}

/// Sweep direction for `plane`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Axis {
    #[default]
    Row,
    Col,
}

/// Loosely typed ability arguments, as they arrive from a client.
///
/// `plane` reads `axis` (default row) and `index` (default 0, clamped to
/// the board); `comb` requires `center`; `splatter` takes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct AbilityPayload {
    pub axis: Option<Axis>,
    pub index: Option<i64>,
    pub center: Option<Coord>,
}

impl AbilityPayload {
    pub fn plane(axis: Axis, index: i64) -> Self {
        Self {
            axis: Some(axis),
            index: Some(index),
            center: None,
        }
    }

    pub fn comb(center: Coord) -> Self {
        Self {
            center: Some(center),
            ..Self::default()
        }
    }
}

/// Compute the cells an ability strikes, in application order.
///
/// Plane and comb are deterministic (row-major); splatter draws
/// `min(SPLATTER_SHOTS, N²)` distinct cells from `rng` in draw order.
pub fn ability_targets<const N: usize, R: Rng + ?Sized>(
    kind: AbilityKind,
    payload: &AbilityPayload,
    rng: &mut R,
) -> Result<Vec<Coord>, EngineError> {
    match kind {
        AbilityKind::Plane => {
            let axis = payload.axis.unwrap_or_default();
            let index = payload.index.unwrap_or(0).clamp(0, N as i64 - 1) as usize;
            Ok((0..N)
                .map(|i| match axis {
                    Axis::Row => Coord::new(i, index),
                    Axis::Col => Coord::new(index, i),
                })
                .collect())
        }
        AbilityKind::Comb => {
            let center = payload.center.ok_or(EngineError::MissingAbilityPayload)?;
            Ok(comb_pattern::<N>(center))
        }
        AbilityKind::Splatter => Ok(splatter_cells::<N, R>(rng)),
    }
}

/// 5×5 block around `center` minus its four corners, clipped to the board.
pub fn comb_pattern<const N: usize>(center: Coord) -> Vec<Coord> {
    let mut cells = Vec::with_capacity(21);
    for dy in -2isize..=2 {
        for dx in -2isize..=2 {
            if dx.abs() == 2 && dy.abs() == 2 {
                continue;
            }
            if let Some(at) = center.offset(dx, dy) {
                if at.x < N && at.y < N {
                    cells.push(at);
                }
            }
        }
    }
    cells
}

fn splatter_cells<const N: usize, R: Rng + ?Sized>(rng: &mut R) -> Vec<Coord> {
    let total = N * N;
    let need = SPLATTER_SHOTS.min(total);
    let mut taken = alloc::vec![false; total];
    let mut cells = Vec::with_capacity(need);
    while cells.len() < need {
        let n = rng.random_range(0..total);
        if taken[n] {
            continue;
        }
        taken[n] = true;
        cells.push(Coord::new(n % N, n / N));
    }
    cells
}
