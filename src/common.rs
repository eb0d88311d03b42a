//! Common types for the engine: the error taxonomy and per-cell shot results.

use crate::ability::AbilityKind;

/// Outcome of firing at a single cell, as recorded in the move log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum ShotResult {
    /// Struck an intact ship segment.
    Hit,
    /// Struck open water.
    Miss,
    /// Cell was fired upon before; nothing changed.
    Already,
    /// Struck the last intact segment of a ship.
    Sunk,
}

impl ShotResult {
    /// `true` for results that keep the attacker's turn.
    pub fn is_hit(self) -> bool {
        matches!(self, ShotResult::Hit | ShotResult::Sunk)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShotResult::Hit => "hit",
            ShotResult::Miss => "miss",
            ShotResult::Already => "already",
            ShotResult::Sunk => "sunk",
        }
    }
}

impl core::fmt::Display for ShotResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by engine operations. None of them leave a board
/// partially mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Submitted ship sizes do not match the required fleet.
    InvalidFleetComposition,
    /// A ship is out of bounds, overlaps or touches another ship.
    InvalidPlacement,
    /// Ability name is not one of `plane`, `splatter`, `comb`.
    InvalidAbility,
    /// Ability usage counter has reached its limit.
    AbilityExhausted(AbilityKind),
    /// `comb` requested before enough kills this turn.
    AbilityLocked,
    /// Ability payload is missing a required field.
    MissingAbilityPayload,
    /// Random fleet generation could not fit a ship.
    PlacementExhausted { size: usize },
    /// Coordinate lies outside the board.
    OutOfBounds { x: usize, y: usize },
    /// Match is not accepting shots.
    GameNotInProgress,
    /// Attacker does not hold the turn.
    NotYourTurn,
    /// Player is not seated in this match.
    UnknownPlayer,
    /// Both seats are taken.
    GameFull,
    /// Fleet already submitted.
    AlreadyReady,
    /// Rematch requested before the match completed.
    RematchUnavailable,
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EngineError::InvalidFleetComposition => write!(f, "Invalid fleet composition"),
            EngineError::InvalidPlacement => {
                write!(f, "Ship placement invalid (bounds/overlap/touch)")
            }
            EngineError::InvalidAbility => write!(f, "Unknown ability"),
            EngineError::AbilityExhausted(kind) => write!(f, "Ability {} exhausted", kind),
            EngineError::AbilityLocked => write!(f, "Comb locked until two kills this turn"),
            EngineError::MissingAbilityPayload => write!(f, "Ability payload incomplete"),
            EngineError::PlacementExhausted { size } => {
                write!(f, "Unable to place ship of size {} randomly", size)
            }
            EngineError::OutOfBounds { x, y } => write!(f, "Coordinate ({}, {}) out of bounds", x, y),
            EngineError::GameNotInProgress => write!(f, "Game is not in progress"),
            EngineError::NotYourTurn => write!(f, "Not your turn"),
            EngineError::UnknownPlayer => write!(f, "Player is not part of this game"),
            EngineError::GameFull => write!(f, "Game already has two players"),
            EngineError::AlreadyReady => write!(f, "Fleet already placed"),
            EngineError::RematchUnavailable => write!(f, "Game still in progress"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}
