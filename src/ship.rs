//! Ship classes and placements.

use crate::board::Coord;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends right from its origin.
    #[cfg_attr(feature = "std", serde(rename = "H"))]
    Horizontal,
    /// Extends down from its origin.
    #[cfg_attr(feature = "std", serde(rename = "V"))]
    Vertical,
}

impl Orientation {
    /// Unit step along the orientation as `(dx, dy)`.
    pub fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }
}

/// A fleet entry: ship length and how many of them a fleet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    size: usize,
    count: usize,
}

impl ShipClass {
    pub const fn new(size: usize, count: usize) -> Self {
        Self { size, count }
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub const fn count(&self) -> usize {
        self.count
    }
}

/// A ship occupying `size` consecutive cells from `(x, y)`, extending
/// right (`H`) or down (`V`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipPlacement {
    pub x: usize,
    pub y: usize,
    pub size: usize,
    #[cfg_attr(feature = "std", serde(rename = "dir"))]
    pub orientation: Orientation,
}

impl ShipPlacement {
    pub const fn new(x: usize, y: usize, size: usize, orientation: Orientation) -> Self {
        Self {
            x,
            y,
            size,
            orientation,
        }
    }

    /// Cells the ship would cover, origin first. Not bounds-checked.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let ship = *self;
        let (dx, dy) = ship.orientation.step();
        (0..ship.size).map(move |i| {
            Coord::new(
                ship.x.saturating_add(dx * i),
                ship.y.saturating_add(dy * i),
            )
        })
    }
}
