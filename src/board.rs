//! Defender grid with a closed set of cell states.
//!
//! A board only moves through the documented transitions: `Empty → Ship`
//! while a fleet is placed, then `Ship → Hit` and `Empty → Miss` as shots
//! land. Cells already `Hit` or `Miss` never change again.

use crate::common::EngineError;
use crate::config::BOARD_SIZE;
use core::fmt;

/// State of a single board cell.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Cell {
    #[default]
    Empty = 0,
    Ship = 1,
    Hit = 2,
    Miss = 3,
}

impl Cell {
    /// `true` for cells that belong to a ship, struck or not.
    pub fn is_occupied(self) -> bool {
        matches!(self, Cell::Ship | Cell::Hit)
    }

    /// Rendering glyph. Intact ship segments are only drawn when `reveal`.
    pub fn glyph(self, reveal: bool) -> char {
        match self {
            Cell::Empty => '·',
            Cell::Ship if reveal => '■',
            Cell::Ship => '·',
            Cell::Hit => 'X',
            Cell::Miss => 'o',
        }
    }
}

/// Board position; `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`, returning `None` below zero. The upper bound is
    /// left to the board.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Coord> {
        Some(Coord {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Checkerboard parity used by hunt mode.
    pub fn is_even(self) -> bool {
        (self.x + self.y) % 2 == 0
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What a strike did to the cell it landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// `Ship → Hit`.
    Hit,
    /// `Empty → Miss`.
    Miss,
    /// Cell was already `Hit` or `Miss`.
    Already,
}

/// An `N×N` grid of cells stored row-major (`cells[y][x]`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board<const N: usize = BOARD_SIZE> {
    cells: [[Cell; N]; N],
}

impl<const N: usize> Board<N> {
    /// Side length of the board.
    pub const SIZE: usize = N;

    /// Create an empty board.
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; N]; N],
        }
    }

    pub fn rows(&self) -> &[[Cell; N]; N] {
        &self.cells
    }

    /// `true` iff `0 ≤ x, y < N`.
    pub fn in_bounds(x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < N && (y as usize) < N
    }

    pub fn contains(at: Coord) -> bool {
        at.x < N && at.y < N
    }

    pub fn get(&self, at: Coord) -> Option<Cell> {
        self.cells.get(at.y).and_then(|row| row.get(at.x)).copied()
    }

    /// Cell at a signed position, `None` off the board. Used for neighbour probes.
    pub fn probe(&self, x: isize, y: isize) -> Option<Cell> {
        if Self::in_bounds(x, y) {
            Some(self.cells[y as usize][x as usize])
        } else {
            None
        }
    }

    /// Mark an empty cell as part of a ship. Out-of-range cells are ignored.
    pub(crate) fn mark_ship(&mut self, at: Coord) {
        if let Some(cell) = self.cells.get_mut(at.y).and_then(|row| row.get_mut(at.x)) {
            if *cell == Cell::Empty {
                *cell = Cell::Ship;
            }
        }
    }

    /// Fire at `at`: `Ship → Hit`, `Empty → Miss`, anything else is inert.
    pub fn strike(&mut self, at: Coord) -> Result<Strike, EngineError> {
        let cell = self
            .cells
            .get_mut(at.y)
            .and_then(|row| row.get_mut(at.x))
            .ok_or(EngineError::OutOfBounds { x: at.x, y: at.y })?;
        Ok(match *cell {
            Cell::Ship => {
                *cell = Cell::Hit;
                Strike::Hit
            }
            Cell::Empty => {
                *cell = Cell::Miss;
                Strike::Miss
            }
            Cell::Hit | Cell::Miss => Strike::Already,
        })
    }

    /// Number of cells in state `kind`.
    pub fn count(&self, kind: Cell) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == kind)
            .count()
    }

    /// Intact ship segments left on the board.
    pub fn ships_afloat(&self) -> usize {
        self.count(Cell::Ship)
    }

    /// `true` once no `Ship` cell remains.
    pub fn is_defeated(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&c| c != Cell::Ship))
    }

    /// Iterate all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &cell)| (Coord::new(x, y), cell))
        })
    }

    /// Render the board with column/row headers. Intact ship cells are
    /// hidden unless `reveal`, giving the opponent's fog-of-war view.
    pub fn render(&self, reveal: bool) -> Rendered<'_, N> {
        Rendered {
            board: self,
            reveal,
        }
    }
}

impl<const N: usize> Default for Board<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for Board<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board<{}>:", N)?;
        for row in self.cells.iter() {
            for cell in row.iter() {
                write!(f, "{} ", cell.glyph(true))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Display for Board<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.render(true), f)
    }
}

/// Display adapter returned by [`Board::render`].
pub struct Rendered<'a, const N: usize> {
    board: &'a Board<N>,
    reveal: bool,
}

impl<const N: usize> fmt::Display for Rendered<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..N {
            write!(f, "{:>2}", x)?;
        }
        for (y, row) in self.board.cells.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:>2} ", y)?;
            for cell in row.iter() {
                write!(f, " {}", cell.glyph(self.reveal))?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<const N: usize> serde::Serialize for Board<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells.iter().map(|row| row.as_slice()))
    }
}

#[cfg(feature = "std")]
impl<'de, const N: usize> serde::Deserialize<'de> for Board<N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows: std::vec::Vec<std::vec::Vec<Cell>> = serde::Deserialize::deserialize(deserializer)?;
        if rows.len() != N {
            return Err(serde::de::Error::invalid_length(rows.len(), &"one row per board line"));
        }
        let mut board = Board::new();
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != N {
                return Err(serde::de::Error::invalid_length(row.len(), &"one cell per board column"));
            }
            for (x, cell) in row.into_iter().enumerate() {
                board.cells[y][x] = cell;
            }
        }
        Ok(board)
    }
}

/// `[[x, y], ..]` encoding for cell lists in result and event payloads.
#[cfg(feature = "std")]
pub(crate) mod coord_pairs {
    use super::Coord;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::vec::Vec;

    pub fn serialize<S: Serializer>(cells: &[Coord], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(cells.iter().map(|c| [c.x, c.y]))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Coord>, D::Error> {
        let pairs = Vec::<[usize; 2]>::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|[x, y]| Coord::new(x, y)).collect())
    }
}
