// Opponent-side knowledge of the enemy board, rebuilt from a move history.
// Never reads the live board: only the bot's own shot results count.

use alloc::vec::Vec;

use crate::battle::Move;
use crate::bitgrid::Mask;
use crate::board::Coord;
use crate::common::ShotResult;
use crate::config::{BOARD_SIZE, FLEET_LENGTHS};
use crate::game::PlayerId;
use crate::geometry::NEIGHBOURHOOD;
use crate::ship::Orientation;

/// What the shooter has learned about one enemy cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sighting {
    #[default]
    Unknown,
    Miss,
    Hit,
}

/// A 4-connected group of hit cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Cells in flood-fill order.
    pub cells: Vec<Coord>,
    /// `None` for a lone hit or a group that is not a straight line.
    pub orientation: Option<Orientation>,
}

impl Segment {
    fn new(cells: Vec<Coord>) -> Self {
        let orientation = if cells.len() < 2 {
            None
        } else if cells.iter().all(|c| c.y == cells[0].y) {
            Some(Orientation::Horizontal)
        } else if cells.iter().all(|c| c.x == cells[0].x) {
            Some(Orientation::Vertical)
        } else {
            None
        };
        Self { cells, orientation }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Lowest and highest cell along the segment's axis.
    pub fn ends(&self) -> Option<(Coord, Coord)> {
        let first = *self.cells.first()?;
        let (mut lo, mut hi) = (first, first);
        for &c in &self.cells {
            if (c.x, c.y) < (lo.x, lo.y) {
                lo = c;
            }
            if (c.x, c.y) > (hi.x, hi.y) {
                hi = c;
            }
        }
        Some((lo, hi))
    }

    /// Mean of the cell coordinates.
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.cells.len().max(1) as f64;
        let sx: usize = self.cells.iter().map(|c| c.x).sum();
        let sy: usize = self.cells.iter().map(|c| c.y).sum();
        (sx as f64 / n, sy as f64 / n)
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.cells.contains(&at)
    }
}

/// Reconstructed view of the enemy board.
#[derive(Debug, Clone)]
pub struct Intel<const N: usize = BOARD_SIZE> {
    known: [[Sighting; N]; N],
    sunk_mask: Mask<N>,
    /// Sunk cells plus their 8-neighbourhood: nothing there is worth a shot.
    blocked: Mask<N>,
    sunk: Vec<Segment>,
    open: Vec<Segment>,
    remaining: Vec<usize>,
    turn_count: usize,
}

impl<const N: usize> Intel<N> {
    /// Replay `player`'s moves in order. Moves by anyone else are skipped.
    pub fn from_moves(player: PlayerId, moves: &[Move]) -> Self {
        let mut intel = Intel {
            known: [[Sighting::Unknown; N]; N],
            sunk_mask: Mask::new(),
            blocked: Mask::new(),
            sunk: Vec::new(),
            open: Vec::new(),
            remaining: Vec::new(),
            turn_count: 0,
        };

        for mv in moves.iter().filter(|m| m.player_id == player) {
            intel.turn_count += 1;
            let at = mv.at();
            if at.x >= N || at.y >= N {
                continue;
            }
            match mv.result {
                ShotResult::Miss | ShotResult::Already => {
                    // a repeat on a known hit must not erase it
                    if intel.known[at.y][at.x] == Sighting::Unknown {
                        intel.known[at.y][at.x] = Sighting::Miss;
                    }
                }
                ShotResult::Hit => intel.known[at.y][at.x] = Sighting::Hit,
                ShotResult::Sunk => {
                    intel.known[at.y][at.x] = Sighting::Hit;
                    let exclude = intel.sunk_mask;
                    let cells = intel.flood_hits(at, &exclude);
                    for &c in &cells {
                        intel.sunk_mask.insert(c);
                    }
                    intel.sunk.push(Segment::new(cells));
                }
            }
        }

        for c in intel.sunk_mask.iter_set() {
            for (dx, dy) in NEIGHBOURHOOD {
                if let Some(n) = c.offset(dx, dy) {
                    intel.blocked.insert(n);
                }
            }
        }

        let mut visited = intel.sunk_mask;
        for y in 0..N {
            for x in 0..N {
                let at = Coord::new(x, y);
                if intel.known[y][x] == Sighting::Hit && !visited.contains(at) {
                    let cells = intel.flood_hits(at, &visited);
                    for &c in &cells {
                        visited.insert(c);
                    }
                    intel.open.push(Segment::new(cells));
                }
            }
        }
        // largest first; stable so equal sizes keep scan order
        intel.open.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut remaining: Vec<usize> = FLEET_LENGTHS.to_vec();
        for seg in &intel.sunk {
            if let Some(i) = remaining.iter().position(|&len| len == seg.len()) {
                remaining.remove(i);
            }
        }
        intel.remaining = remaining;
        intel
    }

    /// 4-connected hit cells reachable from `start`, skipping `exclude`.
    fn flood_hits(&self, start: Coord, exclude: &Mask<N>) -> Vec<Coord> {
        let mut seen = *exclude;
        let mut out = Vec::new();
        let mut stack = alloc::vec![start];
        seen.insert(start);
        while let Some(c) = stack.pop() {
            out.push(c);
            for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                if let Some(n) = c.offset(dx, dy) {
                    if self.sighting(n) == Some(Sighting::Hit) && !seen.contains(n) {
                        seen.insert(n);
                        stack.push(n);
                    }
                }
            }
        }
        out
    }

    pub fn sighting(&self, at: Coord) -> Option<Sighting> {
        if at.x < N && at.y < N {
            Some(self.known[at.y][at.x])
        } else {
            None
        }
    }

    pub fn is_unknown(&self, at: Coord) -> bool {
        self.sighting(at) == Some(Sighting::Unknown)
    }

    pub fn is_blocked(&self, at: Coord) -> bool {
        self.blocked.contains(at)
    }

    /// Unknown and not next to a sunk ship.
    pub fn is_candidate(&self, at: Coord) -> bool {
        self.is_unknown(at) && !self.is_blocked(at)
    }

    pub fn blocked(&self) -> &Mask<N> {
        &self.blocked
    }

    pub fn sunk(&self) -> &[Segment] {
        &self.sunk
    }

    /// Hit-but-not-sunk segments, largest first.
    pub fn open(&self) -> &[Segment] {
        &self.open
    }

    /// Ship lengths not yet confirmed destroyed.
    pub fn remaining(&self) -> &[usize] {
        &self.remaining
    }

    /// Number of moves the shooter has made so far.
    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn heat_map(&self) -> HeatMap<N> {
        HeatMap::build(self)
    }
}

/// Per-cell count of legal remaining-ship placements covering the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatMap<const N: usize = BOARD_SIZE> {
    heat: [[u32; N]; N],
}

impl<const N: usize> HeatMap<N> {
    pub fn build(intel: &Intel<N>) -> Self {
        let mut heat = [[0u32; N]; N];
        for &len in intel.remaining() {
            if len == 0 || len > N {
                continue;
            }
            for orient in [Orientation::Horizontal, Orientation::Vertical] {
                let (dx, dy) = orient.step();
                let (max_x, max_y) = match orient {
                    Orientation::Horizontal => (N - len + 1, N),
                    Orientation::Vertical => (N, N - len + 1),
                };
                for y in 0..max_y {
                    for x in 0..max_x {
                        if !placement_fits(intel, Coord::new(x, y), len, orient) {
                            continue;
                        }
                        for c in (0..len).map(|k| Coord::new(x + k * dx, y + k * dy)) {
                            if intel.is_unknown(c) {
                                heat[c.y][c.x] += 1;
                            }
                        }
                    }
                }
            }
        }
        Self { heat }
    }

    pub fn get(&self, at: Coord) -> u32 {
        if at.x < N && at.y < N {
            self.heat[at.y][at.x]
        } else {
            0
        }
    }

    pub fn max(&self) -> u32 {
        self.heat.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn row_sum(&self, y: usize) -> u32 {
        self.heat.get(y).map_or(0, |row| row.iter().sum())
    }

    pub fn col_sum(&self, x: usize) -> u32 {
        if x >= N {
            return 0;
        }
        self.heat.iter().map(|row| row[x]).sum()
    }

    pub fn rows(&self) -> &[[u32; N]; N] {
        &self.heat
    }
}

/// A placement may not cross misses or blocked cells. Against an oriented
/// open segment, a placement on the segment's own line must span it end to
/// end and any other placement must stay off it; a lone hit is either
/// covered or left alone.
fn placement_fits<const N: usize>(intel: &Intel<N>, origin: Coord, len: usize, orient: Orientation) -> bool {
    let (dx, dy) = orient.step();
    let cells = || (0..len).map(move |k| Coord::new(origin.x + k * dx, origin.y + k * dy));
    if cells().any(|c| intel.sighting(c) == Some(Sighting::Miss) || intel.is_blocked(c)) {
        return false;
    }
    let last = Coord::new(origin.x + (len - 1) * dx, origin.y + (len - 1) * dy);
    intel.open().iter().all(|seg| {
        let Some((lo, hi)) = seg.ends() else {
            return true;
        };
        let collinear = match (seg.orientation, orient) {
            (Some(Orientation::Horizontal), Orientation::Horizontal) => origin.y == lo.y,
            (Some(Orientation::Vertical), Orientation::Vertical) => origin.x == lo.x,
            _ => false,
        };
        if collinear {
            return (origin.x, origin.y) <= (lo.x, lo.y) && (last.x, last.y) >= (hi.x, hi.y);
        }
        let overlap = cells().filter(|c| seg.contains(*c)).count();
        if seg.orientation.is_some() {
            overlap == 0
        } else {
            overlap == 0 || overlap == seg.len()
        }
    })
}
