use crate::ship::ShipClass;

pub const BOARD_SIZE: usize = 12;
pub const FLEET: [ShipClass; 4] = [
    ShipClass::new(5, 1),
    ShipClass::new(4, 2),
    ShipClass::new(3, 3),
    ShipClass::new(2, 4),
];

/// Number of ships in a complete fleet.
pub const NUM_SHIPS: usize = count_ships();

/// Fleet expanded to one length per ship, largest first.
pub const FLEET_LENGTHS: [usize; NUM_SHIPS] = expand_fleet();

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = count_cells();

/// Random placement gives up on a ship after this many rejected samples.
pub const PLACEMENT_ATTEMPTS: usize = 1000;

pub const SPLATTER_SHOTS: usize = 12;
pub const COMB_KILLS_REQUIRED: u32 = 2;
pub const PLANE_LIMIT: u32 = 1;
pub const SPLATTER_LIMIT: u32 = 2;
pub const COMB_LIMIT: u32 = 1;

/// Upper bound on bot actions per externally triggered turn sync.
pub const BOT_ACTION_CAP: usize = 12;
/// A heat map whose peak is at or below this is considered uninformative.
pub const SPLATTER_MAX_HEAT: u32 = 2;
pub const SPLATTER_MIN_TURNS: usize = 6;

const fn count_ships() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < FLEET.len() {
        total += FLEET[i].count();
        i += 1;
    }
    total
}

const fn count_cells() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < FLEET.len() {
        total += FLEET[i].count() * FLEET[i].size();
        i += 1;
    }
    total
}

const fn expand_fleet() -> [usize; NUM_SHIPS] {
    let mut out = [0usize; NUM_SHIPS];
    let mut slot = 0;
    let mut i = 0;
    while i < FLEET.len() {
        let mut n = 0;
        while n < FLEET[i].count() {
            out[slot] = FLEET[i].size();
            slot += 1;
            n += 1;
        }
        i += 1;
    }
    out
}

/// Number of ships of `size` a valid fleet must contain (zero for sizes
/// outside the fleet table).
pub fn required_count(size: usize) -> usize {
    FLEET
        .iter()
        .find(|class| class.size() == size)
        .map_or(0, |class| class.count())
}
