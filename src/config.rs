//! Game constants and tunable limits.

use crate::ship::ShipClass;
use std::time::Duration;

pub const BOARD_SIZE: u8 = 10;
pub const CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Classic fleet manifest: (class, how many of it).
pub const FLEET: [(ShipClass, usize); 4] = [
    (ShipClass::new("battleship", 4), 1),
    (ShipClass::new("cruiser", 3), 2),
    (ShipClass::new("destroyer", 2), 3),
    (ShipClass::new("submarine", 1), 4),
];

/// Ships in a complete fleet.
pub const FLEET_SHIPS: usize = 10;
/// Cells a complete fleet occupies.
pub const FLEET_CELLS: usize = 20;

/// The manifest expanded ship by ship, largest first.
pub fn fleet_classes() -> impl Iterator<Item = ShipClass> {
    FLEET
        .into_iter()
        .flat_map(|(class, count)| std::iter::repeat(class).take(count))
}

/// Attempts to position a single ship before the candidate board is discarded.
pub const SHIP_ATTEMPT_CAP: u32 = 100;
/// Fresh candidate boards tried before fleet generation gives up.
pub const BOARD_RETRY_CAP: u32 = 64;

/// Occupants a matchmaking room admits.
pub const ROOM_CAPACITY: usize = 2;

/// Longest accepted wire frame on either channel.
pub const MAX_FRAME_BYTES: usize = 16 * 1024;
/// Peer protocol violations tolerated before the connection is dropped.
pub const MAX_PEER_VIOLATIONS: u32 = 16;
/// Bounded wait for the opponent's ready signal.
pub const READY_TIMEOUT: Duration = Duration::from_secs(120);
/// Bounded wait for peer-link negotiation.
pub const NEGOTIATION_TIMEOUT: Duration = Duration::from_secs(120);
