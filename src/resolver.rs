//! Attack resolution, shared verbatim by remote matches and the local bot.

use crate::board::Board;
use crate::error::BoardError;
use crate::grid::Coord;
use crate::ship::ShipInfo;

/// Deterministic outcome of one attack against a defender's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub coord: Coord,
    pub hit: bool,
    pub sunk: bool,
    /// Present exactly when `sunk`: the geometry the opponent's observer
    /// view needs to draw the ship it never saw placed.
    pub ship: Option<ShipInfo>,
    /// The defender's whole fleet is now sunk.
    pub defeated: bool,
}

impl Outcome {
    /// Turn-token rule: any hit, sunk or not, lets the attacker fire again;
    /// only a miss passes the token.
    pub fn keeps_turn(&self) -> bool {
        self.hit
    }
}

/// Resolve an attack. Pure function of the defender's board state and the
/// coordinate: the same path runs whether the defender is a remote peer or
/// the autonomous opponent.
pub fn resolve(coord: Coord, defender: &mut Board) -> Result<Outcome, BoardError> {
    let record = defender.record_hit(coord)?;
    Ok(Outcome {
        coord,
        hit: record.hit,
        sunk: record.sunk_ship.is_some(),
        ship: record.sunk_ship,
        defeated: defender.is_defeated(),
    })
}
