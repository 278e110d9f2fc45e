//! Randomized fleet placement.
//!
//! Rejection sampling: each ship gets a uniformly random origin and
//! orientation until it fits; if a single ship exhausts its attempt budget
//! the whole candidate board is discarded and rebuilt from scratch.

use crate::board::Board;
use crate::config::{fleet_classes, BOARD_SIZE, BOARD_RETRY_CAP, SHIP_ATTEMPT_CAP};
use crate::error::PlacementExhausted;
use crate::grid::Coord;
use crate::retry::retry;
use crate::ship::{Orientation, Ship, ShipClass};
use rand::Rng;

/// Generate a full fleet satisfying the manifest and the no-touch rule.
/// Validity is guaranteed; determinism is up to the caller's `rng`.
pub fn random_fleet<R: Rng + ?Sized>(rng: &mut R) -> Result<Board, PlacementExhausted> {
    retry(BOARD_RETRY_CAP, |_| try_fleet(rng)).ok_or(PlacementExhausted {
        boards_tried: BOARD_RETRY_CAP,
    })
}

/// One candidate board; `None` when any ship fails to find a spot.
fn try_fleet<R: Rng + ?Sized>(rng: &mut R) -> Option<Board> {
    let mut board = Board::new();
    for class in fleet_classes() {
        place_one(rng, &mut board, class)?;
    }
    Some(board)
}

fn place_one<R: Rng + ?Sized>(rng: &mut R, board: &mut Board, class: ShipClass) -> Option<()> {
    retry(SHIP_ATTEMPT_CAP, |_| {
        let orientation = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        // sample origins that keep the whole ship on the grid
        let (max_x, max_y) = match orientation {
            Orientation::Horizontal => (BOARD_SIZE - class.length(), BOARD_SIZE - 1),
            Orientation::Vertical => (BOARD_SIZE - 1, BOARD_SIZE - class.length()),
        };
        let x = rng.random_range(0..=max_x);
        let y = rng.random_range(0..=max_y);
        let origin = Coord::new(x, y)?;
        let ship = Ship::new(class, origin, orientation).ok()?;
        board.place_ship(ship).ok()
    })
}
