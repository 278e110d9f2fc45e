//! Ship classes, placed ships, and their wire-facing geometry.

use crate::error::BoardError;
use crate::grid::{CellMask, Coord};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

/// Class of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    name: &'static str,
    length: u8,
}

impl ShipClass {
    pub const fn new(name: &'static str, length: u8) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> u8 {
        self.length
    }
}

/// Geometry of a ship as it travels on the wire, revealed to the opponent
/// only once the ship is sunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipInfo {
    pub x: u8,
    pub y: u8,
    pub size: u8,
    pub vertical: bool,
}

/// A ship placed on the board, tracking which of its cells have been hit.
///
/// Invariants: the hit count never exceeds the length, and `sunk` flips to
/// true exactly when the last cell is hit and never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    class: ShipClass,
    origin: Coord,
    orientation: Orientation,
    footprint: CellMask,
    hits: CellMask,
    sunk: bool,
}

impl Ship {
    /// Place a ship of `class` with its bow at `origin`, extending right or
    /// down. Fails with `OutOfBounds` when the stern leaves the grid.
    pub fn new(
        class: ShipClass,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<Self, BoardError> {
        let mut footprint = CellMask::new();
        for i in 0..class.length() {
            let (dx, dy) = match orientation {
                Orientation::Horizontal => (i as i8, 0),
                Orientation::Vertical => (0, i as i8),
            };
            let cell = origin.offset(dx, dy).ok_or(BoardError::OutOfBounds)?;
            footprint.set(cell);
        }
        Ok(Ship {
            class,
            origin,
            orientation,
            footprint,
            hits: CellMask::new(),
            sunk: false,
        })
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Cells occupied by this ship.
    pub fn footprint(&self) -> CellMask {
        self.footprint
    }

    /// The footprint plus its full 8-neighbourhood: the exclusion zone no
    /// other ship may enter.
    pub fn halo(&self) -> CellMask {
        let mut halo = CellMask::new();
        for cell in Coord::all().filter(|c| self.footprint.get(*c)) {
            for dy in -1i8..=1 {
                for dx in -1i8..=1 {
                    if let Some(n) = cell.offset(dx, dy) {
                        halo.set(n);
                    }
                }
            }
        }
        halo
    }

    pub fn occupies(&self, c: Coord) -> bool {
        self.footprint.get(c)
    }

    /// Record a hit on one of this ship's cells. The caller guarantees the
    /// coordinate is occupied and not yet attacked.
    pub(crate) fn record_hit(&mut self, c: Coord) {
        debug_assert!(self.footprint.get(c));
        self.hits.set(c);
        if self.hits.count() == usize::from(self.class.length()) {
            self.sunk = true;
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hits.count()
    }

    pub fn is_sunk(&self) -> bool {
        self.sunk
    }

    pub fn geometry(&self) -> ShipInfo {
        ShipInfo {
            x: self.origin.x(),
            y: self.origin.y(),
            size: self.class.length(),
            vertical: self.orientation.is_vertical(),
        }
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) at {} {:?}, {}/{} hit",
            self.class.name(),
            self.class.length(),
            self.origin,
            self.orientation,
            self.hits.count(),
            self.class.length(),
        )
    }
}
