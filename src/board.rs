//! Fleet board: placement bookkeeping and hit resolution.

use crate::config::CELLS;
use crate::error::BoardError;
use crate::grid::{CellMask, Coord};
use crate::ship::{Ship, ShipInfo};
use core::fmt;

/// What a single attack did to this board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRecord {
    pub hit: bool,
    /// Geometry of the ship this attack sank, if any.
    pub sunk_ship: Option<ShipInfo>,
}

/// One player's board: the placed fleet plus every attack it has absorbed.
///
/// Each cell is owned by at most one ship; the adjacency buffer (a ship's
/// 8-neighbourhood) is enforced at placement time, never retrofitted.
pub struct Board {
    ships: Vec<Ship>,
    /// Cell → index into `ships` for occupied cells.
    owners: [Option<u8>; CELLS],
    occupied: CellMask,
    /// Occupied cells plus their adjacency halo; placements must avoid it.
    keepout: CellMask,
    attacked: CellMask,
}

impl Board {
    /// An empty board with no ships placed.
    pub fn new() -> Self {
        Board {
            ships: Vec::new(),
            owners: [None; CELLS],
            occupied: CellMask::new(),
            keepout: CellMask::new(),
            attacked: CellMask::new(),
        }
    }

    /// Place a ship, enforcing the no-touch rule: the footprint may not
    /// intersect any placed ship or its 8-neighbourhood.
    pub fn place_ship(&mut self, ship: Ship) -> Result<(), BoardError> {
        let footprint = ship.footprint();
        if footprint.intersects(self.keepout) {
            return Err(BoardError::Overlap);
        }
        let index = self.ships.len() as u8;
        for cell in Coord::all().filter(|c| footprint.get(*c)) {
            self.owners[cell.index() as usize] = Some(index);
        }
        self.occupied |= footprint;
        self.keepout |= ship.halo();
        self.ships.push(ship);
        Ok(())
    }

    /// Resolve an attack on this board. The attacked-set membership check
    /// comes first: a coordinate can only ever be resolved once.
    pub fn record_hit(&mut self, c: Coord) -> Result<HitRecord, BoardError> {
        if self.attacked.get(c) {
            return Err(BoardError::AlreadyAttacked);
        }
        self.attacked.set(c);
        match self.owners[c.index() as usize] {
            None => Ok(HitRecord {
                hit: false,
                sunk_ship: None,
            }),
            Some(index) => {
                let ship = &mut self.ships[usize::from(index)];
                ship.record_hit(c);
                let sunk_ship = ship.is_sunk().then(|| ship.geometry());
                Ok(HitRecord {
                    hit: true,
                    sunk_ship,
                })
            }
        }
    }

    /// True once every placed ship is sunk.
    pub fn is_defeated(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Ships not yet sunk.
    pub fn ships_afloat(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    pub fn occupied(&self) -> CellMask {
        self.occupied
    }

    pub fn attacked(&self) -> CellMask {
        self.attacked
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{ ships: {}, afloat: {},",
            self.ships.len(),
            self.ships_afloat()
        )?;
        writeln!(f, "  occupied: {:?},", self.occupied)?;
        writeln!(f, "  attacked: {:?}", self.attacked)?;
        write!(f, "}}")
    }
}
