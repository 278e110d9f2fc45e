//! Error types for the game core and the wire protocols.

use core::fmt;

/// Errors returned by board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Ship placement extends past the grid edge.
    OutOfBounds,
    /// Ship placement occupies or touches a cell of another ship.
    Overlap,
    /// The coordinate was already attacked on this board.
    AlreadyAttacked,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds => write!(f, "ship placement is out of bounds"),
            BoardError::Overlap => write!(f, "ship placement overlaps or touches another ship"),
            BoardError::AlreadyAttacked => write!(f, "coordinate was already attacked"),
        }
    }
}

impl std::error::Error for BoardError {}

/// Fleet generation ran out of attempts. Recoverable: callers may simply try
/// again, typically with the same budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementExhausted {
    /// Candidate boards that were tried and discarded.
    pub boards_tried: u32,
}

impl fmt::Display for PlacementExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fleet placement exhausted after {} candidate boards",
            self.boards_tried
        )
    }
}

impl std::error::Error for PlacementExhausted {}

/// A peer message that is rejected without any state change: wrong turn,
/// wrong lifecycle state, or a structurally invalid move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// An attack from the side that does not hold the turn token.
    OutOfTurn,
    /// An attack on a coordinate that was already attacked.
    RepeatCoordinate,
    /// An attack outside the grid.
    OutOfBoundsShot,
    /// A message that is not valid in the current session state.
    WrongState,
    /// A result that does not match the outstanding shot.
    UnexpectedResult,
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolViolation::OutOfTurn => write!(f, "attack out of turn"),
            ProtocolViolation::RepeatCoordinate => {
                write!(f, "attack on an already-attacked coordinate")
            }
            ProtocolViolation::OutOfBoundsShot => write!(f, "attack outside the grid"),
            ProtocolViolation::WrongState => write!(f, "message not valid in this session state"),
            ProtocolViolation::UnexpectedResult => {
                write!(f, "result does not match the outstanding shot")
            }
        }
    }
}

impl std::error::Error for ProtocolViolation {}

/// The relay rejected a join because the room already has two occupants.
/// Surfaced only to the rejected joiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomFull;

impl fmt::Display for RoomFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room already has two occupants")
    }
}

impl std::error::Error for RoomFull {}
