//! Wire contracts. The peer channel carries game messages; the relay
//! channel carries matchmaking and negotiation messages (see [`relay`]).
//! Both are newline-delimited JSON, one object per frame.

pub mod relay;

use crate::ship::ShipInfo;
use serde::{Deserialize, Serialize};

/// Game messages exchanged over the peer channel once it is established.
///
/// A closed set: unknown tags fail to parse and are treated as protocol
/// violations by the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PeerMessage {
    /// Sender has finished setup and is ready to play.
    Ready,
    /// Attack request against the receiver's board.
    Fire { x: u8, y: u8 },
    /// Outcome of the most recent attack; `ship` present only when `sunk`.
    Result {
        x: u8,
        y: u8,
        hit: bool,
        sunk: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ship: Option<ShipInfo>,
    },
    /// Terminal notice. `winner` labels the outcome from the sender's
    /// perspective; the receiver inverts it to learn its own result.
    Gameover { winner: Winner },
}

/// Who won, as named by the sender of a `gameover` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// The sender's opponent (that is, the receiver) has won.
    Opponent,
    /// The sender itself has won.
    #[serde(rename = "self")]
    Sender,
}

impl Winner {
    /// Invert perspective: did the side receiving this message win?
    pub fn receiver_won(self) -> bool {
        matches!(self, Winner::Opponent)
    }
}
