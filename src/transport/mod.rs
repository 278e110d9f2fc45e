//! The peer channel: a reliable, in-order message pipe between the two
//! matched clients. Implementations carry [`PeerMessage`] frames; the game
//! logic never sees the wire.

use crate::protocol::PeerMessage;

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: PeerMessage) -> anyhow::Result<()>;
    /// Next well-formed message. Errors mean the channel is gone, which the
    /// caller must treat as a peer disconnect.
    async fn recv(&mut self) -> anyhow::Result<PeerMessage>;
}

pub mod in_memory;
pub mod tcp;
