//! In-process transport pair, used by tests and local bot-vs-bot play.

use tokio::sync::mpsc;

use crate::protocol::PeerMessage;
use crate::transport::Transport;

pub struct InMemoryTransport {
    tx: mpsc::UnboundedSender<PeerMessage>,
    rx: mpsc::UnboundedReceiver<PeerMessage>,
}

impl InMemoryTransport {
    /// Two connected endpoints. Dropping one makes the other's `recv` fail,
    /// which is how disconnects surface on real channels too.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();
        (
            Self { tx: tx_a, rx: rx_b },
            Self { tx: tx_b, rx: rx_a },
        )
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: PeerMessage) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .map_err(|_| anyhow::anyhow!("peer channel closed"))
    }

    async fn recv(&mut self) -> anyhow::Result<PeerMessage> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("peer channel closed"))
    }
}
