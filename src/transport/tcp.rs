//! TCP peer channel: one JSON object per line.

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::config::MAX_FRAME_BYTES;
use crate::protocol::PeerMessage;
use crate::transport::Transport;

pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    max_frame: usize,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            max_frame: MAX_FRAME_BYTES,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: PeerMessage) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(&msg)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.map_err(|e| {
            if matches!(
                e.kind(),
                std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset
            ) {
                anyhow::anyhow!("peer channel closed")
            } else {
                anyhow::anyhow!("peer channel write error: {}", e)
            }
        })
    }

    async fn recv(&mut self) -> anyhow::Result<PeerMessage> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            // bounded read so a missing newline cannot balloon memory
            let mut limited = (&mut self.reader).take(self.max_frame as u64);
            let n = limited.read_until(b'\n', &mut buf).await.map_err(|e| {
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::ConnectionReset
                ) {
                    anyhow::anyhow!("peer channel closed")
                } else {
                    anyhow::anyhow!("peer channel read error: {}", e)
                }
            })?;
            if n == 0 {
                return Err(anyhow::anyhow!("peer channel closed"));
            }
            if buf.last() != Some(&b'\n') && n == self.max_frame {
                return Err(anyhow::anyhow!(
                    "peer frame exceeds {} bytes",
                    self.max_frame
                ));
            }
            // malformed frames are protocol violations: drop and keep reading
            match serde_json::from_slice::<PeerMessage>(&buf) {
                Ok(msg) => return Ok(msg),
                Err(e) => {
                    log::warn!("discarding malformed peer frame: {}", e);
                }
            }
        }
    }
}
