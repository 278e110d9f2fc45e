//! Client side of the relay channel, plus the peer-link handshake.
//!
//! The handshake keeps the offer/answer contract opaque to the relay: the
//! host tucks a socket address into the offer payload, the guest dials it
//! and answers. Everything in between is forwarded blind.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::error::RoomFull;
use crate::protocol::relay::{ClientRequest, ServerEvent};
use crate::session::Role;
use crate::transport::tcp::TcpTransport;

pub struct RelayClient {
    stream: BufReader<TcpStream>,
    line: String,
}

impl RelayClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream: BufReader::new(stream),
            line: String::new(),
        })
    }

    fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.stream.get_ref().local_addr()?)
    }

    pub async fn send(&mut self, request: &ClientRequest) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.stream.get_mut().write_all(line.as_bytes()).await?;
        Ok(())
    }

    /// Next well-formed event; malformed lines are dropped with a warning.
    pub async fn recv(&mut self) -> anyhow::Result<ServerEvent> {
        loop {
            self.line.clear();
            let n = self.stream.read_line(&mut self.line).await?;
            if n == 0 {
                anyhow::bail!("relay channel closed");
            }
            match serde_json::from_str::<ServerEvent>(self.line.trim_end()) {
                Ok(event) => return Ok(event),
                Err(e) => log::warn!("discarding malformed relay event: {}", e),
            }
        }
    }

    pub async fn login(&mut self, identity: &str) -> anyhow::Result<()> {
        self.send(&ClientRequest::Login {
            identity: identity.to_string(),
        })
        .await
    }

    /// Join a room and learn which seat we got. `RoomFull` is typed so
    /// callers can tell rejection apart from transport trouble.
    pub async fn join_room(&mut self, room_id: &str) -> anyhow::Result<Role> {
        self.send(&ClientRequest::JoinRoom {
            room_id: room_id.to_string(),
        })
        .await?;
        loop {
            match self.recv().await? {
                ServerEvent::RoomCreated { .. } => return Ok(Role::Host),
                ServerEvent::RoomJoined { .. } => return Ok(Role::Guest),
                ServerEvent::RoomFull => return Err(RoomFull.into()),
                other => log::debug!("ignoring relay event while joining: {:?}", other),
            }
        }
    }

    pub async fn leave_room(&mut self, room_id: &str) -> anyhow::Result<()> {
        self.send(&ClientRequest::LeaveRoom {
            room_id: room_id.to_string(),
        })
        .await
    }

    /// Run the negotiation handshake for our seat and return the open peer
    /// channel. Blocks until the other occupant plays its part; callers
    /// wanting a bound wrap this in a timeout.
    pub async fn establish_peer_link(
        &mut self,
        role: Role,
        room_id: &str,
    ) -> anyhow::Result<TcpTransport> {
        loop {
            match self.recv().await? {
                ServerEvent::ReadyToNegotiate => break,
                other => log::debug!("ignoring relay event before negotiation: {:?}", other),
            }
        }
        match role {
            Role::Host => {
                // listen on the interface we already reach the relay over
                let listener = TcpListener::bind((self.local_addr()?.ip(), 0)).await?;
                let addr = listener.local_addr()?;
                self.send(&ClientRequest::Offer {
                    room_id: room_id.to_string(),
                    payload: serde_json::json!({ "addr": addr.to_string() }),
                })
                .await?;
                let (stream, peer) = listener.accept().await?;
                log::info!("peer channel accepted from {}", peer);
                Ok(TcpTransport::new(stream))
            }
            Role::Guest => {
                let addr = loop {
                    match self.recv().await? {
                        ServerEvent::Offer { payload } => {
                            let Some(addr) = payload.get("addr").and_then(|a| a.as_str()) else {
                                log::warn!("offer payload carries no address; waiting");
                                continue;
                            };
                            break addr.parse::<SocketAddr>()?;
                        }
                        other => log::debug!("ignoring relay event awaiting offer: {:?}", other),
                    }
                };
                let stream = TcpStream::connect(addr).await?;
                self.send(&ClientRequest::Answer {
                    room_id: room_id.to_string(),
                    payload: serde_json::json!({ "accepted": true }),
                })
                .await?;
                log::info!("peer channel connected to {}", addr);
                Ok(TcpTransport::new(stream))
            }
        }
    }
}
