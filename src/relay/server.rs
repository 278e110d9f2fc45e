//! The relay service. Authoritative for room membership and the identity
//! directory; stateless with respect to game content; negotiation payloads
//! pass through uninspected.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;

use crate::config::ROOM_CAPACITY;
use crate::protocol::relay::{ClientRequest, ServerEvent, UserInfo, UserStatus};

type ClientId = u64;

struct User {
    name: String,
    status: UserStatus,
}

/// All shared relay state. Every mutation happens under one lock, so room
/// admission and directory updates are atomic: two simultaneous joins of an
/// empty room serialize, and exactly one of them creates it.
#[derive(Default)]
struct Registry {
    rooms: HashMap<String, Vec<ClientId>>,
    users: HashMap<ClientId, User>,
    outboxes: HashMap<ClientId, mpsc::UnboundedSender<ServerEvent>>,
    matches_started: u64,
}

impl Registry {
    fn push(&self, id: ClientId, event: ServerEvent) {
        if let Some(outbox) = self.outboxes.get(&id) {
            // a dead outbox just means the client is mid-disconnect
            let _ = outbox.send(event);
        }
    }

    fn join_room(&mut self, id: ClientId, room_id: String) {
        let occupants = self.rooms.entry(room_id.clone()).or_default();
        if occupants.contains(&id) {
            return;
        }
        if occupants.len() >= ROOM_CAPACITY {
            self.push(id, ServerEvent::RoomFull);
            return;
        }
        occupants.push(id);
        let members = occupants.clone();
        if members.len() == 1 {
            self.push(id, ServerEvent::RoomCreated { room_id });
        } else {
            self.push(id, ServerEvent::RoomJoined { room_id });
            for member in members {
                self.push(member, ServerEvent::ReadyToNegotiate);
            }
        }
    }

    fn leave_room(&mut self, id: ClientId, room_id: &str) {
        if let Some(occupants) = self.rooms.get_mut(room_id) {
            occupants.retain(|m| *m != id);
            if occupants.is_empty() {
                self.rooms.remove(room_id);
            }
        }
    }

    fn login(&mut self, id: ClientId, identity: String) {
        self.users.insert(
            id,
            User {
                name: identity,
                status: UserStatus::Available,
            },
        );
        self.broadcast_directory();
    }

    fn directory(&self) -> Vec<UserInfo> {
        let mut users: Vec<UserInfo> = self
            .users
            .iter()
            .map(|(id, user)| UserInfo {
                id: id.to_string(),
                name: user.name.clone(),
                status: user.status,
            })
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }

    fn broadcast_directory(&self) {
        let users = self.directory();
        for id in self.users.keys() {
            self.push(
                *id,
                ServerEvent::OnlineUsersUpdate {
                    users: users.clone(),
                },
            );
        }
    }

    fn send_challenge(&mut self, id: ClientId, target_id: &str) {
        let Some(from) = self.users.get(&id) else {
            log::warn!("challenge from unregistered client {}", id);
            return;
        };
        let from_name = from.name.clone();
        let Some(target) = target_id.parse::<ClientId>().ok().filter(|t| {
            self.users
                .get(t)
                .is_some_and(|u| u.status == UserStatus::Available)
        }) else {
            // stale or bad target; the directory entry is already gone
            log::debug!("dropping challenge to unavailable target {}", target_id);
            return;
        };
        self.push(
            target,
            ServerEvent::ChallengeReceived {
                from_id: id.to_string(),
                from_name,
                challenger_ref: id.to_string(),
            },
        );
    }

    fn accept_challenge(&mut self, id: ClientId, challenger_ref: &str) {
        let Some(challenger) = challenger_ref
            .parse::<ClientId>()
            .ok()
            .filter(|c| self.outboxes.contains_key(c))
        else {
            log::debug!("accept for vanished challenger {}", challenger_ref);
            return;
        };
        self.matches_started += 1;
        let room_id = format!("m{:05}", self.matches_started);
        for member in [challenger, id] {
            if let Some(user) = self.users.get_mut(&member) {
                user.status = UserStatus::InMatch;
            }
            self.push(
                member,
                ServerEvent::MatchStart {
                    room_id: room_id.clone(),
                },
            );
        }
        self.broadcast_directory();
    }

    /// Forward a negotiation event to the other occupant of the room.
    fn forward(&self, id: ClientId, room_id: &str, event: ServerEvent) {
        let Some(other) = self
            .rooms
            .get(room_id)
            .and_then(|occupants| occupants.iter().find(|m| **m != id))
        else {
            log::debug!("no peer to forward to in room {}", room_id);
            return;
        };
        self.push(*other, event);
    }

    fn disconnect(&mut self, id: ClientId) {
        self.outboxes.remove(&id);
        for occupants in self.rooms.values_mut() {
            occupants.retain(|m| *m != id);
        }
        self.rooms.retain(|_, occupants| !occupants.is_empty());
        if self.users.remove(&id).is_some() {
            // prompt removal keeps stale challenges from targeting this id
            self.broadcast_directory();
        }
    }
}

pub struct RelayServer {
    listener: TcpListener,
    registry: Arc<Mutex<Registry>>,
}

impl RelayServer {
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            registry: Arc::new(Mutex::new(Registry::default())),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop. Each connection gets its own task and client id.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut next_id: ClientId = 0;
        loop {
            let (stream, addr) = self.listener.accept().await?;
            next_id += 1;
            let id = next_id;
            log::info!("relay: client {} connected from {}", id, addr);
            let registry = Arc::clone(&self.registry);
            tokio::spawn(async move {
                if let Err(e) = serve_client(id, stream, &registry).await {
                    log::debug!("relay: client {} ended: {}", id, e);
                }
                registry.lock().unwrap().disconnect(id);
                log::info!("relay: client {} disconnected", id);
            });
        }
    }
}

async fn serve_client(
    id: ClientId,
    stream: TcpStream,
    registry: &Arc<Mutex<Registry>>,
) -> anyhow::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let (outbox, mut inbox) = mpsc::unbounded_channel::<ServerEvent>();
    registry.lock().unwrap().outboxes.insert(id, outbox);

    // writer drains the outbox until disconnect cleanup drops the sender
    let writer = tokio::spawn(async move {
        while let Some(event) = inbox.recv().await {
            let Ok(mut line) = serde_json::to_string(&event) else {
                break;
            };
            line.push('\n');
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    while let Some(line) = lines.next_line().await? {
        let request = match serde_json::from_str::<ClientRequest>(&line) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("relay: ignoring malformed request from {}: {}", id, e);
                continue;
            }
        };
        handle_request(id, request, registry);
    }

    drop(writer);
    Ok(())
}

fn handle_request(id: ClientId, request: ClientRequest, registry: &Arc<Mutex<Registry>>) {
    let mut registry = registry.lock().unwrap();
    match request {
        ClientRequest::JoinRoom { room_id } => registry.join_room(id, room_id),
        ClientRequest::LeaveRoom { room_id } => registry.leave_room(id, &room_id),
        ClientRequest::Login { identity } => registry.login(id, identity),
        ClientRequest::GetOnlineUsers => {
            let users = registry.directory();
            registry.push(id, ServerEvent::OnlineUsersUpdate { users });
        }
        ClientRequest::SendChallenge { target_id } => registry.send_challenge(id, &target_id),
        ClientRequest::AcceptChallenge { challenger_ref } => {
            registry.accept_challenge(id, &challenger_ref)
        }
        ClientRequest::Offer { room_id, payload } => {
            registry.forward(id, &room_id, ServerEvent::Offer { payload })
        }
        ClientRequest::Answer { room_id, payload } => {
            registry.forward(id, &room_id, ServerEvent::Answer { payload })
        }
        ClientRequest::IceCandidate { room_id, payload } => {
            registry.forward(id, &room_id, ServerEvent::IceCandidate { payload })
        }
    }
}
