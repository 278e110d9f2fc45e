//! Relay-channel message set: matchmaking requests, server events, and the
//! opaque negotiation passthrough.
//!
//! Negotiation payloads are `serde_json::Value` on purpose: the relay
//! forwards them verbatim to the other room occupant and never inspects
//! their contents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requests a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientRequest {
    JoinRoom { room_id: String },
    LeaveRoom { room_id: String },
    /// Register this connection in the identity directory.
    Login { identity: String },
    GetOnlineUsers,
    SendChallenge { target_id: String },
    AcceptChallenge { challenger_ref: String },
    Offer { room_id: String, payload: Value },
    Answer { room_id: String, payload: Value },
    IceCandidate { room_id: String, payload: Value },
}

/// Events the relay sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// First joiner: the room now exists and you are its host.
    RoomCreated { room_id: String },
    /// Second joiner: you are the guest.
    RoomJoined { room_id: String },
    /// Join rejected; the room keeps its two occupants.
    RoomFull,
    /// Both occupants are present; start the peer-link handshake.
    ReadyToNegotiate,
    OnlineUsersUpdate { users: Vec<UserInfo> },
    ChallengeReceived {
        from_id: String,
        from_name: String,
        challenger_ref: String,
    },
    /// A challenge was accepted; both parties join this fresh room.
    MatchStart { room_id: String },
    Offer { payload: Value },
    Answer { payload: Value },
    IceCandidate { payload: Value },
}

/// One entry of the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserStatus {
    Available,
    InMatch,
}
