//! Matchmaking relay: room admission, an identity directory with challenge
//! routing, and blind forwarding of peer-link negotiation payloads.

pub mod client;
pub mod server;

pub use client::RelayClient;
pub use server::RelayServer;
