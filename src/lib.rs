mod board;
mod bot;
mod config;
mod console;
mod error;
mod grid;
mod logging;
mod node;
mod placement;
pub mod protocol;
pub mod relay;
mod resolver;
mod retry;
mod session;
mod ship;
pub mod transport;
mod view;

pub use board::{Board, HitRecord};
pub use bot::{BotGunner, FixedPause, HuntBot, Immediate, MovePacer};
pub use config::*;
pub use console::{parse_coord, ConsoleGunner};
pub use error::{BoardError, PlacementExhausted, ProtocolViolation, RoomFull};
pub use grid::{CellMask, Coord};
pub use logging::init_logging;
pub use node::{Gunner, PeerNode};
pub use placement::random_fleet;
pub use protocol::{PeerMessage, Winner};
pub use relay::{RelayClient, RelayServer};
pub use resolver::{resolve, Outcome};
pub use retry::retry;
pub use session::{MatchOutcome, MatchSession, Role, SessionState};
pub use ship::{Orientation, Ship, ShipClass, ShipInfo};
pub use transport::tcp::TcpTransport;
pub use view::print_match_view;
