//! Match session lifecycle and turn synchronization.
//!
//! The session is a pure state machine: it owns the local board, both ready
//! flags, and the turn token, and validates every peer-driven event before
//! letting it touch state. All I/O lives in the node that drives it, so the
//! lifecycle and turn invariants are synchronously testable.

use crate::board::Board;
use crate::error::{BoardError, ProtocolViolation};
use crate::grid::{CellMask, Coord};
use crate::protocol::Winner;
use crate::resolver::{resolve, Outcome};
use crate::ship::ShipInfo;

/// Which seat this side occupies. The host is whoever the relay admitted
/// first, and the host always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Host => Role::Guest,
            Role::Guest => Role::Host,
        }
    }
}

/// Session lifecycle. Transitions only move rightward; `Complete` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Room has fewer than two occupants.
    Lobby,
    /// Two occupants; peer-link handshake in flight.
    Negotiating,
    /// Peer channel open; waiting for both ready signals.
    AwaitingReady,
    /// Turn cycling.
    InProgress,
    /// Fleet defeat, disconnect, or forced abort.
    Complete,
}

/// How a completed match ended, from this side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Victory,
    Defeat,
    /// The peer dropped (or never readied); a neutral abort, deliberately
    /// distinct from `Defeat`.
    OpponentLeft,
}

/// One side's view of a match: room membership, negotiation phase, ready
/// gating, and the turn cycle.
pub struct MatchSession {
    room_id: String,
    role: Role,
    state: SessionState,
    local_ready: bool,
    remote_ready: bool,
    /// Holder of the turn token. Meaningful only while `InProgress`.
    turn: Role,
    board: Board,
    /// Every coordinate we have fired at the opponent.
    shots: CellMask,
    /// The subset of `shots` the opponent reported as hits.
    shot_hits: CellMask,
    /// Shot sent, result not yet received.
    pending_shot: Option<Coord>,
    /// Opponent ships not yet sunk; both sides place the same manifest.
    enemy_afloat: usize,
    /// Geometry of enemy ships we have sunk, as reported in results.
    enemy_sunk: Vec<ShipInfo>,
    outcome: Option<MatchOutcome>,
}

impl MatchSession {
    /// A fresh session in `Lobby`, holding this side's placed board.
    pub fn new(room_id: impl Into<String>, role: Role, board: Board) -> Self {
        let enemy_afloat = board.ships().len();
        MatchSession {
            room_id: room_id.into(),
            role,
            state: SessionState::Lobby,
            local_ready: false,
            remote_ready: false,
            turn: Role::Host,
            board,
            shots: CellMask::new(),
            shot_hits: CellMask::new(),
            pending_shot: None,
            enemy_afloat,
            enemy_sunk: Vec::new(),
            outcome: None,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn shots(&self) -> CellMask {
        self.shots
    }

    pub fn shot_hits(&self) -> CellMask {
        self.shot_hits
    }

    pub fn enemy_ships_afloat(&self) -> usize {
        self.enemy_afloat
    }

    /// Enemy ships sunk so far, in sinking order.
    pub fn enemy_sunk(&self) -> &[ShipInfo] {
        &self.enemy_sunk
    }

    /// The second occupant arrived; negotiation begins.
    pub fn opponent_joined(&mut self) {
        if self.state == SessionState::Lobby {
            self.state = SessionState::Negotiating;
        }
    }

    /// The peer channel is open; both sides may now signal ready.
    pub fn channel_open(&mut self) {
        if matches!(self.state, SessionState::Lobby | SessionState::Negotiating) {
            self.state = SessionState::AwaitingReady;
        }
    }

    /// This side finished setup. Returns true when the match starts as a
    /// consequence (the opponent had already readied).
    pub fn mark_local_ready(&mut self) -> bool {
        if self.state != SessionState::AwaitingReady {
            return false;
        }
        self.local_ready = true;
        self.try_start()
    }

    /// The opponent signalled ready. Order-independent with the local side;
    /// duplicates are harmless. Returns true when the match starts now.
    pub fn mark_remote_ready(&mut self) -> Result<bool, ProtocolViolation> {
        if self.state != SessionState::AwaitingReady {
            return Err(ProtocolViolation::WrongState);
        }
        self.remote_ready = true;
        Ok(self.try_start())
    }

    fn try_start(&mut self) -> bool {
        if self.local_ready && self.remote_ready {
            self.state = SessionState::InProgress;
            self.turn = Role::Host;
            true
        } else {
            false
        }
    }

    pub fn my_turn(&self) -> bool {
        self.state == SessionState::InProgress && self.turn == self.role
    }

    /// Commit to an outgoing shot. Validates the turn, the coordinate
    /// freshness, and that no other shot is outstanding.
    pub fn fire(&mut self, coord: Coord) -> Result<(), ProtocolViolation> {
        if self.state != SessionState::InProgress {
            return Err(ProtocolViolation::WrongState);
        }
        if self.turn != self.role {
            return Err(ProtocolViolation::OutOfTurn);
        }
        if self.pending_shot.is_some() {
            return Err(ProtocolViolation::UnexpectedResult);
        }
        if self.shots.get(coord) {
            return Err(ProtocolViolation::RepeatCoordinate);
        }
        self.shots.set(coord);
        self.pending_shot = Some(coord);
        Ok(())
    }

    /// Apply the opponent's result for our outstanding shot: update the
    /// observer view and the tally, then move the token on a miss.
    pub fn apply_result(
        &mut self,
        coord: Coord,
        hit: bool,
        sunk: bool,
        ship: Option<ShipInfo>,
    ) -> Result<(), ProtocolViolation> {
        if self.state != SessionState::InProgress {
            return Err(ProtocolViolation::WrongState);
        }
        if self.pending_shot != Some(coord) {
            return Err(ProtocolViolation::UnexpectedResult);
        }
        self.pending_shot = None;
        if hit {
            self.shot_hits.set(coord);
        }
        if sunk {
            if let Some(info) = ship {
                self.enemy_sunk.push(info);
            }
            self.enemy_afloat = self.enemy_afloat.saturating_sub(1);
            if self.enemy_afloat == 0 {
                self.complete(MatchOutcome::Victory);
                return Ok(());
            }
        }
        if !hit {
            self.turn = self.role.other();
        }
        Ok(())
    }

    /// Resolve an incoming attack against our board. Violations leave every
    /// piece of state untouched. A full-fleet defeat completes the session
    /// immediately, overriding the normal token hand-off.
    pub fn incoming_fire(&mut self, coord: Coord) -> Result<Outcome, ProtocolViolation> {
        if self.state != SessionState::InProgress {
            return Err(ProtocolViolation::WrongState);
        }
        if self.turn == self.role {
            return Err(ProtocolViolation::OutOfTurn);
        }
        let outcome = resolve(coord, &mut self.board).map_err(|e| match e {
            BoardError::AlreadyAttacked => ProtocolViolation::RepeatCoordinate,
            BoardError::OutOfBounds | BoardError::Overlap => ProtocolViolation::OutOfBoundsShot,
        })?;
        if outcome.defeated {
            self.complete(MatchOutcome::Defeat);
        } else if !outcome.keeps_turn() {
            self.turn = self.role;
        }
        Ok(outcome)
    }

    /// The opponent declared the match over. Perspective is inverted here:
    /// its `winner` label names our outcome.
    pub fn remote_gameover(&mut self, winner: Winner) -> Result<(), ProtocolViolation> {
        match self.state {
            // already concluded locally (defeat detection races the notice)
            SessionState::Complete => Ok(()),
            SessionState::InProgress => {
                let outcome = if winner.receiver_won() {
                    MatchOutcome::Victory
                } else {
                    MatchOutcome::Defeat
                };
                self.complete(outcome);
                Ok(())
            }
            _ => Err(ProtocolViolation::WrongState),
        }
    }

    /// The sole cancellation path: a disconnect (or forced abort) ends the
    /// session wherever it stood.
    pub fn peer_disconnected(&mut self) {
        if self.state != SessionState::Complete {
            self.complete(MatchOutcome::OpponentLeft);
        }
    }

    fn complete(&mut self, outcome: MatchOutcome) {
        self.state = SessionState::Complete;
        self.outcome = Some(outcome);
    }
}
