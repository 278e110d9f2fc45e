//! Drives one side of a match over the peer channel: pumps the transport,
//! feeds the session state machine, and enforces the ready/turn flow.

use std::time::Duration;

use tokio::time::timeout;

use crate::bot::{Immediate, MovePacer};
use crate::config::{MAX_PEER_VIOLATIONS, READY_TIMEOUT};
use crate::grid::{CellMask, Coord};
use crate::protocol::{PeerMessage, Winner};
use crate::session::{MatchOutcome, MatchSession, SessionState};
use crate::transport::Transport;

/// The seat making the firing decisions: a human at a console, or the
/// autonomous opponent. The same node drives both.
#[async_trait::async_trait]
pub trait Gunner: Send {
    /// Choose the next target. `shots` is every coordinate fired so far.
    async fn pick_target(&mut self, shots: CellMask) -> anyhow::Result<Coord>;

    /// Outcome feedback for the last shot.
    fn observe_result(&mut self, _coord: Coord, _hit: bool, _sunk: bool, _shots: CellMask) {}
}

pub struct PeerNode {
    session: MatchSession,
    transport: Box<dyn Transport>,
    gunner: Box<dyn Gunner>,
    pacer: Box<dyn MovePacer>,
    ready_timeout: Duration,
    violations: u32,
}

impl PeerNode {
    pub fn new(
        session: MatchSession,
        transport: Box<dyn Transport>,
        gunner: Box<dyn Gunner>,
    ) -> Self {
        Self {
            session,
            transport,
            gunner,
            pacer: Box::new(Immediate),
            ready_timeout: READY_TIMEOUT,
            violations: 0,
        }
    }

    pub fn with_pacer(mut self, pacer: Box<dyn MovePacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_ready_timeout(mut self, ready_timeout: Duration) -> Self {
        self.ready_timeout = ready_timeout;
        self
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    /// Play the match to completion. Peer misbehaviour and disconnects are
    /// absorbed into the session outcome; `Err` is reserved for local
    /// faults (our own transport send failing, a broken gunner).
    pub async fn run(&mut self) -> anyhow::Result<MatchOutcome> {
        self.session.channel_open();
        if self.send_or_disconnect(PeerMessage::Ready).await {
            self.session.mark_local_ready();
        }

        // Either side may ready first; we wait, but never unboundedly.
        while self.session.state() == SessionState::AwaitingReady {
            let msg = match timeout(self.ready_timeout, self.transport.recv()).await {
                Err(_) => {
                    log::warn!("opponent never signalled ready; aborting session");
                    self.session.peer_disconnected();
                    break;
                }
                Ok(Err(e)) => {
                    log::info!("peer channel dropped while awaiting ready: {}", e);
                    self.session.peer_disconnected();
                    break;
                }
                Ok(Ok(msg)) => msg,
            };
            match msg {
                PeerMessage::Ready => {
                    let _ = self.session.mark_remote_ready();
                }
                other => {
                    if self.note_violation(format_args!("{:?} before both sides ready", other)) {
                        break;
                    }
                }
            }
        }

        while self.session.state() == SessionState::InProgress {
            if self.session.my_turn() {
                self.take_turn().await?;
            } else {
                self.await_fire().await?;
            }
        }

        self.session
            .outcome()
            .ok_or_else(|| anyhow::anyhow!("session completed without an outcome"))
    }

    /// Fire once and absorb the opponent's answer. A hit leaves the turn
    /// with us, so the outer loop calls straight back in.
    async fn take_turn(&mut self) -> anyhow::Result<()> {
        self.pacer.pause().await;
        let coord = loop {
            let candidate = self.gunner.pick_target(self.session.shots()).await?;
            match self.session.fire(candidate) {
                Ok(()) => break candidate,
                Err(v) => log::debug!("target {} rejected ({}); asking again", candidate, v),
            }
        };
        if !self
            .send_or_disconnect(PeerMessage::Fire {
                x: coord.x(),
                y: coord.y(),
            })
            .await
        {
            return Ok(());
        }

        while self.session.state() == SessionState::InProgress {
            let msg = match self.transport.recv().await {
                Ok(msg) => msg,
                Err(e) => {
                    log::info!("peer channel dropped awaiting result: {}", e);
                    self.session.peer_disconnected();
                    return Ok(());
                }
            };
            match msg {
                PeerMessage::Result {
                    x,
                    y,
                    hit,
                    sunk,
                    ship,
                } => {
                    let Some(c) = Coord::new(x, y) else {
                        if self.note_violation(format_args!("result for off-grid ({}, {})", x, y)) {
                            return Ok(());
                        }
                        continue;
                    };
                    match self.session.apply_result(c, hit, sunk, ship) {
                        Ok(()) => {
                            self.gunner.observe_result(c, hit, sunk, self.session.shots());
                            return Ok(());
                        }
                        Err(v) => {
                            if self.note_violation(format_args!("{}", v)) {
                                return Ok(());
                            }
                        }
                    }
                }
                PeerMessage::Gameover { winner } => {
                    let _ = self.session.remote_gameover(winner);
                    return Ok(());
                }
                other => {
                    if self.note_violation(format_args!("{:?} while awaiting result", other)) {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// Wait for the opponent's move and answer it. Violations are dropped
    /// on the floor: no reply, no state change.
    async fn await_fire(&mut self) -> anyhow::Result<()> {
        let msg = match self.transport.recv().await {
            Ok(msg) => msg,
            Err(e) => {
                log::info!("peer channel dropped awaiting fire: {}", e);
                self.session.peer_disconnected();
                return Ok(());
            }
        };
        match msg {
            PeerMessage::Fire { x, y } => {
                let Some(coord) = Coord::new(x, y) else {
                    self.note_violation(format_args!("fire at off-grid ({}, {})", x, y));
                    return Ok(());
                };
                match self.session.incoming_fire(coord) {
                    Ok(outcome) => {
                        let replied = self
                            .send_or_disconnect(PeerMessage::Result {
                                x,
                                y,
                                hit: outcome.hit,
                                sunk: outcome.sunk,
                                ship: outcome.ship,
                            })
                            .await;
                        if replied && outcome.defeated {
                            // we just lost; name the winner explicitly
                            self.send_or_disconnect(PeerMessage::Gameover {
                                winner: Winner::Opponent,
                            })
                            .await;
                        }
                    }
                    Err(v) => {
                        self.note_violation(format_args!("{}", v));
                    }
                }
            }
            PeerMessage::Gameover { winner } => {
                if self.session.remote_gameover(winner).is_err() {
                    self.note_violation(format_args!("gameover outside play"));
                }
            }
            other => {
                self.note_violation(format_args!("{:?} while awaiting fire", other));
            }
        }
        Ok(())
    }

    /// Send, absorbing a dead channel into the disconnect path. Returns
    /// false when the channel is gone and the session has been aborted.
    async fn send_or_disconnect(&mut self, msg: PeerMessage) -> bool {
        match self.transport.send(msg).await {
            Ok(()) => true,
            Err(e) => {
                log::info!("peer channel dropped on send: {}", e);
                self.session.peer_disconnected();
                false
            }
        }
    }

    /// Count a peer violation. Returns true once the offender has used up
    /// its allowance and the session has been aborted.
    fn note_violation(&mut self, what: std::fmt::Arguments<'_>) -> bool {
        self.violations += 1;
        log::warn!(
            "ignoring protocol violation from peer: {} ({}/{})",
            what,
            self.violations,
            MAX_PEER_VIOLATIONS
        );
        if self.violations >= MAX_PEER_VIOLATIONS {
            log::warn!("dropping peer after repeated protocol violations");
            self.session.peer_disconnected();
            true
        } else {
            false
        }
    }
}
