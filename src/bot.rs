//! Autonomous opponent: uniform random fire plus an orthogonal hunt queue.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::grid::{CellMask, Coord};
use crate::node::Gunner;

/// Targeting state for the hunt heuristic. After a hit that does not sink,
/// the four orthogonal neighbours are queued; queued cells are fired before
/// any random search resumes. No probability-density targeting.
pub struct HuntBot {
    queue: VecDeque<Coord>,
}

impl HuntBot {
    pub fn new() -> Self {
        HuntBot {
            queue: VecDeque::new(),
        }
    }

    /// Cells currently queued for follow-up fire.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Next coordinate to fire at: the hunt queue first (skipping anything
    /// already fired), otherwise a uniformly random unfired cell. `None`
    /// only when the whole grid has been fired at.
    pub fn pick_target<R: Rng + ?Sized>(&mut self, rng: &mut R, fired: CellMask) -> Option<Coord> {
        while let Some(c) = self.queue.pop_front() {
            if !fired.get(c) {
                return Some(c);
            }
        }
        let open: Vec<Coord> = Coord::all().filter(|c| !fired.get(*c)).collect();
        if open.is_empty() {
            None
        } else {
            Some(open[rng.random_range(0..open.len())])
        }
    }

    /// Feed back the outcome of our last shot. A non-sinking hit seeds the
    /// queue with in-bounds neighbours, de-duplicated against both the fired
    /// set and the queue itself.
    pub fn observe(&mut self, coord: Coord, hit: bool, sunk: bool, fired: CellMask) {
        if hit && !sunk {
            for n in coord.orthogonal() {
                if !fired.get(n) && !self.queue.contains(&n) {
                    self.queue.push_back(n);
                }
            }
        }
    }
}

impl Default for HuntBot {
    fn default() -> Self {
        HuntBot::new()
    }
}

/// Pause taken before each of the bot's moves, decoupled from any real clock
/// so game logic stays synchronously testable.
#[async_trait::async_trait]
pub trait MovePacer: Send + Sync {
    async fn pause(&mut self);
}

/// No pause at all.
pub struct Immediate;

#[async_trait::async_trait]
impl MovePacer for Immediate {
    async fn pause(&mut self) {}
}

/// Fixed wall-clock pause, for human-facing play.
pub struct FixedPause(pub Duration);

#[async_trait::async_trait]
impl MovePacer for FixedPause {
    async fn pause(&mut self) {
        tokio::time::sleep(self.0).await;
    }
}

/// The hunt heuristic behind the [`Gunner`] seat interface.
pub struct BotGunner {
    rng: SmallRng,
    hunt: HuntBot,
}

impl BotGunner {
    pub fn new(rng: SmallRng) -> Self {
        BotGunner {
            rng,
            hunt: HuntBot::new(),
        }
    }
}

#[async_trait::async_trait]
impl Gunner for BotGunner {
    async fn pick_target(&mut self, shots: CellMask) -> anyhow::Result<Coord> {
        self.hunt
            .pick_target(&mut self.rng, shots)
            .ok_or_else(|| anyhow::anyhow!("no unattacked cells left"))
    }

    fn observe_result(&mut self, coord: Coord, hit: bool, sunk: bool, shots: CellMask) {
        self.hunt.observe(coord, hit, sunk, shots);
    }
}
