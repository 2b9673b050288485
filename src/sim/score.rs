//! Score and the temporary multiplier

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameSession};
use super::timer::{Scheduler, TimerEvent, TimerId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEngine {
    /// Never decreases within a round
    pub total: u64,
    /// 1, or the boosted factor while the window is open
    pub multiplier: u32,
    #[serde(skip)]
    expiry: Option<TimerId>,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self {
            total: 0,
            multiplier: 1,
            expiry: None,
        }
    }
}

impl ScoreEngine {
    pub fn add(&mut self, points: u64) {
        self.total = self.total.saturating_add(points);
    }

    /// Points a creature is worth right now
    pub fn earned(&self, points: u32) -> u64 {
        u64::from(points) * u64::from(self.multiplier)
    }

    pub fn is_boosted(&self) -> bool {
        self.multiplier > 1
    }

    /// Boost to `factor` and (re)start the expiry window. Never stacks: a second
    /// activation only pushes the expiry out. Returns the expiry time.
    pub fn activate_multiplier(
        &mut self,
        factor: u32,
        duration_ms: u64,
        sched: &mut dyn Scheduler,
    ) -> u64 {
        self.cancel_expiry(sched);
        self.multiplier = factor.max(1);
        self.expiry = Some(sched.schedule_once(duration_ms, TimerEvent::MultiplierExpired));
        sched.now_ms() + duration_ms
    }

    /// Expiry timer fired
    pub fn expire(&mut self) {
        self.multiplier = 1;
        self.expiry = None;
    }

    /// Drop the pending expiry, leaving the multiplier as it is
    pub fn cancel_expiry(&mut self, sched: &mut dyn Scheduler) -> bool {
        match self.expiry.take() {
            Some(id) => sched.cancel(id),
            None => false,
        }
    }

    pub fn expiry_pending(&self) -> bool {
        self.expiry.is_some()
    }
}

impl GameSession {
    pub(crate) fn on_multiplier_expired(&mut self) {
        if !self.score.is_boosted() {
            return;
        }
        self.score.expire();
        self.push_event(GameEvent::MultiplierExpired);
        log::debug!("Multiplier expired");
    }
}
