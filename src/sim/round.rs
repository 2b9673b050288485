//! Round countdown and end of round
//!
//! `Running → Ended`, one way. Ending the round is the one place where timer
//! cleanup matters: every movement timer and the pending multiplier expiry are
//! cancelled so nothing touches frozen state afterwards.

use serde::{Deserialize, Serialize};

use super::state::{CreatureState, GameEvent, GameSession, RoundSummary};
use super::timer::{Scheduler, TimerEvent, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Running,
    /// Terminal
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    pub seconds_remaining: u32,
    pub phase: RoundPhase,
    #[serde(skip)]
    timer: Option<TimerId>,
}

impl RoundClock {
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds_remaining: seconds,
            phase: RoundPhase::Running,
            timer: None,
        }
    }

    pub fn start(&mut self, interval_ms: u64, sched: &mut dyn Scheduler) {
        if self.timer.is_none() && self.is_running() {
            self.timer = Some(sched.schedule_periodic(interval_ms, TimerEvent::Countdown));
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// One countdown step. Returns true when this step ran the clock out.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining == 0
    }

    /// Enter `Ended` and cancel the countdown timer
    pub fn stop(&mut self, sched: &mut dyn Scheduler) {
        self.phase = RoundPhase::Ended;
        if let Some(id) = self.timer.take() {
            sched.cancel(id);
        }
    }
}

impl GameSession {
    pub(crate) fn on_countdown(&mut self, sched: &mut dyn Scheduler) {
        if self.round.tick() {
            self.end_round(sched);
        } else if self.is_running() {
            log::trace!("{}s remaining", self.round.seconds_remaining);
        }
    }

    /// Stop spawning and movement, freeze the field and produce the summary.
    /// Only the first call does anything.
    pub fn end_round(&mut self, sched: &mut dyn Scheduler) -> Option<&RoundSummary> {
        if !self.is_running() {
            return None;
        }

        self.round.stop(sched);
        if let Some(id) = self.spawn_timer.take() {
            sched.cancel(id);
        }
        self.score.cancel_expiry(sched);

        let mut frozen = 0;
        for creature in self.creatures.iter_mut().filter(|c| c.is_alive()) {
            creature.release_movement(sched);
            creature.state = CreatureState::Frozen;
            frozen += 1;
        }

        let summary = RoundSummary {
            final_score: self.score.total,
            spawned: self.spawned,
            smashed: self.smashed,
            bonus_smashed: self.bonus_smashed,
            left_on_field: frozen,
        };
        log::info!(
            "Round over: score {} ({} of {} smashed, {} left)",
            summary.final_score,
            summary.smashed,
            summary.spawned,
            summary.left_on_field
        );
        self.push_event(GameEvent::RoundEnded {
            summary: summary.clone(),
        });
        self.summary = Some(summary);
        self.summary.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::VirtualClock;

    #[test]
    fn test_tick_counts_down_to_zero_once() {
        let mut round = RoundClock::new(3);
        assert!(!round.tick());
        assert!(!round.tick());
        assert!(round.tick());
        assert_eq!(round.seconds_remaining, 0);
    }

    #[test]
    fn test_ended_is_terminal() {
        let mut clock = VirtualClock::new();
        let mut round = RoundClock::new(5);
        round.start(1000, &mut clock);
        assert_eq!(clock.pending(), 1);

        round.stop(&mut clock);
        assert_eq!(round.phase, RoundPhase::Ended);
        assert_eq!(clock.pending(), 0);
        assert!(!round.tick());
        assert_eq!(round.seconds_remaining, 5);

        round.start(1000, &mut clock);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut clock = VirtualClock::new();
        let mut round = RoundClock::new(5);
        round.start(1000, &mut clock);
        round.start(1000, &mut clock);
        assert_eq!(clock.pending(), 1);
    }
}
