//! Timer scheduling
//!
//! Every periodic or one-shot trigger in a round goes through [`Scheduler`].
//! [`VirtualClock`] is the deterministic implementation: it never reads
//! wall-clock time, the host (or a test) advances it explicitly, and due
//! timers fire in (due time, scheduling order).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// Handle returned by the scheduler, valid until the timer fires (one-shot)
/// or is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What a timer means when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Round countdown tick
    Countdown,
    /// Spawn attempt
    Spawn,
    /// Movement step for one creature
    Move(EntityId),
    /// Multiplier window closed
    MultiplierExpired,
    /// Fade-out finished, drop the creature
    Detach(EntityId),
}

pub trait Scheduler {
    /// Current time in milliseconds since the clock started
    fn now_ms(&self) -> u64;
    fn schedule_once(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId;
    /// First fire is one period from now. A zero period is treated as 1 ms.
    fn schedule_periodic(&mut self, period_ms: u64, event: TimerEvent) -> TimerId;
    /// Returns false if the timer already fired or was cancelled
    fn cancel(&mut self, id: TimerId) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    event: TimerEvent,
    period_ms: Option<u64>,
}

/// Queue key: (due time, scheduling sequence)
type Slot = (u64, u64);

/// Manually advanced clock
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<Slot, PendingTimer>,
    slots: HashMap<TimerId, Slot>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers waiting to fire
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Events currently queued, in firing order
    pub fn pending_events(&self) -> impl Iterator<Item = TimerEvent> + '_ {
        self.queue.values().map(|t| t.event)
    }

    /// Pop the next timer due at or before `until_ms`, moving the clock to its
    /// due time. Periodic timers are re-queued one period later under the same id.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerEvent> {
        let (&slot, _) = self.queue.first_key_value()?;
        if slot.0 > until_ms {
            return None;
        }
        let timer = self.queue.remove(&slot)?;
        self.slots.remove(&timer.id);
        self.now_ms = self.now_ms.max(slot.0);

        if let Some(period) = timer.period_ms {
            self.enqueue(slot.0 + period, timer);
        }
        Some(timer.event)
    }

    /// Move the clock forward without firing anything. Never goes backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn enqueue(&mut self, due_ms: u64, timer: PendingTimer) {
        let slot = (due_ms, self.next_seq);
        self.next_seq += 1;
        self.slots.insert(timer.id, slot);
        self.queue.insert(slot, timer);
    }

    fn allocate(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Scheduler for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_once(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId {
        let id = self.allocate();
        let due = self.now_ms + delay_ms;
        self.enqueue(
            due,
            PendingTimer {
                id,
                event,
                period_ms: None,
            },
        );
        id
    }

    fn schedule_periodic(&mut self, period_ms: u64, event: TimerEvent) -> TimerId {
        let period = period_ms.max(1);
        let id = self.allocate();
        let due = self.now_ms + period;
        self.enqueue(
            due,
            PendingTimer {
                id,
                event,
                period_ms: Some(period),
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.slots.remove(&id) {
            Some(slot) => self.queue.remove(&slot).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut VirtualClock, until: u64) -> Vec<(u64, TimerEvent)> {
        let mut fired = Vec::new();
        while let Some(event) = clock.pop_due(until) {
            fired.push((clock.now_ms(), event));
        }
        clock.set_now(until);
        fired
    }

    #[test]
    fn test_once_fires_exactly_once() {
        let mut clock = VirtualClock::new();
        let id = clock.schedule_once(100, TimerEvent::MultiplierExpired);
        assert!(clock.is_scheduled(id));

        assert!(drain(&mut clock, 99).is_empty());
        assert_eq!(drain(&mut clock, 100), vec![(100, TimerEvent::MultiplierExpired)]);
        assert!(drain(&mut clock, 1000).is_empty());
        assert!(!clock.is_scheduled(id));
        assert!(!clock.cancel(id));
    }

    #[test]
    fn test_periodic_repeats_under_same_id() {
        let mut clock = VirtualClock::new();
        let id = clock.schedule_periodic(50, TimerEvent::Move(7));

        let fired = drain(&mut clock, 200);
        let times: Vec<u64> = fired.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![50, 100, 150, 200]);
        assert!(clock.is_scheduled(id));

        assert!(clock.cancel(id));
        assert!(drain(&mut clock, 1000).is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_same_instant_fires_in_scheduling_order() {
        let mut clock = VirtualClock::new();
        clock.schedule_periodic(1000, TimerEvent::Countdown);
        clock.schedule_periodic(1000, TimerEvent::Spawn);

        let events: Vec<TimerEvent> = drain(&mut clock, 3000).into_iter().map(|(_, e)| e).collect();
        assert_eq!(
            events,
            vec![
                TimerEvent::Countdown,
                TimerEvent::Spawn,
                TimerEvent::Countdown,
                TimerEvent::Spawn,
                TimerEvent::Countdown,
                TimerEvent::Spawn,
            ]
        );
    }

    #[test]
    fn test_zero_period_does_not_spin() {
        let mut clock = VirtualClock::new();
        clock.schedule_periodic(0, TimerEvent::Spawn);
        assert_eq!(drain(&mut clock, 10).len(), 10);
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut clock = VirtualClock::new();
        clock.set_now(5000);
        clock.schedule_once(10, TimerEvent::Detach(1));
        assert_eq!(drain(&mut clock, 5010), vec![(5010, TimerEvent::Detach(1))]);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut clock = VirtualClock::new();
        clock.set_now(300);
        clock.set_now(100);
        assert_eq!(clock.now_ms(), 300);
    }
}
