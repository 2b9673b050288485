//! Timer dispatch
//!
//! Routes fired timers to the component that owns them, and drives a
//! [`VirtualClock`] forward for frame-based hosts and tests.

use super::state::GameSession;
use super::timer::{Scheduler, TimerEvent, VirtualClock};

/// Handle one fired timer
pub fn dispatch(session: &mut GameSession, event: TimerEvent, sched: &mut dyn Scheduler) {
    match event {
        TimerEvent::Countdown => session.on_countdown(sched),
        TimerEvent::Spawn => {
            session.spawn(sched);
        }
        TimerEvent::Move(id) => session.on_move(id),
        TimerEvent::MultiplierExpired => session.on_multiplier_expired(),
        TimerEvent::Detach(id) => session.on_detach(id),
    }
}

/// Advance the clock by `elapsed_ms`, firing everything that falls due on the
/// way in order. Timers scheduled by handlers fire in the same call if due.
pub fn advance(session: &mut GameSession, clock: &mut VirtualClock, elapsed_ms: u64) {
    let until = clock.now_ms() + elapsed_ms;
    while let Some(event) = clock.pop_due(until) {
        dispatch(session, event, clock);
    }
    clock.set_now(until);
}
