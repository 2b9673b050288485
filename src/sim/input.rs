//! Click handling
//!
//! A click only counts on a live creature while the round runs. Everything else
//! (empty space, a fading creature, a frozen field) is silently ignored.

use super::catalog::CreatureKind;
use super::state::{CreatureState, EntityId, GameEvent, GameSession};
use super::timer::{Scheduler, TimerEvent};

impl GameSession {
    /// Smash a creature. Returns the points earned, or `None` if the click
    /// didn't land on anything smashable.
    ///
    /// The multiplier applied is whatever is active at the moment of the click;
    /// smashing the bonus creature boosts its own (zero) points too.
    pub fn smash(&mut self, id: EntityId, sched: &mut dyn Scheduler) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        let creature = self
            .creatures
            .iter_mut()
            .find(|c| c.id == id && c.is_alive())?;

        creature.release_movement(sched);
        creature.state = CreatureState::Fading;
        let (kind, points) = (creature.kind, creature.points);

        if kind == CreatureKind::Bonus {
            let until = self.score.activate_multiplier(
                self.config.multiplier_factor,
                self.config.multiplier_ms,
                sched,
            );
            self.bonus_present = false;
            self.bonus_smashed += 1;
            self.push_event(GameEvent::MultiplierActivated { until_ms: until });
            log::debug!("Multiplier x{} until {}ms", self.score.multiplier, until);
        }

        let earned = self.score.earned(points);
        self.score.add(earned);
        self.smashed += 1;

        sched.schedule_once(self.config.fade_ms, TimerEvent::Detach(id));

        log::debug!(
            "Smashed #{} for {} (total {})",
            id,
            earned,
            self.score.total
        );
        self.push_event(GameEvent::Smashed {
            id,
            earned,
            total: self.score.total,
        });
        Some(earned)
    }

    /// Fade-out finished: the creature leaves the field and frees its slot
    pub(crate) fn on_detach(&mut self, id: EntityId) {
        let before = self.creatures.len();
        self.creatures
            .retain(|c| !(c.id == id && c.state == CreatureState::Fading));
        if self.creatures.len() < before {
            self.push_event(GameEvent::Detached { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::{Catalog, PlayField, VirtualClock, advance};

    fn quiet_session(clock: &mut VirtualClock) -> GameSession {
        let config = GameConfig {
            bonus_chance: 0.0,
            ..Default::default()
        };
        GameSession::start(
            config,
            Catalog::builtin(),
            PlayField::new(800.0, 600.0),
            42,
            clock,
        )
    }

    #[test]
    fn test_smash_scores_and_stops_movement() {
        let mut clock = VirtualClock::new();
        let mut s = quiet_session(&mut clock);
        let spider = s.catalog.find("Spider").expect("builtin spider");
        let id = s
            .place(spider, Vec2::new(100.0, 100.0), Vec2::new(3.0, 3.0), &mut clock)
            .expect("room");

        assert_eq!(s.smash(id, &mut clock), Some(5));
        assert_eq!(s.score.total, 5);

        let frozen_at = s.creature(id).map(|c| c.pos);
        advance(&mut s, &mut clock, 50);
        assert_eq!(s.creature(id).map(|c| c.pos), frozen_at);
        assert_eq!(s.creature(id).map(|c| c.state), Some(CreatureState::Fading));
    }

    #[test]
    fn test_smash_twice_is_noop() {
        let mut clock = VirtualClock::new();
        let mut s = quiet_session(&mut clock);
        let id = s
            .place(0, Vec2::new(10.0, 10.0), Vec2::ONE, &mut clock)
            .expect("room");

        assert_eq!(s.smash(id, &mut clock), Some(1));
        assert_eq!(s.smash(id, &mut clock), None);
        assert_eq!(s.score.total, 1);
        assert_eq!(s.smashed, 1);
    }

    #[test]
    fn test_smash_unknown_id_is_noop() {
        let mut clock = VirtualClock::new();
        let mut s = quiet_session(&mut clock);
        assert_eq!(s.smash(9999, &mut clock), None);
        assert_eq!(s.score.total, 0);
    }

    #[test]
    fn test_detach_after_fade() {
        let mut clock = VirtualClock::new();
        let mut s = quiet_session(&mut clock);
        let id = s
            .place(0, Vec2::new(10.0, 10.0), Vec2::ONE, &mut clock)
            .expect("room");
        s.smash(id, &mut clock);

        advance(&mut s, &mut clock, 99);
        assert!(s.creature(id).is_some());
        advance(&mut s, &mut clock, 1);
        assert!(s.creature(id).is_none());
        assert!(
            s.drain_events()
                .contains(&GameEvent::Detached { id })
        );
    }

    #[test]
    fn test_bonus_activates_multiplier_and_clears_flag() {
        let mut clock = VirtualClock::new();
        let mut s = quiet_session(&mut clock);
        let bonus = s.catalog.bonus_index();
        let id = s
            .place(bonus, Vec2::new(10.0, 10.0), Vec2::ONE, &mut clock)
            .expect("room");
        assert!(s.bonus_present);

        assert_eq!(s.smash(id, &mut clock), Some(0));
        assert!(!s.bonus_present);
        assert_eq!(s.score.multiplier, 2);
        assert_eq!(s.bonus_smashed, 1);

        // A new bonus may now be placed even before the old one is detached
        assert!(s.place(bonus, Vec2::ZERO, Vec2::ONE, &mut clock).is_some());
    }

    #[test]
    fn test_no_clicks_after_round_end() {
        let mut clock = VirtualClock::new();
        let mut s = quiet_session(&mut clock);
        let id = s
            .place(0, Vec2::new(10.0, 10.0), Vec2::ONE, &mut clock)
            .expect("room");

        s.end_round(&mut clock);
        assert_eq!(s.smash(id, &mut clock), None);
        assert_eq!(s.creature(id).map(|c| c.state), Some(CreatureState::Frozen));
    }
}
