//! Creature spawning
//!
//! Capacity scales with the play-field area so small screens don't get
//! swamped. The bonus creature is rolled only while none is alive.

use glam::Vec2;
use rand::Rng;

use super::catalog::CreatureKind;
use super::state::{Creature, CreatureState, EntityId, GameEvent, GameSession, PlayField};
use super::timer::{Scheduler, TimerEvent};

/// Maximum creatures on a field: `max(floor, floor(area / density))`
pub fn capacity(field: &PlayField, density_factor: f32, min_capacity: usize) -> usize {
    let slots = (field.area() / f64::from(density_factor)).floor();
    // `as` saturates, and NaN (zero density) becomes 0
    (slots as usize).max(min_capacity)
}

/// Per-axis speed with a random sign
fn random_speed<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    let magnitude = if max > min {
        rng.random_range(min..=max)
    } else {
        min
    };
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

impl GameSession {
    pub fn capacity(&self) -> usize {
        capacity(
            &self.field,
            self.config.density_factor,
            self.config.min_capacity,
        )
    }

    /// Pick a catalog index for the next spawn
    pub fn choose_definition(&mut self) -> usize {
        if !self.bonus_present && self.rng.random::<f64>() < self.config.bonus_chance {
            return self.catalog.bonus_index();
        }
        let standard = self.catalog.standard_indices();
        let pick = self.rng.random_range(0..standard.len());
        standard[pick]
    }

    /// Periodic spawn: one random creature at a random spot, if there is room
    pub fn spawn(&mut self, sched: &mut dyn Scheduler) -> Option<EntityId> {
        if !self.is_running() {
            return None;
        }
        if self.field_count() >= self.capacity() {
            log::trace!("Spawn skipped: field full ({})", self.field_count());
            return None;
        }

        let definition = self.choose_definition();
        let max = self.field.max_position(self.config.creature_size);
        let pos = Vec2::new(
            self.rng.random::<f32>() * max.x,
            self.rng.random::<f32>() * max.y,
        );
        let (min_speed, max_speed) = (self.config.min_speed, self.config.max_speed);
        let vel = Vec2::new(
            random_speed(&mut self.rng, min_speed, max_speed),
            random_speed(&mut self.rng, min_speed, max_speed),
        );

        self.place(definition, pos, vel, sched)
    }

    /// Put a specific creature on the field. Same rules as a periodic spawn:
    /// the round must be running, there must be room, and a second bonus
    /// creature is refused while one is alive.
    pub fn place(
        &mut self,
        definition: usize,
        pos: Vec2,
        vel: Vec2,
        sched: &mut dyn Scheduler,
    ) -> Option<EntityId> {
        if !self.is_running() || self.field_count() >= self.capacity() {
            return None;
        }
        let def = self.catalog.get(definition)?;
        if def.kind == CreatureKind::Bonus && self.bonus_present {
            return None;
        }
        let (kind, points, name) = (def.kind, def.points, def.name.clone());

        let id = self.next_entity_id();
        let max = self.field.max_position(self.config.creature_size);
        let creature = Creature {
            id,
            definition,
            kind,
            points,
            pos: pos.clamp(Vec2::ZERO, max),
            vel,
            state: CreatureState::Alive,
            move_timer: Some(
                sched.schedule_periodic(self.config.move_interval_ms, TimerEvent::Move(id)),
            ),
        };
        self.creatures.push(creature);
        self.spawned += 1;

        if kind == CreatureKind::Bonus {
            self.bonus_present = true;
        }
        log::debug!("Spawned {} #{} ({:?})", name, id, kind);
        self.push_event(GameEvent::Spawned { id, name, kind });
        Some(id)
    }
}
