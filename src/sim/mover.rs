//! Creature movement
//!
//! Each creature steps on its own timer. Walls reflect the velocity on the
//! axis that hit them; speed is never re-rolled after spawn.

use glam::Vec2;

use super::state::{EntityId, GameSession};

/// Advance one axis by one step inside `[0, max]`.
/// Touching a wall clamps to it and flips the velocity sign.
#[inline]
pub fn step_axis(pos: f32, vel: f32, max: f32) -> (f32, f32) {
    let next = pos + vel;
    if next <= 0.0 {
        (0.0, -vel)
    } else if next >= max {
        (max, -vel)
    } else {
        (next, vel)
    }
}

/// Advance a position by one step inside `[0, max.x] × [0, max.y]`
pub fn step(pos: Vec2, vel: Vec2, max: Vec2) -> (Vec2, Vec2) {
    let (x, vx) = step_axis(pos.x, vel.x, max.x);
    let (y, vy) = step_axis(pos.y, vel.y, max.y);
    (Vec2::new(x, y), Vec2::new(vx, vy))
}

impl GameSession {
    /// Movement timer fired for one creature. Bounds come from the current
    /// field so a resize takes effect immediately.
    pub(crate) fn on_move(&mut self, id: EntityId) {
        let max = self.field.max_position(self.config.creature_size);
        if let Some(creature) = self
            .creatures
            .iter_mut()
            .find(|c| c.id == id && c.is_alive())
        {
            (creature.pos, creature.vel) = step(creature.pos, creature.vel, max);
        }
    }
}
