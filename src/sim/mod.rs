//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through a [`Scheduler`]
//! - Seeded RNG only
//! - Stable iteration order (by creature ID)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod input;
pub mod mover;
pub mod round;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use catalog::{Catalog, CatalogError, CreatureDefinition, CreatureKind, ImageHandle};
pub use mover::{step, step_axis};
pub use round::{RoundClock, RoundPhase};
pub use score::ScoreEngine;
pub use spawner::capacity;
pub use state::{
    Creature, CreatureState, EntityId, GameEvent, GameSession, PlayField, RoundSummary,
};
pub use tick::{advance, dispatch};
pub use timer::{Scheduler, TimerEvent, TimerId, VirtualClock};
