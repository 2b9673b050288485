//! Round state and core simulation types
//!
//! A [`GameSession`] owns everything a round needs. There is no ambient state:
//! hosts hold the session and feed it timer events and clicks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, CreatureKind};
use super::round::RoundClock;
use super::score::ScoreEngine;
use super::timer::{Scheduler, TimerEvent, TimerId};
use crate::settings::GameConfig;

pub type EntityId = u32;

/// Lifecycle of a spawned creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureState {
    /// Moving and clickable
    Alive,
    /// Smashed, waiting to be detached
    Fading,
    /// Round ended while it was alive
    Frozen,
}

/// Play-field dimensions. Creatures live in `[0, width - size] × [0, height - size]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        f64::from(self.width.max(0.0)) * f64::from(self.height.max(0.0))
    }

    /// Largest top-left position for a creature of the given size
    pub fn max_position(&self, size: f32) -> Vec2 {
        Vec2::new((self.width - size).max(0.0), (self.height - size).max(0.0))
    }
}

/// A creature on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: EntityId,
    /// Catalog index
    pub definition: usize,
    pub kind: CreatureKind,
    pub points: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Units per movement step
    pub vel: Vec2,
    pub state: CreatureState,
    #[serde(skip)]
    pub move_timer: Option<TimerId>,
}

impl Creature {
    pub fn is_alive(&self) -> bool {
        self.state == CreatureState::Alive
    }

    pub fn is_bonus(&self) -> bool {
        self.kind == CreatureKind::Bonus
    }

    /// Cancel the movement timer. Only the first call releases anything.
    pub fn release_movement(&mut self, sched: &mut dyn Scheduler) -> bool {
        match self.move_timer.take() {
            Some(id) => sched.cancel(id),
            None => false,
        }
    }
}

/// Something a host may want to react to (logging, sound, effects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Spawned {
        id: EntityId,
        name: String,
        kind: CreatureKind,
    },
    Smashed {
        id: EntityId,
        earned: u64,
        total: u64,
    },
    MultiplierActivated {
        until_ms: u64,
    },
    MultiplierExpired,
    Detached {
        id: EntityId,
    },
    RoundEnded {
        summary: RoundSummary,
    },
}

/// End-of-round report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub final_score: u64,
    pub spawned: u32,
    pub smashed: u32,
    pub bonus_smashed: u32,
    /// Creatures frozen in place when the clock ran out
    pub left_on_field: u32,
}

impl RoundSummary {
    pub fn message(&self) -> String {
        format!("GAME OVER! Final Score: {}", self.final_score)
    }
}

/// One round of play
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    pub catalog: Catalog,
    pub field: PlayField,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Creatures on the field (sorted by id)
    pub creatures: Vec<Creature>,
    pub score: ScoreEngine,
    pub round: RoundClock,
    /// A bonus creature is alive somewhere on the field
    pub bonus_present: bool,
    pub spawned: u32,
    pub smashed: u32,
    pub bonus_smashed: u32,
    /// Set once, when the round ends
    pub summary: Option<RoundSummary>,
    pub(crate) spawn_timer: Option<TimerId>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameSession {
    /// Build a session and start its timers. The first spawn happens right away.
    pub fn start(
        config: GameConfig,
        catalog: Catalog,
        field: PlayField,
        seed: u64,
        sched: &mut dyn Scheduler,
    ) -> Self {
        let mut session = Self {
            round: RoundClock::new(config.round_secs),
            config,
            catalog,
            field,
            seed,
            creatures: Vec::new(),
            score: ScoreEngine::default(),
            bonus_present: false,
            spawned: 0,
            smashed: 0,
            bonus_smashed: 0,
            summary: None,
            spawn_timer: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        };

        session
            .round
            .start(session.config.countdown_interval_ms, sched);
        session.spawn_timer =
            Some(sched.schedule_periodic(session.config.spawn_interval_ms, TimerEvent::Spawn));
        session.spawn(sched);

        log::info!(
            "Round started: {}s, field {}x{}, capacity {}, seed {}",
            session.config.round_secs,
            session.field.width,
            session.field.height,
            session.capacity(),
            seed
        );
        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.round.is_running()
    }

    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    /// Creatures occupying a slot (alive, fading or frozen)
    pub fn field_count(&self) -> usize {
        self.creatures.len()
    }

    pub fn alive_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.is_alive()).count()
    }

    pub fn alive_bonus_count(&self) -> usize {
        self.creatures
            .iter()
            .filter(|c| c.is_alive() && c.is_bonus())
            .count()
    }

    /// Play field changed size (responsive layout). Takes effect on the next
    /// spawn and the next movement step of each creature.
    pub fn resize(&mut self, field: PlayField) {
        if field != self.field {
            log::debug!("Field resized to {}x{}", field.width, field.height);
            self.field = field;
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
