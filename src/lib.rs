//! Bug Smash - a timed insect-smashing arcade round
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (spawning, movement, scoring, countdown)
//! - `settings`: Startup configuration with validation
//! - `view`: Projection of a round onto a display surface

pub mod settings;
pub mod sim;
pub mod view;

pub use settings::{ConfigError, GameConfig};
pub use sim::{Catalog, GameSession, Scheduler, VirtualClock};
pub use view::{DisplaySurface, Presenter};

/// Game configuration defaults
pub mod consts {
    /// Round length in seconds
    pub const ROUND_SECS: u32 = 60;
    /// Countdown tick period (ms)
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;
    /// Spawn attempt period (ms)
    pub const SPAWN_INTERVAL_MS: u64 = 1000;
    /// Per-creature movement step period (ms)
    pub const MOVE_INTERVAL_MS: u64 = 50;

    /// Per-axis speed range, units per movement step
    pub const MIN_SPEED: f32 = 2.0;
    pub const MAX_SPEED: f32 = 6.0;
    /// Square footprint of a creature
    pub const CREATURE_SIZE: f32 = 80.0;

    /// Play-field area per creature slot (units²). Higher means fewer creatures.
    pub const DENSITY_FACTOR: f32 = 2000.0;
    /// Capacity floor for tiny play fields
    pub const MIN_CAPACITY: usize = 5;

    /// Multiplier window after smashing the bonus creature
    pub const MULTIPLIER_MS: u64 = 10_000;
    pub const MULTIPLIER_FACTOR: u32 = 2;
    /// Chance a spawn picks the bonus creature while none is on the field
    pub const BONUS_CHANCE: f64 = 0.10;

    /// Fade-out before a smashed creature is detached (cosmetic)
    pub const FADE_MS: u64 = 100;
}
