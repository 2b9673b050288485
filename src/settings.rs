//! Round configuration
//!
//! Fixed for the lifetime of a round. Hosts may override the defaults at
//! startup from JSON; nothing changes it while a round is running.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("speed range {min}..={max} is empty or negative")]
    SpeedRange { min: f32, max: f32 },
    #[error("bonus chance {0} is outside 0..=1")]
    BonusChance(f64),
}

/// Round tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Clock ===
    /// Round length (seconds)
    pub round_secs: u32,
    pub countdown_interval_ms: u64,
    pub spawn_interval_ms: u64,
    pub move_interval_ms: u64,

    // === Creatures ===
    /// Per-axis speed range (units per movement step)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Creature footprint (square)
    pub creature_size: f32,
    /// Field area per creature slot
    pub density_factor: f32,
    pub min_capacity: usize,
    /// Fade-out delay before a smashed creature leaves the field
    pub fade_ms: u64,

    // === Scoring ===
    pub multiplier_ms: u64,
    pub multiplier_factor: u32,
    pub bonus_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_secs: ROUND_SECS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            move_interval_ms: MOVE_INTERVAL_MS,

            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            creature_size: CREATURE_SIZE,
            density_factor: DENSITY_FACTOR,
            min_capacity: MIN_CAPACITY,
            fade_ms: FADE_MS,

            multiplier_ms: MULTIPLIER_MS,
            multiplier_factor: MULTIPLIER_FACTOR,
            bonus_chance: BONUS_CHANCE,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("round_secs", self.round_secs > 0),
            ("countdown_interval_ms", self.countdown_interval_ms > 0),
            ("spawn_interval_ms", self.spawn_interval_ms > 0),
            ("move_interval_ms", self.move_interval_ms > 0),
            ("multiplier_ms", self.multiplier_ms > 0),
            ("multiplier_factor", self.multiplier_factor > 0),
            ("min_capacity", self.min_capacity > 0),
            ("creature_size", self.creature_size > 0.0),
            ("density_factor", self.density_factor > 0.0),
        ];
        if let Some((field, _)) = positive.into_iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::NotPositive(field));
        }

        // NaN fails every comparison, so it lands here too
        if !(self.min_speed >= 0.0 && self.min_speed <= self.max_speed) {
            return Err(ConfigError::SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        if !(0.0..=1.0).contains(&self.bonus_chance) {
            return Err(ConfigError::BonusChance(self.bonus_chance));
        }

        Ok(())
    }
}
