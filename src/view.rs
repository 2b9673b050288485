//! Projection of a round onto a display surface
//!
//! The sim knows nothing about pixels. Each frame the host asks for the sprite
//! list and HUD, and [`Presenter`] turns the difference from the last frame
//! into create / update / remove calls on whatever surface the host has.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{CreatureState, EntityId, GameSession, ImageHandle, RoundSummary};

/// One creature as the display sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: EntityId,
    pub name: String,
    pub image: ImageHandle,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Drawn with the shine effect
    pub bonus: bool,
    /// Smashed, fading out
    pub fading: bool,
    /// Accepts clicks
    pub interactive: bool,
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub seconds_remaining: u32,
    pub multiplier: u32,
    /// Score is shown highlighted while the multiplier is active
    pub boosted: bool,
}

pub fn sprites(session: &GameSession) -> Vec<Sprite> {
    let size = session.config.creature_size;
    session
        .creatures
        .iter()
        .filter_map(|c| {
            let def = session.catalog.get(c.definition)?;
            Some(Sprite {
                id: c.id,
                name: def.name.clone(),
                image: def.image.clone(),
                pos: c.pos,
                size,
                bonus: c.is_bonus(),
                fading: c.state == CreatureState::Fading,
                interactive: c.is_alive(),
            })
        })
        .collect()
}

pub fn hud(session: &GameSession) -> Hud {
    Hud {
        score: session.score.total,
        seconds_remaining: session.round.seconds_remaining,
        multiplier: session.score.multiplier,
        boosted: session.score.is_boosted(),
    }
}

/// Retained-mode display target
pub trait DisplaySurface {
    fn create(&mut self, sprite: &Sprite);
    fn update(&mut self, sprite: &Sprite);
    fn remove(&mut self, id: EntityId);
    fn show_hud(&mut self, hud: &Hud);
    fn show_summary(&mut self, summary: &RoundSummary);
}

/// Keeps a surface in sync with a session
#[derive(Debug, Default)]
pub struct Presenter {
    shown: BTreeSet<EntityId>,
    summary_shown: bool,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(&mut self, session: &GameSession, surface: &mut dyn DisplaySurface) {
        let current = sprites(session);
        let live: BTreeSet<EntityId> = current.iter().map(|s| s.id).collect();

        for id in self.shown.difference(&live) {
            surface.remove(*id);
        }
        for sprite in &current {
            if self.shown.contains(&sprite.id) {
                surface.update(sprite);
            } else {
                surface.create(sprite);
            }
        }
        self.shown = live;

        surface.show_hud(&hud(session));

        if let Some(summary) = &session.summary {
            if !self.summary_shown {
                surface.show_summary(summary);
                self.summary_shown = true;
            }
        }
    }

    /// Forget everything shown (new round on a cleared surface)
    pub fn reset(&mut self) {
        self.shown.clear();
        self.summary_shown = false;
    }
}
