//! Scrolling entities (fish, hazards, power-ups)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::tuning::ItemTuning;

/// Entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Hazard,
    CollectibleA,
    CollectibleB,
    CollectibleC,
    PowerUp,
}

impl EntityKind {
    pub const COLLECTIBLES: [EntityKind; 3] = [
        EntityKind::CollectibleA,
        EntityKind::CollectibleB,
        EntityKind::CollectibleC,
    ];

    /// Index into the per-collectible tuning tables
    pub fn collectible_index(&self) -> Option<usize> {
        match self {
            EntityKind::CollectibleA => Some(0),
            EntityKind::CollectibleB => Some(1),
            EntityKind::CollectibleC => Some(2),
            EntityKind::Hazard | EntityKind::PowerUp => None,
        }
    }

    pub fn is_collectible(&self) -> bool {
        self.collectible_index().is_some()
    }

    /// Square sprite size for this kind
    pub fn size(&self, items: &ItemTuning) -> f32 {
        match self {
            EntityKind::Hazard => items.hazard_size,
            EntityKind::PowerUp => items.power_up_size,
            kind => kind
                .collectible_index()
                .map(|i| items.collectible_size[i])
                .unwrap_or(items.hazard_size),
        }
    }
}

/// A moving rectangle owned by the session's entity list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity in units per nominal frame (negative = leftward)
    pub vel_x: f32,
    /// Set when consumed or off-screen; swept at the end of the tick
    pub removal_pending: bool,
    /// Session time a boosted player knocked this hazard aside
    pub deflected_at: Option<f64>,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, size: Vec2, vel_x: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            vel_x,
            removal_pending: false,
            deflected_at: None,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Advance by `frames` nominal frames and flag once fully past the left edge
    pub fn update(&mut self, frames: f32) {
        self.pos.x += self.vel_x * frames;
        if self.pos.x + self.size.x < 0.0 {
            self.removal_pending = true;
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.rect().overlaps(other)
    }

    pub fn is_deflected(&self) -> bool {
        self.deflected_at.is_some()
    }
}
