//! Wave Rider - A side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Real-time simulation (player, spawning, collisions, tricks, levels)
//! - `tuning`: Data-driven game balance
//! - `game`: Frame-driven session driver used by front ends

pub mod game;
pub mod sim;
pub mod tuning;

pub use game::{Command, Game};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length (60 Hz) that per-frame velocities are expressed in
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames slower than this are skipped instead of simulated
    pub const MAX_FRAME_GAP_MS: f64 = 100.0;

    /// Velocities below this snap to zero
    pub const VELOCITY_EPSILON: f32 = 0.1;

    /// Fraction of the viewport height (from the top) covered by the trick zone
    pub const ZONE_FRACTION: f32 = 1.0 / 3.0;
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}
