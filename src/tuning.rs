//! Data-driven game balance
//!
//! Every gameplay number lives here. `Tuning::default()` is the authoritative
//! source; a JSON file may override any subset of keys, e.g.
//!
//! ```json
//! { "trick": { "cooldown_ms": 750.0 }, "level": { "points_per_level": 1500 } }
//! ```
//!
//! Times are milliseconds, distances are viewport units, velocities are units
//! per nominal (60 Hz) frame.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning load/validation failure
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{name}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub max_health: u32,
    /// Velocity gained per frame while a direction is held
    pub acceleration: f32,
    /// Speed cap before the level speed multiplier
    pub max_speed: f32,
    /// Multiplicative velocity decay per frame when no direction is held
    pub deceleration: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 64.0,
            height: 48.0,
            max_health: 100,
            acceleration: 0.5,
            max_speed: 8.0,
            deceleration: 0.95,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub check_interval_ms: f64,
    pub boost_check_interval_ms: f64,
    pub initial_rate: f32,
    pub max_rate: f32,
    /// Time for the spawn rate to ramp from `initial_rate` to `max_rate`
    pub ramp_duration_ms: f64,
    /// Collectible trials per check during a boost
    pub boost_spawn_count: u32,
    pub power_up_chance: f32,
    pub power_ups_per_level: u32,
    /// Keep-out band above the bottom edge
    pub bottom_margin: f32,
    /// Leftward entity speed before the level speed multiplier
    pub base_speed: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            check_interval_ms: 1000.0,
            boost_check_interval_ms: 100.0,
            initial_rate: 0.3,
            max_rate: 0.8,
            ramp_duration_ms: 120_000.0,
            boost_spawn_count: 3,
            power_up_chance: 0.1,
            power_ups_per_level: 3,
            bottom_margin: 40.0,
            base_speed: 3.0,
        }
    }
}

/// Per-kind values for collectibles, hazards and the power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTuning {
    pub collectible_points: [u64; 3],
    pub collectible_heal: [u32; 3],
    pub collectible_size: [f32; 3],
    pub hazard_size: f32,
    pub hazard_damage: u32,
    pub invincibility_ms: f64,
    pub power_up_size: f32,
    pub boost_duration_ms: f64,
    /// Player scale while boosted
    pub boost_scale: f32,
    pub flash_ms: f64,
    pub popup_ms: f64,
}

impl Default for ItemTuning {
    fn default() -> Self {
        Self {
            collectible_points: [10, 20, 50],
            collectible_heal: [2, 5, 10],
            collectible_size: [32.0, 36.0, 40.0],
            hazard_size: 44.0,
            hazard_damage: 20,
            invincibility_ms: 1500.0,
            power_up_size: 36.0,
            boost_duration_ms: 10_000.0,
            boost_scale: 0.6,
            flash_ms: 200.0,
            popup_ms: 800.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickTuning {
    pub zone_duration_ms: f64,
    pub cooldown_ms: f64,
}

impl Default for TrickTuning {
    fn default() -> Self {
        Self {
            zone_duration_ms: 5000.0,
            cooldown_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub points_per_level: u64,
    pub duration_ms: f64,
    pub spawn_multiplier_cap: f32,
    pub speed_multiplier_cap: f32,
    /// Countdown shown on the level summary before play resumes
    pub summary_countdown_ms: f64,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            points_per_level: 2000,
            duration_ms: 60_000.0,
            spawn_multiplier_cap: 2.0,
            speed_multiplier_cap: 1.8,
            summary_countdown_ms: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    pub nominal_frame_ms: f64,
    pub max_frame_gap_ms: f64,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            nominal_frame_ms: crate::consts::NOMINAL_FRAME_MS,
            max_frame_gap_ms: crate::consts::MAX_FRAME_GAP_MS,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: ViewportTuning,
    pub player: PlayerTuning,
    pub spawn: SpawnTuning,
    pub items: ItemTuning,
    pub trick: TrickTuning,
    pub level: LevelTuning,
    pub clock: ClockTuning,
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("viewport.width", self.viewport.width as f64)?;
        positive("viewport.height", self.viewport.height as f64)?;
        positive("player.width", self.player.width as f64)?;
        positive("player.height", self.player.height as f64)?;
        positive("player.max_health", self.player.max_health as f64)?;
        positive("player.max_speed", self.player.max_speed as f64)?;
        positive("player.acceleration", self.player.acceleration as f64)?;
        if !(self.player.deceleration > 0.0 && self.player.deceleration < 1.0) {
            return Err(TuningError::OutOfRange {
                name: "player.deceleration",
                value: self.player.deceleration as f64,
                expected: "between 0 and 1 exclusive",
            });
        }
        if self.player.width > self.viewport.width || self.player.height > self.viewport.height {
            return Err(TuningError::OutOfRange {
                name: "player.width",
                value: self.player.width as f64,
                expected: "player must fit inside the viewport",
            });
        }

        positive("spawn.check_interval_ms", self.spawn.check_interval_ms)?;
        positive("spawn.boost_check_interval_ms", self.spawn.boost_check_interval_ms)?;
        positive("spawn.ramp_duration_ms", self.spawn.ramp_duration_ms)?;
        probability("spawn.initial_rate", self.spawn.initial_rate)?;
        probability("spawn.max_rate", self.spawn.max_rate)?;
        probability("spawn.power_up_chance", self.spawn.power_up_chance)?;
        positive("spawn.base_speed", self.spawn.base_speed as f64)?;
        if self.spawn.bottom_margin < 0.0
            || self.spawn.bottom_margin >= self.viewport.height * (1.0 - crate::consts::ZONE_FRACTION)
        {
            return Err(TuningError::OutOfRange {
                name: "spawn.bottom_margin",
                value: self.spawn.bottom_margin as f64,
                expected: "non-negative and below the spawn band",
            });
        }

        positive("items.invincibility_ms", self.items.invincibility_ms)?;
        positive("items.boost_duration_ms", self.items.boost_duration_ms)?;
        positive("items.boost_scale", self.items.boost_scale as f64)?;
        positive("items.flash_ms", self.items.flash_ms)?;
        positive("items.popup_ms", self.items.popup_ms)?;

        positive("trick.zone_duration_ms", self.trick.zone_duration_ms)?;
        positive("trick.cooldown_ms", self.trick.cooldown_ms)?;

        positive("level.points_per_level", self.level.points_per_level as f64)?;
        positive("level.duration_ms", self.level.duration_ms)?;
        at_least_one("level.spawn_multiplier_cap", self.level.spawn_multiplier_cap)?;
        at_least_one("level.speed_multiplier_cap", self.level.speed_multiplier_cap)?;
        if self.level.summary_countdown_ms < 0.0 {
            return Err(TuningError::OutOfRange {
                name: "level.summary_countdown_ms",
                value: self.level.summary_countdown_ms,
                expected: ">= 0",
            });
        }

        positive("clock.nominal_frame_ms", self.clock.nominal_frame_ms)?;
        positive("clock.max_frame_gap_ms", self.clock.max_frame_gap_ms)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            expected: "> 0",
        })
    }
}

fn probability(name: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value: value as f64,
            expected: "within [0, 1]",
        })
    }
}

fn at_least_one(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 1.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value: value as f64,
            expected: ">= 1",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning =
            Tuning::from_json(r#"{ "trick": { "cooldown_ms": 750.0 }, "level": { "points_per_level": 1500 } }"#)
                .unwrap();
        assert_eq!(tuning.trick.cooldown_ms, 750.0);
        assert_eq!(tuning.trick.zone_duration_ms, 5000.0);
        assert_eq!(tuning.level.points_per_level, 1500);
        assert_eq!(tuning.player.max_health, 100);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "spawn": { "max_rate": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { name: "spawn.max_rate", .. }));
    }

    #[test]
    fn test_rejects_bad_deceleration() {
        let err = Tuning::from_json(r#"{ "player": { "deceleration": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { name: "player.deceleration", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }
}
