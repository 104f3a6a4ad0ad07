//! Player controller: directional input → velocity → clamped position

use serde::{Deserialize, Serialize};

use super::state::PlayerState;
use crate::consts::VELOCITY_EPSILON;
use crate::tuning::Tuning;

/// Held direction keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionInput {
    fn axis_x(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }

    fn axis_y(&self) -> f32 {
        (self.down as i32 - self.up as i32) as f32
    }
}

/// Integrate one tick of movement.
///
/// Velocities are units per nominal frame; `dt_ms` is converted to a frame
/// count so acceleration, decay and displacement all scale with real time.
/// A negative `dt_ms` counts as zero elapsed time.
pub fn update(
    player: &mut PlayerState,
    input: &DirectionInput,
    tuning: &Tuning,
    speed_multiplier: f32,
    dt_ms: f64,
) {
    let frames = (dt_ms.max(0.0) / tuning.clock.nominal_frame_ms) as f32;
    let cfg = &tuning.player;
    let max_speed = cfg.max_speed * speed_multiplier;

    let dir_x = input.axis_x();
    if dir_x > 0.0 {
        player.facing_right = true;
    } else if dir_x < 0.0 {
        player.facing_right = false;
    }

    player.vel.x = step_axis(player.vel.x, dir_x, cfg.acceleration, max_speed, cfg.deceleration, frames);
    player.vel.y = step_axis(
        player.vel.y,
        input.axis_y(),
        cfg.acceleration,
        max_speed,
        cfg.deceleration,
        frames,
    );

    player.pos += player.vel * frames;
    clamp_to_viewport(player, tuning);
}

/// Accelerate toward `max_speed` while held, otherwise decay toward zero
fn step_axis(vel: f32, dir: f32, accel: f32, max_speed: f32, decel: f32, frames: f32) -> f32 {
    if dir != 0.0 {
        (vel + dir * accel * frames).clamp(-max_speed, max_speed)
    } else {
        let decayed = vel * decel.powf(frames);
        if decayed.abs() < VELOCITY_EPSILON {
            0.0
        } else {
            decayed
        }
    }
}

/// Keep the scaled hitbox inside the viewport; hitting a wall stops that axis
pub fn clamp_to_viewport(player: &mut PlayerState, tuning: &Tuning) {
    let size = player.size(&tuning.player);
    let max_x = (tuning.viewport.width - size.x).max(0.0);
    let max_y = (tuning.viewport.height - size.y).max(0.0);

    if player.pos.x < 0.0 || player.pos.x > max_x {
        player.pos.x = player.pos.x.clamp(0.0, max_x);
        player.vel.x = 0.0;
    }
    if player.pos.y < 0.0 || player.pos.y > max_y {
        player.pos.y = player.pos.y.clamp(0.0, max_y);
        player.vel.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const FRAME: f64 = crate::consts::NOMINAL_FRAME_MS;

    fn right() -> DirectionInput {
        DirectionInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_accelerates_to_max_speed() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(&tuning);
        player.pos = Vec2::new(10.0, 300.0);

        update(&mut player, &right(), &tuning, 1.0, FRAME);
        assert!((player.vel.x - tuning.player.acceleration).abs() < 1e-4);
        assert!(player.facing_right);

        for _ in 0..100 {
            update(&mut player, &right(), &tuning, 1.0, FRAME);
            assert!(player.vel.x <= tuning.player.max_speed);
        }
    }

    #[test]
    fn test_speed_multiplier_raises_cap() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(&tuning);
        player.pos = Vec2::new(0.0, 300.0);
        player.vel.x = tuning.player.max_speed;

        update(&mut player, &right(), &tuning, 1.5, FRAME);
        assert!(player.vel.x > tuning.player.max_speed);
    }

    #[test]
    fn test_decelerates_and_snaps_to_zero() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(&tuning);
        player.pos = Vec2::new(300.0, 300.0);
        player.vel.x = 4.0;

        update(&mut player, &DirectionInput::default(), &tuning, 1.0, FRAME);
        assert!((player.vel.x - 4.0 * 0.95).abs() < 1e-3);

        for _ in 0..200 {
            update(&mut player, &DirectionInput::default(), &tuning, 1.0, FRAME);
        }
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_wall_clamp_zeroes_velocity() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(&tuning);
        player.pos = Vec2::new(tuning.viewport.width - tuning.player.width - 1.0, 0.5);
        player.vel = Vec2::new(6.0, -6.0);

        update(&mut player, &DirectionInput::default(), &tuning, 1.0, FRAME);
        assert_eq!(player.pos.x, tuning.viewport.width - tuning.player.width);
        assert_eq!(player.pos.y, 0.0);
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_negative_dt_is_no_movement() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(&tuning);
        let start = player.pos;
        player.vel.x = 3.0;

        update(&mut player, &right(), &tuning, 1.0, -50.0);
        assert_eq!(player.pos, start);
    }

    #[test]
    fn test_facing_follows_last_direction() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(&tuning);
        let left = DirectionInput {
            left: true,
            ..Default::default()
        };
        update(&mut player, &left, &tuning, 1.0, FRAME);
        assert!(!player.facing_right);

        // Releasing keeps the last facing
        update(&mut player, &DirectionInput::default(), &tuning, 1.0, FRAME);
        assert!(!player.facing_right);
    }

    #[test]
    fn test_scaled_player_clamps_with_scaled_size() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(&tuning);
        player.scale = 0.5;
        player.pos = Vec2::new(tuning.viewport.width, tuning.viewport.height);
        clamp_to_viewport(&mut player, &tuning);
        assert_eq!(player.pos.x, tuning.viewport.width - tuning.player.width * 0.5);
        assert_eq!(player.pos.y, tuning.viewport.height - tuning.player.height * 0.5);
    }
}
