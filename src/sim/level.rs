//! Level and difficulty progression
//!
//! Two triggers advance the level by exactly one:
//! - score reaching the next `points_per_level` threshold (checked on every
//!   score change via [`award_points`])
//! - the level timer running out (checked each tick via [`update`]), which also
//!   clears the field and pauses for a level summary

use super::collision;
use super::state::{GameEvent, GamePhase, LevelStats, LevelUpCause, PauseReason, PlayerState, SessionState, TrickZoneState};
use crate::tuning::LevelTuning;

/// Spawn-rate and speed multipliers for a level, each with its own cap
pub fn multipliers_for(level: u32, cfg: &LevelTuning) -> (f32, f32) {
    let base = 1.0 + 0.1 * level.saturating_sub(1) as f32;
    (
        base.min(cfg.spawn_multiplier_cap),
        base.min(cfg.speed_multiplier_cap),
    )
}

/// Add points and check the score threshold (at most one level per call)
pub fn award_points(state: &mut SessionState, points: u64) {
    if points == 0 {
        return;
    }
    state.score += points;

    let threshold = state.level.score_at_last_level_up + state.tuning.level.points_per_level;
    if state.score >= threshold {
        state.level.score_at_last_level_up = threshold;
        advance_level(state, LevelUpCause::Score);
    }
}

fn advance_level(state: &mut SessionState, cause: LevelUpCause) {
    state.level.level += 1;
    let (spawn, speed) = multipliers_for(state.level.level, &state.tuning.level);
    state.level.spawn_rate_multiplier = spawn;
    state.level.speed_multiplier = speed;
    state.spawner.power_ups_this_level = 0;

    log::info!(
        "Level {} ({:?}): spawn x{:.2}, speed x{:.2}",
        state.level.level,
        cause,
        spawn,
        speed
    );
    state.emit(GameEvent::LevelUp {
        level: state.level.level,
        cause,
    });
}

/// Level progression step; runs last in the tick
pub fn update(state: &mut SessionState, dt_ms: f64) {
    if !state.is_running() {
        return;
    }
    state.level.elapsed_in_level_ms += dt_ms.max(0.0);
    if state.level.elapsed_in_level_ms >= state.tuning.level.duration_ms {
        finish_timed_level(state);
    }
}

/// Level timer ran out: summary, next level, fresh field
fn finish_timed_level(state: &mut SessionState) {
    state.emit(GameEvent::LevelSummary {
        level: state.level.level,
        score: state.score,
        collected: state.stats.collected,
        tricks: state.stats.tricks,
    });
    advance_level(state, LevelUpCause::Timer);

    state.level.elapsed_in_level_ms = 0.0;
    state.stats = LevelStats::default();
    state.entities.clear();
    state.popups.clear();
    state.spawner.last_check_ms = state.now_ms;

    collision::end_boost(state);
    state.player.pos = PlayerState::spawn_point(&state.tuning);
    state.player.vel = glam::Vec2::ZERO;
    state.player.invincible_until = None;

    state.zone = TrickZoneState::default();
    if let Some(token) = state.trick.cooldown_token.take() {
        state.timers.cancel(token);
    }
    state.trick.in_progress = false;
    state.trick.kind = None;

    state.phase = GamePhase::Paused;
    state.pause_reason = Some(PauseReason::LevelSummary);
    state.summary_remaining_ms = state.tuning.level.summary_countdown_ms;
}

/// Count down the level summary while paused on it; resumes play at zero
pub fn update_summary(state: &mut SessionState, dt_ms: f64) {
    if state.phase != GamePhase::Paused || state.pause_reason != Some(PauseReason::LevelSummary) {
        return;
    }
    state.summary_remaining_ms -= dt_ms.max(0.0);
    if state.summary_remaining_ms <= 0.0 {
        state.summary_remaining_ms = 0.0;
        state.phase = GamePhase::Running;
        state.pause_reason = None;
        log::info!("Level {} begins", state.level.level);
        state.emit(GameEvent::Resumed);
    }
}

pub fn time_remaining_ms(state: &SessionState) -> f64 {
    (state.tuning.level.duration_ms - state.level.elapsed_in_level_ms).max(0.0)
}
