//! Entity spawning on a ramped, level-scaled probability schedule

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityKind};
use super::state::SessionState;
use crate::consts::ZONE_FRACTION;
use crate::tuning::SpawnTuning;

/// Spawn probability from the time ramp alone (no level or boost scaling).
///
/// Linear from `initial_rate` at t = 0 to exactly `max_rate` at the end of the ramp.
pub fn base_spawn_rate(elapsed_ms: f64, cfg: &SpawnTuning) -> f32 {
    if elapsed_ms >= cfg.ramp_duration_ms {
        return cfg.max_rate;
    }
    let t = (elapsed_ms.max(0.0) / cfg.ramp_duration_ms) as f32;
    cfg.initial_rate + (cfg.max_rate - cfg.initial_rate) * t
}

/// Ramp rate scaled by the level multiplier, as a probability
pub fn effective_rate(state: &SessionState) -> f32 {
    (base_spawn_rate(state.now_ms, &state.tuning.spawn) * state.level.spawn_rate_multiplier).clamp(0.0, 1.0)
}

/// Spawner step: scroll live entities, then roll for new ones when the check
/// interval has passed
pub fn update(state: &mut SessionState, dt_ms: f64) {
    if !state.is_running() {
        return;
    }

    let frames = (dt_ms.max(0.0) / state.tuning.clock.nominal_frame_ms) as f32;
    for entity in &mut state.entities {
        entity.update(frames);
    }

    let interval = if state.boost.is_active() {
        state.tuning.spawn.boost_check_interval_ms
    } else {
        state.tuning.spawn.check_interval_ms
    };
    if state.now_ms - state.spawner.last_check_ms > interval {
        state.spawner.last_check_ms = state.now_ms;
        roll_spawns(state);
    }
}

fn roll_spawns(state: &mut SessionState) {
    let rate = effective_rate(state);
    let (count, collectible_p, hazard_p) = if state.boost.is_active() {
        (state.tuning.spawn.boost_spawn_count, (rate * 2.0).min(1.0), rate)
    } else {
        (1, rate, rate * 0.5)
    };

    for _ in 0..count {
        if state.rng().random_bool(collectible_p as f64) {
            let i = state.rng().random_range(0..EntityKind::COLLECTIBLES.len());
            spawn(state, EntityKind::COLLECTIBLES[i]);
        }
    }

    if state.rng().random_bool(hazard_p as f64) {
        spawn(state, EntityKind::Hazard);
    }

    let chance = state.tuning.spawn.power_up_chance.clamp(0.0, 1.0) as f64;
    if !state.has_power_up_on_screen()
        && state.spawner.power_ups_this_level < state.tuning.spawn.power_ups_per_level
        && state.rng().random_bool(chance)
    {
        state.spawner.power_ups_this_level += 1;
        spawn(state, EntityKind::PowerUp);
    }
}

/// Place a new entity at the right edge, below the trick zone and above the
/// bottom margin
pub fn spawn(state: &mut SessionState, kind: EntityKind) {
    let size = kind.size(&state.tuning.items);
    let vp = &state.tuning.viewport;
    let top = vp.height * ZONE_FRACTION;
    let bottom = vp.height - state.tuning.spawn.bottom_margin - size;
    let x = vp.width;
    let vel_x = -state.tuning.spawn.base_speed * state.level.speed_multiplier;

    let y = if bottom > top {
        state.rng().random_range(top..bottom)
    } else {
        top
    };

    let id = state.next_entity_id();
    log::debug!("Spawn {:?} #{} at y={:.0}", kind, id, y);
    state
        .entities
        .push(Entity::new(id, kind, Vec2::new(x, y), Vec2::splat(size), vel_x));
}
