//! Collision detection and resolution against the player hitbox
//!
//! Overlaps are gathered first against a snapshot of the player, then
//! resolved by kind in a fixed order (power-ups, collectibles, hazards), so
//! the result never depends on where an entity sits in the list.

use super::level;
use super::player;
use super::state::{FlashKind, GameEvent, SessionState};
use super::timers::TimerKind;
use crate::sim::entity::EntityKind;

/// Resolve every overlap between the player and live entities
pub fn resolve(state: &mut SessionState) {
    if !state.is_running() {
        return;
    }

    let hitbox = state.player.hitbox(&state.tuning.player);
    let mut power_ups = Vec::new();
    let mut collectibles = Vec::new();
    let mut hazards = Vec::new();

    for (idx, entity) in state.entities.iter().enumerate() {
        if entity.removal_pending || entity.is_deflected() || !entity.overlaps(&hitbox) {
            continue;
        }
        match entity.kind {
            EntityKind::PowerUp => power_ups.push(idx),
            EntityKind::CollectibleA | EntityKind::CollectibleB | EntityKind::CollectibleC => {
                collectibles.push(idx)
            }
            EntityKind::Hazard => hazards.push(idx),
        }
    }

    if !power_ups.is_empty() {
        for &idx in &power_ups {
            state.entities[idx].removal_pending = true;
        }
        activate_boost(state);
    }

    for &idx in &collectibles {
        collect(state, idx);
    }

    for &idx in &hazards {
        hit_hazard(state, idx);
        if !state.is_running() {
            break;
        }
    }
}

fn collect(state: &mut SessionState, idx: usize) {
    let entity = &mut state.entities[idx];
    entity.removal_pending = true;
    let kind = entity.kind;
    let pos = entity.pos;
    let Some(i) = kind.collectible_index() else {
        return;
    };

    let points = state.tuning.items.collectible_points[i];
    let heal = state.tuning.items.collectible_heal[i];
    let max_health = state.tuning.player.max_health;
    state.player.health = (state.player.health + heal).min(max_health);
    state.stats.collected += 1;

    state.set_flash(FlashKind::Collect);
    state.emit(GameEvent::CollectibleCaught { kind, points });
    state.add_popup(format!("+{}", points), pos, points);
    level::award_points(state, points);
}

fn hit_hazard(state: &mut SessionState, idx: usize) {
    let now = state.now_ms;

    if state.boost.is_active() {
        let entity = &mut state.entities[idx];
        entity.deflected_at = Some(now);
        let entity_id = entity.id;
        log::debug!("Hazard {} deflected", entity_id);
        state.emit(GameEvent::HazardDeflected { entity_id });
        return;
    }

    if state.player.is_invincible(now) {
        return;
    }

    let damage = state.tuning.items.hazard_damage;
    state.player.health = state.player.health.saturating_sub(damage);
    state.player.invincible_until = Some(now + state.tuning.items.invincibility_ms);
    state.set_flash(FlashKind::Damage);
    state.emit(GameEvent::HazardHit {
        damage,
        health: state.player.health,
    });

    if state.player.health == 0 {
        state.entities[idx].removal_pending = true;
        state.end_session();
    }
}

/// Start (or extend) the boost window: alternate scale, full health
pub fn activate_boost(state: &mut SessionState) {
    let now = state.now_ms;
    if let Some(token) = state.boost.token.take() {
        state.timers.cancel(token);
    }
    let until = now + state.tuning.items.boost_duration_ms;
    state.boost.active_until = Some(until);
    state.boost.token = Some(state.timers.schedule(TimerKind::BoostEnd, until));

    state.player.scale = state.tuning.items.boost_scale;
    state.player.health = state.tuning.player.max_health;
    player::clamp_to_viewport(&mut state.player, &state.tuning);

    log::info!("Boost active until {:.0}ms", until);
    state.emit(GameEvent::PowerUpActivated);
}

/// End the boost window and restore normal scale
pub fn end_boost(state: &mut SessionState) {
    if let Some(token) = state.boost.token.take() {
        state.timers.cancel(token);
    }
    if state.boost.active_until.take().is_none() {
        return;
    }
    state.player.scale = 1.0;
    player::clamp_to_viewport(&mut state.player, &state.tuning);
    log::debug!("Boost ended");
    state.emit(GameEvent::BoostEnded);
}
