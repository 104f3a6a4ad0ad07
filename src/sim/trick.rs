//! Trick zone sensor and trick state machine
//!
//! Zone: `Idle → Active → Idle`. The zone activates when the player's lower
//! edge rises above the top third of the viewport and stays active until its
//! timer runs out or the player drops back out. The trigger is not evaluated
//! while a trick is in progress; when the trick's cooldown ends the current
//! activation closes, so a player still inside gets a fresh one.
//!
//! Trick: `Ready → Performing → Cooldown → Ready`, one trick per activation,
//! cooldown measured from the start of the previous trick.

use rand::Rng;

use super::level;
use super::state::{GameEvent, SessionState, TrickKind, TrickPerformanceState};
use super::timers::TimerKind;
use crate::consts::ZONE_FRACTION;

/// Why a trick attempt was ignored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrickRejection {
    NotRunning,
    ZoneInactive,
    InProgress,
    CoolingDown { remaining_ms: f64 },
    AlreadyTrickedThisActivation,
}

/// Zone sensor step; call after the player has moved
pub fn update_zone(state: &mut SessionState, dt_ms: f64) {
    let threshold = state.tuning.viewport.height * ZONE_FRACTION;
    let in_zone = state.player.lower_edge(&state.tuning.player) < threshold;

    if state.zone.active {
        state.zone.time_remaining_ms -= dt_ms.max(0.0);
        if in_zone && state.zone.time_remaining_ms > 0.0 {
            return;
        }
        deactivate_zone(state);
    }

    // Expiry while inside falls through and re-arms immediately
    if in_zone && !state.trick.in_progress {
        state.zone.active = true;
        state.zone.time_remaining_ms = state.tuning.trick.zone_duration_ms;
        state.zone.has_tricked_this_activation = false;
        log::debug!("Trick zone active");
    }
}

fn deactivate_zone(state: &mut SessionState) {
    state.zone.active = false;
    state.zone.time_remaining_ms = 0.0;
    state.zone.has_tricked_this_activation = false;
    log::debug!("Trick zone idle");
}

/// Attempt a trick at the current session time.
///
/// On success the trick's points are awarded immediately and a cooldown timer
/// is scheduled to clear `in_progress`.
pub fn try_trick(state: &mut SessionState) -> Result<TrickKind, TrickRejection> {
    check_trick(state)?;

    let index = state.rng().random_range(0..TrickKind::ALL.len());
    let kind = TrickKind::ALL[index];
    let now = state.now_ms;

    state.trick.in_progress = true;
    state.trick.kind = Some(kind);
    state.trick.started_at = now;
    state.trick.last_trick_at = Some(now);
    state.zone.has_tricked_this_activation = true;
    state.trick.cooldown_token = Some(
        state
            .timers
            .schedule(TimerKind::TrickCooldownEnd, now + state.tuning.trick.cooldown_ms),
    );
    state.stats.tricks += 1;

    let points = kind.points();
    log::info!("Trick: {} (+{})", kind.as_str(), points);
    state.emit(GameEvent::TrickPerformed { kind, points });
    let popup_pos = state.player.pos;
    state.add_popup(format!("{} +{}", kind.as_str(), points), popup_pos, points);
    level::award_points(state, points);

    Ok(kind)
}

fn check_trick(state: &SessionState) -> Result<(), TrickRejection> {
    if !state.is_running() {
        return Err(TrickRejection::NotRunning);
    }
    if !state.zone.active {
        return Err(TrickRejection::ZoneInactive);
    }
    if state.trick.in_progress {
        return Err(TrickRejection::InProgress);
    }
    if let Some(last) = state.trick.last_trick_at {
        let since = state.now_ms - last;
        let cooldown = state.tuning.trick.cooldown_ms;
        if since < cooldown {
            return Err(TrickRejection::CoolingDown {
                remaining_ms: cooldown - since,
            });
        }
    }
    if state.zone.has_tricked_this_activation {
        return Err(TrickRejection::AlreadyTrickedThisActivation);
    }
    Ok(())
}

/// Scheduled cooldown expiry. Closes the zone activation the trick was
/// performed in; the next sensor step re-evaluates the trigger.
pub fn finish_trick(state: &mut SessionState) {
    state.trick.in_progress = false;
    state.trick.kind = None;
    state.trick.cooldown_token = None;
    if state.zone.active {
        deactivate_zone(state);
    }
}

/// Animation progress in `[0, 1]` for the trick in flight
pub fn animation_progress(trick: &TrickPerformanceState, now_ms: f64, cooldown_ms: f64) -> Option<f32> {
    trick.kind?;
    Some(((now_ms - trick.started_at) / cooldown_ms).clamp(0.0, 1.0) as f32)
}
