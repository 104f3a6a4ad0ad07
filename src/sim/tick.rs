//! Simulation tick
//!
//! Sequences one step of gameplay in a fixed phase order:
//! timers → player → zone/trick → spawner → collision → level.
//! Zone checks must see the post-move player and collision must see the
//! entities spawned this tick.

use serde::{Deserialize, Serialize};

use super::player::DirectionInput;
use super::state::{GameEvent, GamePhase, PauseReason, SessionState};
use super::timers::TimerKind;
use super::{collision, level, player, spawner, trick};

/// Input for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Held direction keys
    pub direction: DirectionInput,
    /// Trick button pressed since the last tick
    pub attempt_trick: bool,
}

/// Session control commands from the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
}

/// Apply a control command; commands that don't fit the current phase are ignored
pub fn apply_command(state: &mut SessionState, command: Command) {
    match (command, state.phase) {
        (Command::Start, GamePhase::Start) => {
            state.phase = GamePhase::Running;
            log::info!("Session started (seed {})", state.seed);
            state.emit(GameEvent::Started);
        }
        (Command::Pause, GamePhase::Running) => {
            state.phase = GamePhase::Paused;
            state.pause_reason = Some(PauseReason::User);
            log::info!("Paused");
            state.emit(GameEvent::Paused);
        }
        (Command::Resume, GamePhase::Paused) => {
            state.phase = GamePhase::Running;
            state.pause_reason = None;
            state.summary_remaining_ms = 0.0;
            log::info!("Resumed");
            state.emit(GameEvent::Resumed);
        }
        (Command::Reset, _) => {
            log::info!("Session reset");
            state.reset();
        }
        (command, phase) => {
            log::debug!("Ignoring {:?} while {:?}", command, phase);
        }
    }
}

/// Advance the session by `dt_ms` milliseconds.
///
/// Negative or non-finite `dt_ms` counts as zero elapsed time.
pub fn tick(state: &mut SessionState, input: &TickInput, dt_ms: f64) {
    let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

    match state.phase {
        GamePhase::Start | GamePhase::Over => return,
        GamePhase::Paused => {
            level::update_summary(state, dt);
            return;
        }
        GamePhase::Running => {}
    }

    state.now_ms += dt;
    fire_timers(state);
    if state
        .player
        .invincible_until
        .is_some_and(|until| until <= state.now_ms)
    {
        state.player.invincible_until = None;
    }

    player::update(
        &mut state.player,
        &input.direction,
        &state.tuning,
        state.level.speed_multiplier,
        dt,
    );

    trick::update_zone(state, dt);
    if input.attempt_trick {
        if let Err(reason) = trick::try_trick(state) {
            log::debug!("Trick rejected: {:?}", reason);
        }
    }

    spawner::update(state, dt);
    collision::resolve(state);
    level::update(state, dt);

    state.entities.retain(|e| !e.removal_pending);
    state.normalize_order();
}

/// Run every scheduled effect that has come due
fn fire_timers(state: &mut SessionState) {
    for timer in state.timers.drain_due(state.now_ms) {
        match timer {
            TimerKind::TrickCooldownEnd => trick::finish_trick(state),
            TimerKind::PopupExpire { popup_id } => state.popups.retain(|p| p.id != popup_id),
            TimerKind::FlashEnd => state.flash = None,
            TimerKind::BoostEnd => collision::end_boost(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const FRAME: f64 = crate::consts::NOMINAL_FRAME_MS;

    fn started(tuning: Tuning) -> SessionState {
        let mut state = SessionState::new(12345, tuning);
        apply_command(&mut state, Command::Start);
        state
    }

    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.spawn.initial_rate = 0.0;
        tuning.spawn.max_rate = 0.0;
        tuning.spawn.power_up_chance = 0.0;
        tuning
    }

    #[test]
    fn test_start_command() {
        let mut state = SessionState::new(1, Tuning::default());
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.now_ms, 0.0);

        apply_command(&mut state, Command::Start);
        assert_eq!(state.phase, GamePhase::Running);
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.now_ms, FRAME);
    }

    #[test]
    fn test_pause_preserves_state() {
        let mut state = started(Tuning::default());
        let input = TickInput {
            direction: DirectionInput {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        let pos = state.player.pos;
        let now = state.now_ms;

        apply_command(&mut state, Command::Pause);
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..10 {
            tick(&mut state, &input, FRAME);
        }
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.now_ms, now);

        apply_command(&mut state, Command::Resume);
        tick(&mut state, &input, FRAME);
        assert!(state.player.pos.x > pos.x);
    }

    #[test]
    fn test_negative_dt_does_not_move() {
        let mut state = started(quiet_tuning());
        let pos = state.player.pos;
        let input = TickInput {
            direction: DirectionInput {
                left: true,
                up: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input, -40.0);
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.now_ms, 0.0);
    }

    #[test]
    fn test_trick_through_tick() {
        let mut state = started(quiet_tuning());
        state.player.pos.y = 0.0;
        state.now_ms = 5000.0;

        tick(
            &mut state,
            &TickInput {
                attempt_trick: true,
                ..Default::default()
            },
            FRAME,
        );
        assert!(state.zone.active);
        assert!(state.trick.in_progress);
        assert!(state.score >= 100);

        // Cooldown timer clears the trick
        let cooldown_ticks = (state.tuning.trick.cooldown_ms / FRAME).ceil() as usize + 1;
        for _ in 0..cooldown_ticks {
            tick(&mut state, &TickInput::default(), FRAME);
        }
        assert!(!state.trick.in_progress);
        assert_eq!(state.trick.kind, None);
    }

    #[test]
    fn test_trick_attempts_at_0_500_1000_while_hovering() {
        let mut state = started(quiet_tuning());
        state.player.pos.y = 0.0;
        let attempt = TickInput {
            attempt_trick: true,
            ..Default::default()
        };

        tick(&mut state, &attempt, 0.0);
        assert_eq!(state.now_ms, 0.0);
        let after_first = state.score;
        assert!(after_first >= 100);

        tick(&mut state, &attempt, 500.0);
        assert_eq!(state.now_ms, 500.0);
        assert_eq!(state.score, after_first);

        // Player never moved; the cooldown end opens a fresh activation
        tick(&mut state, &attempt, 500.0);
        assert_eq!(state.now_ms, 1000.0);
        assert!(state.score >= after_first + 100);
        assert!(state.trick.in_progress);
        assert!(state.zone.active);
        assert_eq!(state.stats.tricks, 2);
    }

    #[test]
    fn test_zone_stays_live_when_held_past_expiry() {
        let mut state = started(quiet_tuning());
        state.player.pos.y = 0.0;
        for _ in 0..51 {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        assert_eq!(state.now_ms, 5100.0);
        assert!(state.zone.active);
        assert!(state.zone.time_remaining_ms > 0.0);
    }

    #[test]
    fn test_timer_after_game_over_is_noop() {
        let mut state = started(quiet_tuning());
        state.player.pos.y = 0.0;
        tick(
            &mut state,
            &TickInput {
                attempt_trick: true,
                ..Default::default()
            },
            FRAME,
        );
        assert!(state.trick.in_progress);

        state.end_session();
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), FRAME);
        }
        assert_eq!(state.phase, GamePhase::Over);
        assert!(state.trick.in_progress);
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_game_over_rejects_input_until_reset() {
        let mut state = started(quiet_tuning());
        state.end_session();
        apply_command(&mut state, Command::Start);
        apply_command(&mut state, Command::Resume);
        assert_eq!(state.phase, GamePhase::Over);

        apply_command(&mut state, Command::Reset);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.player.health, state.tuning.player.max_health);
        assert_eq!(state.score, 0);
        assert_eq!(state.level.level, 1);
    }

    #[test]
    fn test_collectible_consumed_through_tick() {
        let mut state = started(quiet_tuning());
        state.player.pos = Vec2::new(200.0, 400.0);
        crate::sim::spawner::spawn(&mut state, EntityKind::CollectibleB);
        state.entities[0].pos = state.player.pos + Vec2::splat(5.0);

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.score, state.tuning.items.collectible_points[1]);
        assert!(state.entities.is_empty());
        assert_eq!(state.stats.collected, 1);
    }

    #[test]
    fn test_boost_expires_through_timer() {
        let mut state = started(quiet_tuning());
        collision::activate_boost(&mut state);
        let ticks = (state.tuning.items.boost_duration_ms / 100.0) as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        assert!(!state.boost.is_active());
        assert_eq!(state.player.scale, 1.0);
    }

    #[test]
    fn test_popups_expire() {
        let mut state = started(quiet_tuning());
        state.add_popup("+10".to_string(), Vec2::ZERO, 10);
        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.popups.len(), 1);
        for _ in 0..8 {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        assert!(state.popups.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_input() -> impl Strategy<Value = TickInput> {
            (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
                |(left, right, up, down, attempt_trick)| TickInput {
                    direction: DirectionInput {
                        left,
                        right,
                        up,
                        down,
                    },
                    attempt_trick,
                },
            )
        }

        proptest! {
            #[test]
            fn health_and_position_stay_in_bounds(
                seed in 0u64..1000,
                steps in proptest::collection::vec((arb_input(), -20.0f64..100.0), 1..400)
            ) {
                let mut tuning = Tuning::default();
                tuning.spawn.initial_rate = 0.9;
                tuning.spawn.max_rate = 1.0;
                tuning.spawn.power_up_chance = 0.3;
                let mut state = SessionState::new(seed, tuning);
                apply_command(&mut state, Command::Start);

                for (input, dt) in &steps {
                    tick(&mut state, input, *dt);
                    let max = state.tuning.player.max_health;
                    let size = state.player.size(&state.tuning.player);
                    prop_assert!(state.player.health <= max);
                    prop_assert!(state.player.pos.x >= 0.0);
                    prop_assert!(state.player.pos.y >= 0.0);
                    prop_assert!(state.player.pos.x <= state.tuning.viewport.width - size.x + 1e-3);
                    prop_assert!(state.player.pos.y <= state.tuning.viewport.height - size.y + 1e-3);
                    prop_assert!(!state.zone.has_tricked_this_activation || state.zone.active);
                    prop_assert!(state.level.level >= 1);
                    if state.phase == GamePhase::Paused {
                        apply_command(&mut state, Command::Resume);
                    }
                }
            }

            #[test]
            fn level_never_decreases(
                seed in 0u64..1000,
                dts in proptest::collection::vec(0.0f64..100.0, 1..300)
            ) {
                let mut tuning = Tuning::default();
                tuning.level.duration_ms = 2000.0;
                tuning.level.points_per_level = 50;
                tuning.spawn.initial_rate = 1.0;
                tuning.spawn.max_rate = 1.0;
                let mut state = SessionState::new(seed, tuning);
                apply_command(&mut state, Command::Start);

                let mut last_level = 1;
                for dt in dts {
                    tick(&mut state, &TickInput::default(), dt);
                    prop_assert!(state.level.level >= last_level);
                    last_level = state.level.level;
                    if state.phase == GamePhase::Paused {
                        apply_command(&mut state, Command::Resume);
                    }
                }
            }
        }
    }
}
