//! Read-only view of a session for renderers, audio and UI bridges

use glam::Vec2;
use serde::Serialize;

use super::entity::EntityKind;
use super::state::{FlashKind, GamePhase, PauseReason, Popup, SessionState, TrickKind};
use super::{level, trick};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing_right: bool,
    pub invincible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub deflected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrickView {
    pub kind: TrickKind,
    /// 0 at the start of the trick, 1 once the animation is complete
    pub progress: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub pause_reason: Option<PauseReason>,
    pub player: PlayerView,
    pub entities: Vec<EntityView>,
    pub trick: Option<TrickView>,
    pub zone_active: bool,
    pub zone_time_remaining_ms: f64,
    pub score: u64,
    pub health: u32,
    pub max_health: u32,
    pub level: u32,
    pub level_time_remaining_ms: f64,
    pub boost_active: bool,
    pub flash: Option<FlashKind>,
    pub popups: Vec<Popup>,
}

impl Snapshot {
    pub fn capture(state: &SessionState) -> Self {
        let trick = state.trick.kind.and_then(|kind| {
            trick::animation_progress(&state.trick, state.now_ms, state.tuning.trick.cooldown_ms)
                .map(|progress| TrickView { kind, progress })
        });

        Self {
            phase: state.phase,
            pause_reason: state.pause_reason,
            player: PlayerView {
                pos: state.player.pos,
                size: state.player.size(&state.tuning.player),
                facing_right: state.player.facing_right,
                invincible: state.player.is_invincible(state.now_ms),
            },
            entities: state
                .entities
                .iter()
                .filter(|e| !e.removal_pending)
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    size: e.size,
                    deflected: e.is_deflected(),
                })
                .collect(),
            trick,
            zone_active: state.zone.active,
            zone_time_remaining_ms: state.zone.time_remaining_ms.max(0.0),
            score: state.score,
            health: state.player.health,
            max_health: state.tuning.player.max_health,
            level: state.level.level,
            level_time_remaining_ms: level::time_remaining_ms(state),
            boost_active: state.boost.is_active(),
            flash: state.flash.map(|f| f.kind),
            popups: state.popups.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_fresh_session() {
        let state = SessionState::new(5, Tuning::default());
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Start);
        assert_eq!(snap.health, 100);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.level_time_remaining_ms, 60_000.0);
        assert!(snap.trick.is_none());
        assert!(!snap.zone_active);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let state = SessionState::new(5, Tuning::default());
        let json = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Start\""));
        assert!(json.contains("\"score\":0"));
    }
}
