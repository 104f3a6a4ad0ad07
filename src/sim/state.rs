//! Session state and core simulation types
//!
//! Everything one play session mutates lives in [`SessionState`], which is
//! passed by `&mut` into each component's update function.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};
use super::timers::{Scheduler, TimerKind, TimerToken};
use crate::Rect;
use crate::tuning::{PlayerTuning, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start command
    Start,
    /// Active gameplay
    Running,
    /// Simulation halted (user pause or level summary)
    Paused,
    /// Health ran out
    Over,
}

/// Why a session is paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseReason {
    User,
    /// Level timer ran out; summary is on screen
    LevelSummary,
}

/// Named tricks, each with a fixed point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrickKind {
    Spin,
    Backflip,
    BarrelRoll,
    Corkscrew,
    Superman,
}

impl TrickKind {
    pub const ALL: [TrickKind; 5] = [
        TrickKind::Spin,
        TrickKind::Backflip,
        TrickKind::BarrelRoll,
        TrickKind::Corkscrew,
        TrickKind::Superman,
    ];

    pub fn points(&self) -> u64 {
        match self {
            TrickKind::Spin => 100,
            TrickKind::Backflip => 200,
            TrickKind::BarrelRoll => 300,
            TrickKind::Corkscrew => 400,
            TrickKind::Superman => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrickKind::Spin => "Spin",
            TrickKind::Backflip => "Backflip",
            TrickKind::BarrelRoll => "Barrel Roll",
            TrickKind::Corkscrew => "Corkscrew",
            TrickKind::Superman => "Superman",
        }
    }
}

/// Which trigger advanced the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpCause {
    Score,
    Timer,
}

/// Outward notifications for audio/UI collaborators (fire-and-forget)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    CollectibleCaught { kind: EntityKind, points: u64 },
    HazardHit { damage: u32, health: u32 },
    HazardDeflected { entity_id: u32 },
    PowerUpActivated,
    BoostEnded,
    TrickPerformed { kind: TrickKind, points: u64 },
    LevelUp { level: u32, cause: LevelUpCause },
    LevelSummary { level: u32, score: u64, collected: u32, tricks: u32 },
    GameOver { score: u64, level: u32 },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner
    pub pos: Vec2,
    /// Units per nominal frame
    pub vel: Vec2,
    pub facing_right: bool,
    /// 1.0 normally, the boost scale while a power-up is active
    pub scale: f32,
    pub health: u32,
    pub invincible_until: Option<f64>,
}

impl PlayerState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Self::spawn_point(tuning),
            vel: Vec2::ZERO,
            facing_right: true,
            scale: 1.0,
            health: tuning.player.max_health,
            invincible_until: None,
        }
    }

    /// Left quarter, vertically centred in the band below the trick zone
    pub fn spawn_point(tuning: &Tuning) -> Vec2 {
        let vp = &tuning.viewport;
        let x = vp.width * 0.2;
        let y = vp.height * (2.0 / 3.0) - tuning.player.height / 2.0;
        Vec2::new(
            x.clamp(0.0, (vp.width - tuning.player.width).max(0.0)),
            y.clamp(0.0, (vp.height - tuning.player.height).max(0.0)),
        )
    }

    pub fn size(&self, player: &PlayerTuning) -> Vec2 {
        Vec2::new(player.width, player.height) * self.scale
    }

    pub fn hitbox(&self, player: &PlayerTuning) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size(player),
        }
    }

    pub fn lower_edge(&self, player: &PlayerTuning) -> f32 {
        self.pos.y + player.height * self.scale
    }

    pub fn is_invincible(&self, now_ms: f64) -> bool {
        self.invincible_until.is_some_and(|until| until > now_ms)
    }
}

/// Trick zone sensor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrickZoneState {
    pub active: bool,
    pub time_remaining_ms: f64,
    /// Only ever true while `active`
    pub has_tricked_this_activation: bool,
}

/// Trick in flight plus cooldown bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrickPerformanceState {
    pub in_progress: bool,
    pub kind: Option<TrickKind>,
    pub started_at: f64,
    /// Start time of the most recent trick; the cooldown runs from here
    pub last_trick_at: Option<f64>,
    pub cooldown_token: Option<TimerToken>,
}

/// Level number and difficulty multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    pub level: u32,
    pub elapsed_in_level_ms: f64,
    /// Score threshold most recently crossed
    pub score_at_last_level_up: u64,
    pub spawn_rate_multiplier: f32,
    pub speed_multiplier: f32,
}

impl Default for LevelState {
    fn default() -> Self {
        Self {
            level: 1,
            elapsed_in_level_ms: 0.0,
            score_at_last_level_up: 0,
            spawn_rate_multiplier: 1.0,
            speed_multiplier: 1.0,
        }
    }
}

/// Spawner bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnerState {
    pub last_check_ms: f64,
    pub power_ups_this_level: u32,
}

/// Boost power-up window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoostState {
    pub active_until: Option<f64>,
    pub token: Option<TimerToken>,
}

impl BoostState {
    pub fn is_active(&self) -> bool {
        self.active_until.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Collect,
    Damage,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub token: TimerToken,
}

/// Floating "+points" label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Popup {
    pub id: u32,
    pub text: String,
    pub pos: Vec2,
    pub points: u64,
}

/// Per-level counters shown on the level summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelStats {
    pub collected: u32,
    pub tricks: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub pause_reason: Option<PauseReason>,
    /// Countdown until a level summary resumes play
    pub summary_remaining_ms: f64,
    /// Session clock; advances only while running
    pub now_ms: f64,
    pub score: u64,
    pub player: PlayerState,
    /// Live entities (sorted by id)
    pub entities: Vec<Entity>,
    pub zone: TrickZoneState,
    pub trick: TrickPerformanceState,
    pub level: LevelState,
    pub spawner: SpawnerState,
    pub boost: BoostState,
    pub flash: Option<Flash>,
    pub popups: Vec<Popup>,
    pub stats: LevelStats,
    pub timers: Scheduler,
    /// Notifications since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SessionState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: PlayerState::new(&tuning),
            tuning,
            phase: GamePhase::Start,
            pause_reason: None,
            summary_remaining_ms: 0.0,
            now_ms: 0.0,
            score: 0,
            entities: Vec::new(),
            zone: TrickZoneState::default(),
            trick: TrickPerformanceState::default(),
            level: LevelState::default(),
            spawner: SpawnerState::default(),
            boost: BoostState::default(),
            flash: None,
            popups: Vec::new(),
            stats: LevelStats::default(),
            timers: Scheduler::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Fresh session with the same seed and tuning, whatever state this one ended in
    pub fn reset(&mut self) {
        *self = Self::new(self.seed, self.tuning.clone());
    }

    /// Allocate a new entity/popup ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Show a screen flash, replacing (and cancelling) any current one
    pub fn set_flash(&mut self, kind: FlashKind) {
        if let Some(old) = self.flash.take() {
            self.timers.cancel(old.token);
        }
        let token = self
            .timers
            .schedule(TimerKind::FlashEnd, self.now_ms + self.tuning.items.flash_ms);
        self.flash = Some(Flash { kind, token });
    }

    /// Spawn a floating score label that removes itself later
    pub fn add_popup(&mut self, text: String, pos: Vec2, points: u64) {
        let id = self.next_entity_id();
        self.popups.push(Popup {
            id,
            text,
            pos,
            points,
        });
        self.timers.schedule(
            TimerKind::PopupExpire { popup_id: id },
            self.now_ms + self.tuning.items.popup_ms,
        );
    }

    /// Terminal transition; outstanding timers must not touch a finished session
    pub fn end_session(&mut self) {
        if self.phase == GamePhase::Over {
            return;
        }
        self.phase = GamePhase::Over;
        self.pause_reason = None;
        self.timers.clear();
        self.trick.cooldown_token = None;
        self.boost.token = None;
        self.flash = None;
        log::info!("Game over: score {} at level {}", self.score, self.level.level);
        self.emit(GameEvent::GameOver {
            score: self.score,
            level: self.level.level,
        });
    }

    /// Ensure entities are sorted by ID for stable iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }

    pub fn has_power_up_on_screen(&self) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == EntityKind::PowerUp && !e.removal_pending)
    }
}
