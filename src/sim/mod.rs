//! Real-time simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform code:
//! - Explicit session state passed into every component
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Delayed effects as cancellable scheduled timers

pub mod clock;
pub mod collision;
pub mod entity;
pub mod level;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;
pub mod trick;

pub use clock::{FrameClock, FrameStep};
pub use entity::{Entity, EntityKind};
pub use player::DirectionInput;
pub use snapshot::Snapshot;
pub use state::{
    FlashKind, GameEvent, GamePhase, LevelUpCause, PauseReason, PlayerState, SessionState, TrickKind,
};
pub use tick::{Command, TickInput, apply_command, tick};
pub use timers::{Scheduler, TimerKind, TimerToken};
pub use trick::TrickRejection;
