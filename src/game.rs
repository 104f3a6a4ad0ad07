//! Frame-driven session driver
//!
//! Front ends own one [`Game`], feed it input as it arrives, and call
//! [`Game::frame`] once per animation frame.

use crate::sim::{
    self, DirectionInput, FrameClock, FrameStep, GameEvent, GamePhase, SessionState, Snapshot,
    TickInput,
};
use crate::tuning::Tuning;

pub use crate::sim::Command;

/// Game instance holding all state
pub struct Game {
    state: SessionState,
    clock: FrameClock,
    input: TickInput,
    /// Frames simulated / skipped since creation
    ticks: u64,
    skipped: u64,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let clock = FrameClock::new(tuning.clock.max_frame_gap_ms);
        Self {
            state: SessionState::new(seed, tuning),
            clock,
            input: TickInput::default(),
            ticks: 0,
            skipped: 0,
        }
    }

    /// Held direction keys (level-triggered)
    pub fn set_direction(&mut self, direction: DirectionInput) {
        self.input.direction = direction;
    }

    /// Trick button press (edge-triggered, consumed by the next tick)
    pub fn request_trick(&mut self) {
        self.input.attempt_trick = true;
    }

    pub fn command(&mut self, command: Command) {
        let phase_before = self.state.phase;
        sim::apply_command(&mut self.state, command);
        let entered_running = phase_before != GamePhase::Running && self.state.is_running();
        if entered_running || command == Command::Reset {
            // Don't count time spent paused or on the title screen as a frame gap
            self.clock.reset();
        }
        if command == Command::Reset {
            self.input = TickInput::default();
        }
    }

    /// Run one animation frame. Returns false when the frame was skipped.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        match self.clock.advance(timestamp_ms) {
            FrameStep::Tick(dt) => {
                let phase_before = self.state.phase;
                sim::tick(&mut self.state, &self.input, dt);
                self.input.attempt_trick = false;
                self.ticks += 1;

                if self.state.phase != phase_before {
                    log::info!("Phase {:?} -> {:?}", phase_before, self.state.phase);
                }
                true
            }
            FrameStep::Skip { gap_ms } => {
                log::warn!("Skipping frame after {:.0}ms gap", gap_ms);
                self.skipped += 1;
                false
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }
}
