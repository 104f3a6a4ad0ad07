//! Frame clock: turns animation-frame timestamps into tick deltas
//!
//! One tick per rendered frame. A gap longer than `max_gap_ms` (a backgrounded
//! tab, a debugger pause) is skipped rather than simulated as one huge step.

/// What to do with the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// Simulate this many milliseconds (may be negative if timestamps went backwards)
    Tick(f64),
    /// Redraw only
    Skip { gap_ms: f64 },
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    max_gap_ms: f64,
}

impl FrameClock {
    pub fn new(max_gap_ms: f64) -> Self {
        Self {
            last_timestamp: None,
            max_gap_ms,
        }
    }

    /// Register a frame timestamp
    pub fn advance(&mut self, timestamp_ms: f64) -> FrameStep {
        let step = match self.last_timestamp {
            None => FrameStep::Tick(0.0),
            Some(last) => {
                let dt = timestamp_ms - last;
                if dt > self.max_gap_ms {
                    FrameStep::Skip { gap_ms: dt }
                } else {
                    FrameStep::Tick(dt)
                }
            }
        };
        self.last_timestamp = Some(timestamp_ms);
        step
    }

    /// Forget the previous frame (next frame ticks zero)
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_ticks_zero() {
        let mut clock = FrameClock::new(100.0);
        assert_eq!(clock.advance(5000.0), FrameStep::Tick(0.0));
        assert_eq!(clock.advance(5016.0), FrameStep::Tick(16.0));
    }

    #[test]
    fn test_long_gap_is_skipped() {
        let mut clock = FrameClock::new(100.0);
        clock.advance(0.0);
        assert_eq!(clock.advance(100.0), FrameStep::Tick(100.0));
        assert_eq!(clock.advance(2100.0), FrameStep::Skip { gap_ms: 2000.0 });
        // Cadence resumes from the skipped frame
        assert_eq!(clock.advance(2116.0), FrameStep::Tick(16.0));
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new(100.0);
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.advance(9999.0), FrameStep::Tick(0.0));
    }
}
