//! Delayed effects checked against session time
//!
//! Cooldown expiry, popup removal and the like are stored here instead of
//! running as free-standing callbacks, so a session reset or game over can
//! drop them all at once.

use serde::{Deserialize, Serialize};

/// Handle for cancelling a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

/// What happens when a timer comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Trick animation/cooldown over; player may trick again
    TrickCooldownEnd,
    /// Remove the score popup with this id
    PopupExpire { popup_id: u32 },
    /// Clear the current screen flash
    FlashEnd,
    /// Boost power-up wears off
    BoostEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    token: TimerToken,
    due_ms: f64,
    kind: TimerKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Scheduled>,
    next_token: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, due_ms: f64) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.entries.push(Scheduled {
            token,
            due_ms,
            kind,
        });
        token
    }

    /// Cancel a pending timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every timer due at or before `now_ms`, earliest first
    /// (ties keep scheduling order)
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<TimerKind> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.entries.retain(|e| {
            if e.due_ms <= now_ms {
                due.push(e.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.due_ms
                .partial_cmp(&b.due_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.token.0.cmp(&b.token.0))
        });
        due.into_iter().map(|e| e.kind).collect()
    }
}
