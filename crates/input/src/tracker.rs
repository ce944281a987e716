//! Held-key tracking for terminal environments.
//!
//! Many terminals never report key release. Without a release the engine
//! would treat a tapped arrow as held forever and keep auto-shifting. The
//! tracker remembers when each control was last seen and synthesizes the
//! release once it goes quiet for longer than the timeout. It also drops
//! duplicate presses of a control that is already down, so terminal
//! auto-repeat never restarts the engine's own repeat timing.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use crate::types::{Control, Intent};

// Long enough to bridge the gap between auto-repeat presses, short enough
// that a tap does not turn into a shift repeat.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

const CONTROLS: usize = Control::ALL.len();

#[derive(Debug, Clone)]
pub struct KeyTracker {
    last_seen: [Option<Instant>; CONTROLS],
    timeout: Duration,
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            last_seen: [None; CONTROLS],
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.last_seen[slot(control)].is_some()
    }

    /// Pass an intent through the tracker.
    ///
    /// Returns the intent to forward to the engine, or `None` when it is a
    /// repeat press of a held control or a release of one already released.
    pub fn filter(&mut self, intent: Intent, now: Instant) -> Option<Intent> {
        match intent {
            Intent::Press(control) => {
                let seen = &mut self.last_seen[slot(control)];
                let repeat = seen.is_some();
                *seen = Some(now);
                if repeat {
                    None
                } else {
                    Some(intent)
                }
            }
            Intent::Release(control) => self.last_seen[slot(control)].take().map(|_| intent),
            _ => Some(intent),
        }
    }

    /// Releases for every control quiet for longer than the timeout.
    pub fn expire(&mut self, now: Instant) -> ArrayVec<Intent, CONTROLS> {
        let mut out = ArrayVec::new();
        for control in Control::ALL {
            let seen = &mut self.last_seen[slot(control)];
            if let Some(at) = *seen {
                if now.saturating_duration_since(at) > self.timeout {
                    *seen = None;
                    out.push(Intent::Release(control));
                }
            }
        }
        out
    }

    /// Releases for every held control, e.g. when focus is lost.
    pub fn release_all(&mut self) -> ArrayVec<Intent, CONTROLS> {
        let mut out = ArrayVec::new();
        for control in Control::ALL {
            if self.last_seen[slot(control)].take().is_some() {
                out.push(Intent::Release(control));
            }
        }
        out
    }
}

fn slot(control: Control) -> usize {
    match control {
        Control::ShiftLeft => 0,
        Control::ShiftRight => 1,
        Control::RotateLeft => 2,
        Control::RotateRight => 3,
        Control::SoftDrop => 4,
        Control::HardDrop => 5,
    }
}
