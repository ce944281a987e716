//! Shared engine handle.
//!
//! All engine state sits behind one mutex. Ticks, intents and snapshot
//! reads each take the lock once, so a renderer never sees a half-applied
//! tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::{GameSnapshot, LockEvent, Tetrion};
use crate::types::{GameStatus, Intent};

#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<Tetrion>>,
}

impl Session {
    pub fn new(tetrion: Tetrion) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tetrion)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tetrion> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply(&self, intent: Intent) -> bool {
        self.lock().apply(intent)
    }

    pub fn tick(&self) -> bool {
        self.lock().tick()
    }

    pub fn status(&self) -> GameStatus {
        self.lock().status()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().snapshot()
    }

    /// Refresh `out` in place; renderers keep one snapshot across frames.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.lock().snapshot_into(out);
    }

    pub fn take_last_event(&self) -> Option<LockEvent> {
        self.lock().take_last_event()
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Tetrion) -> R) -> R {
        f(&mut self.lock())
    }
}
