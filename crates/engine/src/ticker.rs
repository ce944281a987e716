//! Fixed-rate tick driver.
//!
//! A dedicated thread sleeps to a fixed deadline and ticks the session.
//! When the thread falls behind (or the engine was paused) the deadline is
//! re-based instead of replaying missed ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::session::Session;
use crate::types::GameStatus;

pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(session: Session, period: Duration) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("tetrion-ticker".to_string())
            .spawn(move || run(session, period, flag))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop ticking and wait for the thread to exit.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.halt();
    }
}

fn run(session: Session, period: Duration, stop: Arc<AtomicBool>) {
    let mut next = Instant::now() + period;
    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now < next {
            thread::sleep(next - now);
        }

        let running = session.status() == GameStatus::Running;
        if running {
            session.tick();
        }

        next += period;
        let now = Instant::now();
        if !running || next < now {
            next = now + period;
        }
    }
}
