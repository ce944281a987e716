//! Terminal Tetrion runner (default binary).
//!
//! The engine ticks on its own thread; this loop only renders snapshots and
//! turns key events into intents.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use tetrion::core::GameSnapshot;
use tetrion::engine::{launch, Session, Settings};
use tetrion::input::{map_key, should_quit, KeyTracker};
use tetrion::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetrion::types::Intent;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let mut settings = Settings::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    settings.apply_args(&args)?;
    // Log lines on stderr would tear the alternate screen. Redirected
    // stderr keeps whatever `--quiet` / `TETRION_QUIET` asked for.
    if std::io::stderr().is_terminal() {
        settings.quiet = true;
    }

    let game = launch(&settings)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, game.session(), settings.start_level);

    // Always try to restore terminal state.
    let _ = term.exit();
    game.shutdown();
    result
}

fn run(term: &mut TerminalRenderer, session: &Session, start_level: u32) -> Result<()> {
    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut tracker = if term.reports_key_releases() {
        KeyTracker::with_timeout(Duration::MAX)
    } else {
        KeyTracker::new()
    };

    session.apply(Intent::Start(start_level));

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Input, waiting at most one frame.
        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(intent) = map_key(key, start_level) {
                        if let Some(intent) = tracker.filter(intent, Instant::now()) {
                            session.apply(intent);
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                Event::FocusLost => {
                    for intent in tracker.release_all() {
                        session.apply(intent);
                    }
                }
                _ => {}
            }
        }

        for intent in tracker.expire(Instant::now()) {
            session.apply(intent);
        }
    }
}
