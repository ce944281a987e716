//! Engine runtime - wires the core rules to threads and channels.
//!
//! - [`config`]: [`Settings`] from environment variables and flags
//! - [`feed`]: background shape producer on a tokio runtime
//! - [`session`]: the engine behind a single mutex
//! - [`ticker`]: fixed 60 Hz driver thread
//!
//! [`launch`] assembles all of them:
//!
//! ```no_run
//! use tetrion_engine::{launch, Settings};
//! use tetrion_types::Intent;
//!
//! let game = launch(&Settings::default())?;
//! game.session().apply(Intent::Start(0));
//! let snapshot = game.session().snapshot();
//! # let _ = snapshot;
//! game.shutdown();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod feed;
pub mod session;
pub mod ticker;

pub use tetrion_core as core;
pub use tetrion_types as types;

pub use config::Settings;
pub use feed::{FeedReceiver, ShapeFeed};
pub use session::Session;
pub use ticker::Ticker;

use anyhow::Result;

use crate::core::{log, ShapeQueue, Tetrion};
use crate::types::shape_channel_capacity;

/// A running game: engine session, tick thread and shape producer.
pub struct Game {
    session: Session,
    ticker: Ticker,
    feed: ShapeFeed,
}

impl Game {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Stop ticking, then stop the producer.
    pub fn shutdown(self) {
        let Game {
            session: _,
            ticker,
            feed,
        } = self;
        ticker.stop();
        feed.shutdown();
    }
}

/// Start the shape producer and the tick thread for an idle engine.
///
/// The game itself begins with an `Intent::Start` or `Intent::PauseToggle`.
pub fn launch(settings: &Settings) -> Result<Game> {
    log::set_quiet(settings.quiet);

    let (feed, rx) = ShapeFeed::spawn(shape_channel_capacity(settings.preview_len))?;
    let mut tetrion = Tetrion::new(ShapeQueue::new(rx, settings.preview_len));
    tetrion.set_mode(settings.mode);
    tetrion.set_start_level(settings.start_level);

    let session = Session::new(tetrion);
    let ticker = Ticker::spawn(session.clone(), settings.tick)?;
    Ok(Game {
        session,
        ticker,
        feed,
    })
}
