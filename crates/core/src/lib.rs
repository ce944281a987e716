//! Core engine - pure, deterministic rules for the Tetrion
//!
//! This crate holds every game rule and no I/O. Timing is counted in fixed
//! ticks, randomness comes from a seedable bag, and shapes arrive through
//! the [`ShapeSource`] seam so a background producer can be plugged in
//! without the rules knowing about threads.
//!
//! # Module Structure
//!
//! - [`piece`]: a shape instance with four block offsets and rotation
//! - [`playfield`]: 10x22 grid of locked cells, row clearing, danger zone
//! - [`bag`]: 7-bag shape randomizer
//! - [`queue`]: preview window over a [`ShapeSource`] with random fallback
//! - [`kicks`]: wall and floor kick scans for blocked rotations
//! - [`scoring`]: line clear points, drop bonuses, the gravity curve
//! - [`tetrion`]: the state machine tying it all together
//! - [`snapshot`]: read-only copy for renderers and observers
//!
//! # Rules at a glance
//!
//! - **7-bag randomizer**: every aligned run of seven shapes is a permutation
//! - **Kicks**: a blocked rotation scans sideways and/or upward within the
//!   piece's own extent, depending on the [`Mode`](types::Mode)
//! - **Lock delay**: grounded ticks are counted; in modern mode any
//!   successful move resets the count ("infinity")
//! - **Hold**: once per piece, re-armed by every lock
//! - **Scoring**: `[0, 40, 100, 300, 1200] * (level + 1)^2`, plus 2 points
//!   per hard-dropped cell and 1 per soft-dropped cell
//! - **Levels**: one level per lock that crosses a 10-line boundary; gravity
//!   is `min(20, ratio^level / 60)` cells per tick
//!
//! # Example
//!
//! ```
//! use tetrion_core::Tetrion;
//! use tetrion_types::{Control, Intent, Mode};
//!
//! let mut game = Tetrion::with_seed(12345);
//! game.set_mode(Mode::Modern);
//! game.start(0);
//!
//! // The first tick spawns a piece.
//! game.tick();
//! assert!(game.falling_piece().is_some());
//!
//! game.apply(Intent::Press(Control::HardDrop));
//! game.apply(Intent::Release(Control::HardDrop));
//! assert!(game.score() > 0);
//! assert_eq!(game.playfield().filled_count(), 4);
//! ```

pub mod bag;
pub mod kicks;
pub mod log;
pub mod piece;
pub mod playfield;
pub mod queue;
pub mod scoring;
pub mod snapshot;
pub mod tetrion;

pub use tetrion_types as types;

pub use bag::BagRandomizer;
pub use piece::Piece;
pub use playfield::Playfield;
pub use queue::{ShapeQueue, ShapeSource};
pub use scoring::{crosses_level_boundary, gravity_for_level, hard_drop_score, line_clear_score};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use tetrion::{LockEvent, Tetrion};
