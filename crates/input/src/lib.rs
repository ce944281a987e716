//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Intent`] values and
//! tracks held keys so terminals without key-release events still deliver
//! a release to the engine.

pub mod map;
pub mod tracker;

pub use tetrion_types as types;

pub use map::{control_for, map_key, should_quit};
pub use tracker::KeyTracker;
