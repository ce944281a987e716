//! Terminal "game renderer" module.
//!
//! Renders a [`core::GameSnapshot`] into a simple framebuffer of styled
//! characters and flushes it to the terminal with crossterm. No widget
//! toolkit is involved; every board cell is two columns wide to keep the
//! well roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetrion_core as core;
pub use tetrion_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
