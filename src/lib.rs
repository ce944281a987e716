//! Tetrion (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration
//! tests and benches can use `tetrion::{core,engine,input,term,types}`.

pub use tetrion_core as core;
pub use tetrion_engine as engine;
pub use tetrion_input as input;
pub use tetrion_term as term;
pub use tetrion_types as types;
