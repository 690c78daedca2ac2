//! Tetris duel (workspace facade crate).
//!
//! Re-exports the crates under `crates/` so the binaries and integration
//! tests can use one `tetris_duel::{core,session,types,wire}` path.

pub use tetris_duel_core as core;
pub use tetris_duel_session as session;
pub use tetris_duel_types as types;
pub use tetris_duel_wire as wire;
