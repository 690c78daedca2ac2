//! Match session layer
//!
//! Runs one authoritative two-player match over TCP:
//!
//! - [`server`]: listener, per-connection tasks, gravity/snapshot/termination loops
//! - [`coordinator`]: the session actor owning both boards and all connections
//! - [`peer`]: per-connection writer tasks fed by a frame queue
//! - [`report`]: result report to the lobby
//! - [`config`]: match parameters and timing
//!
//! # Example
//!
//! ```no_run
//! use tetris_duel_session::{run_match, MatchConfig};
//!
//! # async fn demo() -> Result<(), tetris_duel_session::MatchError> {
//! let config = MatchConfig {
//!     port: 9000,
//!     ..MatchConfig::new(42, [1001, 1002], 12345)
//! };
//! let outcome = run_match(config, None).await?;
//! println!("{:?}", outcome.verdict);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod peer;
pub mod report;
pub mod server;

pub use tetris_duel_core as core;
pub use tetris_duel_types as types;
pub use tetris_duel_wire as wire;

pub use config::MatchConfig;
pub use coordinator::{
    FinalBatch, InputOutcome, JoinRejection, MatchState, SessionEvent, SessionHandle,
    SnapshotBatch, Verdict,
};
pub use error::MatchError;
pub use peer::{encode_frame, Frame, PeerHandle, PeerId};
pub use report::{report_result, report_to_lobby};
pub use server::{run_match, MatchOutcome};
