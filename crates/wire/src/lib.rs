//! Wire protocol for match connections
//!
//! - [`frame`]: 4-byte big-endian length prefix framing with a cancel-safe reader
//! - [`protocol`]: the JSON message envelope (HELLO, WELCOME, INPUT, SNAPSHOT, GAME_OVER)
//! - [`lobby`]: the result report sent to the lobby when a match ends
//!
//! # Example
//!
//! ```
//! use tetris_duel_wire::{create_hello, Message};
//!
//! let text = create_hello(7, 1001).encode().unwrap();
//! assert!(matches!(Message::decode(&text).unwrap(), Message::Hello(h) if h.room_id == 7));
//! ```

pub mod error;
pub mod frame;
pub mod lobby;
pub mod protocol;

pub use tetris_duel_types as types;

pub use error::ProtocolError;
pub use frame::{send_message, write_frame, FrameReader, MAX_FRAME_LEN};
pub use lobby::{GameResultReport, LobbyRequest, LobbyResponse, RoleResult};
pub use protocol::*;
