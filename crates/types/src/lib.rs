//! Shared types and constants for the match server
//!
//! Everything in this crate is plain data with no external dependencies, so it
//! can be used by the game core, the wire protocol and the session layer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn position**: `x = 10 / 2 - piece_width / 2`, `y = 0`
//!
//! # Match Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_DROP_MS` | 500 | Gravity interval (one row per tick) |
//! | `SNAPSHOT_INTERVAL_MS` | 100 | Snapshot broadcast period (10 Hz) |
//! | `TERMINATION_POLL_MS` | 100 | Winner check period |
//! | `INPUT_POLL_MS` | 1000 | Read timeout for player input |
//! | `HANDSHAKE_TIMEOUT_MS` | 10000 | Time allowed for a HELLO |
//! | `JOIN_TIMEOUT_MS` | 30000 | Time allowed for both players to join |
//! | `GAME_OVER_GRACE_MS` | 2000 | Delay before shutdown after GAME_OVER |
//!
//! # Examples
//!
//! ```
//! use tetris_duel_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.as_str(), "T");
//!
//! let action = GameAction::from_str("HARD_DROP").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Number of upcoming pieces shown in every snapshot
pub const NEXT_PREVIEW: usize = 3;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Default gravity interval in milliseconds
pub const DEFAULT_DROP_MS: u64 = 500;

/// Snapshot broadcast period in milliseconds (10 Hz)
pub const SNAPSHOT_INTERVAL_MS: u64 = 100;

/// Termination watcher polling period in milliseconds
pub const TERMINATION_POLL_MS: u64 = 100;

/// Read timeout used by the player input loop
pub const INPUT_POLL_MS: u64 = 1_000;

/// Time a fresh connection has to send its HELLO
pub const HANDSHAKE_TIMEOUT_MS: u64 = 10_000;

/// Time both players have to join before the match is abandoned
pub const JOIN_TIMEOUT_MS: u64 = 30_000;

/// Delay between the GAME_OVER broadcast and shutdown
pub const GAME_OVER_GRACE_MS: u64 = 2_000;

/// Line clear scoring table
///
/// Base points for clearing N lines in one lock, multiplied by the level:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Rendered cell value for an empty cell
pub const CELL_EMPTY: u8 = 0;

/// Rendered cell value for a locked cell
pub const CELL_LOCKED: u8 = 1;

/// Rendered cell value for a cell of the falling piece
pub const CELL_ACTIVE: u8 = 2;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in bag order before shuffling
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "I" => Some(PieceKind::I),
            "O" => Some(PieceKind::O),
            "T" => Some(PieceKind::T),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            "J" => Some(PieceKind::J),
            "L" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Single uppercase letter used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Player actions carried by INPUT messages
///
/// Each action maps to one board operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down, locking it if it cannot move
    SoftDrop,
    /// Drop piece to the lowest valid position and lock it
    HardDrop,
    /// Advance the rotation index
    RotateCw,
    /// Retreat the rotation index
    RotateCcw,
    /// Hold current piece (once per spawn)
    Hold,
}

impl GameAction {
    /// Parse action from its wire name
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("LEFT"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("cw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("teleport"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LEFT" => Some(GameAction::MoveLeft),
            "RIGHT" => Some(GameAction::MoveRight),
            "DOWN" => Some(GameAction::SoftDrop),
            "HARD_DROP" => Some(GameAction::HardDrop),
            "CW" => Some(GameAction::RotateCw),
            "CCW" => Some(GameAction::RotateCcw),
            "HOLD" => Some(GameAction::Hold),
            _ => None,
        }
    }

    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "LEFT",
            GameAction::MoveRight => "RIGHT",
            GameAction::SoftDrop => "DOWN",
            GameAction::HardDrop => "HARD_DROP",
            GameAction::RotateCw => "CW",
            GameAction::RotateCcw => "CCW",
            GameAction::Hold => "HOLD",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell locked by a piece of the given kind
pub type Cell = Option<PieceKind>;
