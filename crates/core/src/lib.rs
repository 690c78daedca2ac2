//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the board rules used by the match server. It has
//! **zero dependencies** on networking or I/O:
//!
//! - **Deterministic**: the same seed produces the same piece sequence
//! - **Total**: every operation reports success or failure instead of panicking
//! - **Frozen at top-out**: a board that has topped out ignores every operation
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision checks and line clearing
//! - [`game_state`]: one player's board, falling piece, hold, score and level
//! - [`pieces`]: shape tables with per-kind rotation counts
//! - [`rng`]: 7-bag piece generator with a lookahead queue
//! - [`scoring`]: line clear points and level progression
//! - [`snapshot`]: plain-data copy of a board for broadcasting
//! - [`rle`]: run-length codec for rendered grids
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every aligned run of seven draws is a permutation of all kinds
//! - **Rotation**: index into the shape table, no wall kicks
//! - **Gravity**: one row per tick; a piece that cannot fall locks immediately
//! - **Hold**: once per spawn, swapped pieces return to the spawn pose
//! - **Scoring**: 100/300/500/800 times level for 1-4 lines, drops score nothing
//!
//! # Example
//!
//! ```
//! use tetris_duel_core::{rle, GameState, PieceGenerator};
//! use tetris_duel_types::GameAction;
//!
//! let mut game = GameState::new(PieceGenerator::new(12345));
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.score(), 0);
//! let snapshot = game.snapshot();
//! let grid = rle::decode(&snapshot.board_rle(), 10, 20).unwrap();
//! assert_eq!(grid.len(), 20);
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rle;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_duel_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, CellGrid};
pub use game_state::{GameState, Tetromino};
pub use pieces::get_shape;
pub use rle::RleError;
pub use rng::{PieceGenerator, SimpleRng};
pub use scoring::{calculate_level, calculate_line_score};
pub use snapshot::{ActiveSnapshot, BoardSnapshot};
