//! Snapshot module - plain-data view of a board
//!
//! A `BoardSnapshot` is everything the session layer needs to build a
//! SNAPSHOT message, captured in one pass so the board can keep moving
//! while the message is serialized elsewhere.

use crate::board::CellGrid;
use crate::rle;
use crate::types::{PieceKind, NEXT_PREVIEW};

/// Pose of the falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

/// Copy of one player's board state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// 0 empty, 1 locked, 2 falling piece
    pub cells: CellGrid,
    pub active: ActiveSnapshot,
    pub hold: Option<PieceKind>,
    pub next: [PieceKind; NEXT_PREVIEW],
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub max_combo: u32,
    pub game_over: bool,
}

impl BoardSnapshot {
    /// Run-length encoded grid, row-major
    pub fn board_rle(&self) -> String {
        rle::encode_grid(&self.cells)
    }
}
