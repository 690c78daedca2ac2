//! Game state module - one player's authoritative board
//!
//! Ties together the grid, the shape tables, the piece generator and scoring.
//! All operations report success as a `bool` (or a drop distance) and never
//! panic; once the board has topped out every operation is a no-op.

use crate::board::{Board, CellGrid};
use crate::pieces::{get_shape, matrix_width, rotate_ccw, rotate_cw, PieceShape};
use crate::rng::PieceGenerator;
use crate::scoring::{calculate_level, calculate_line_score};
use crate::snapshot::{ActiveSnapshot, BoardSnapshot};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    /// Index into the kind's shape table
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at its spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: BOARD_WIDTH as i8 / 2 - matrix_width(kind) / 2,
            y: 0,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.fits(&self.shape(), self.x, self.y)
    }
}

/// Complete per-player game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Tetromino,
    hold: Option<PieceKind>,
    can_hold: bool,
    next_queue: [PieceKind; NEXT_PREVIEW],
    generator: PieceGenerator,
    score: u32,
    lines: u32,
    level: u32,
    /// Consecutive locks that cleared at least one line
    combo: u32,
    max_combo: u32,
    game_over: bool,
}

impl GameState {
    /// Create a new board drawing pieces from `generator` and spawn the first piece
    pub fn new(generator: PieceGenerator) -> Self {
        let mut generator = generator;
        let first = generator.draw();
        let mut state = Self {
            board: Board::new(),
            active: Tetromino::new(first),
            hold: None,
            can_hold: true,
            next_queue: [PieceKind::I; NEXT_PREVIEW],
            generator,
            score: 0,
            lines: 0,
            level: 1,
            combo: 0,
            max_combo: 0,
            game_over: false,
        };
        state.place_spawned(first);
        state
    }

    /// Create a new board with its own generator seeded from `seed`
    pub fn with_seed(seed: u32) -> Self {
        Self::new(PieceGenerator::new(seed))
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_PREVIEW] {
        &self.next_queue
    }

    pub fn active(&self) -> Tetromino {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Draw the next piece and place it at the spawn position
    fn spawn_piece(&mut self) {
        let kind = self.generator.draw();
        self.place_spawned(kind);
    }

    fn place_spawned(&mut self, kind: PieceKind) {
        self.active = Tetromino::new(kind);
        self.can_hold = true;
        self.generator.peek_into(&mut self.next_queue);

        if !self.active.is_valid(&self.board) {
            self.game_over = true;
        }
    }

    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.game_over {
            return false;
        }

        let moved = Tetromino {
            x: self.active.x + dx,
            y: self.active.y + dy,
            ..self.active
        };
        if moved.is_valid(&self.board) {
            self.active = moved;
            return true;
        }
        false
    }

    fn try_rotate(&mut self, clockwise: bool) -> bool {
        if self.game_over {
            return false;
        }

        let kind = self.active.kind;
        let rotation = if clockwise {
            rotate_cw(kind, self.active.rotation)
        } else {
            rotate_ccw(kind, self.active.rotation)
        };
        let rotated = Tetromino {
            rotation,
            ..self.active
        };
        if rotated.is_valid(&self.board) {
            self.active = rotated;
            return true;
        }
        false
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Move down one row; if the piece cannot move it locks and `false` is returned
    pub fn move_down(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.try_move(0, 1) {
            return true;
        }
        self.lock_piece();
        false
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.try_rotate(true)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.try_rotate(false)
    }

    /// Drop the piece as far as it goes, lock it and return the distance dropped
    pub fn hard_drop(&mut self) -> u32 {
        if self.game_over {
            return 0;
        }

        let mut drop_distance: u32 = 0;
        while self.try_move(0, 1) {
            drop_distance += 1;
        }

        self.lock_piece();
        drop_distance
    }

    /// Hold the falling piece, at most once per spawn
    pub fn hold(&mut self) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }

        let current_kind = self.active.kind;
        match self.hold.replace(current_kind) {
            Some(held) => {
                self.active = Tetromino::new(held);
                if !self.active.is_valid(&self.board) {
                    self.game_over = true;
                }
            }
            None => self.spawn_piece(),
        }

        self.can_hold = false;
        true
    }

    /// Merge the falling piece into the grid, clear lines, score and spawn the next piece
    fn lock_piece(&mut self) {
        let active = self.active;
        self.board
            .lock_piece(&active.shape(), active.x, active.y, active.kind);

        let lines_cleared = self.board.clear_full_rows().len();
        if lines_cleared > 0 {
            self.score = self
                .score
                .saturating_add(calculate_line_score(lines_cleared, self.level));
            self.lines += lines_cleared as u32;
            self.level = calculate_level(self.lines);

            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 0;
        }

        self.spawn_piece();
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.move_down(),
            GameAction::HardDrop => {
                let was_live = !self.game_over;
                self.hard_drop();
                was_live
            }
            GameAction::RotateCw => self.rotate_cw(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::Hold => self.hold(),
        }
    }

    /// Grid with 0 (empty), 1 (locked) and 2 (falling piece) cells.
    ///
    /// The falling piece is omitted once the board has topped out.
    pub fn render_cells(&self) -> CellGrid {
        let mut grid = [[CELL_EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.board.render_into(&mut grid);

        if !self.game_over {
            for &(dx, dy) in self.active.shape().iter() {
                let x = self.active.x + dx;
                let y = self.active.y + dy;
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    grid[y as usize][x as usize] = CELL_ACTIVE;
                }
            }
        }

        grid
    }

    /// Plain-data copy of everything a SNAPSHOT needs
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cells: self.render_cells(),
            active: ActiveSnapshot {
                kind: self.active.kind,
                rotation: self.active.rotation,
                x: self.active.x,
                y: self.active.y,
            },
            hold: self.hold,
            next: self.next_queue,
            score: self.score,
            lines: self.lines,
            level: self.level,
            max_combo: self.max_combo,
            game_over: self.game_over,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_seed(1)
    }
}
