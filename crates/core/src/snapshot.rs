//! Read-only copy of everything a renderer or observer needs.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::types::{
    Cell, GameStatus, Mode, Shape, BOARD_HEIGHT, BOARD_WIDTH, MAX_PREVIEW_LEN,
};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub shape: Shape,
    /// Anchor column.
    pub x: i8,
    /// Anchor row.
    pub y: i8,
    /// Absolute cells of the four blocks.
    pub cells: [(i8, i8); 4],
}

impl ActiveSnapshot {
    /// Cells of the ghost projection when the anchor sits on `ghost_y`.
    pub fn ghost_cells(&self, ghost_y: i8) -> [(i8, i8); 4] {
        let dy = self.y - ghost_y;
        self.cells.map(|(x, y)| (x, y - dy))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Locked cells, `board[y][x]` with row 0 at the floor.
    pub board: [[Cell; WIDTH]; HEIGHT],
    pub active: Option<ActiveSnapshot>,
    /// Anchor row the falling piece would land on.
    pub ghost_y: Option<i8>,
    pub hold: Option<Shape>,
    pub hold_available: bool,
    pub next: ArrayVec<Shape, MAX_PREVIEW_LEN>,
    pub status: GameStatus,
    pub mode: Mode,
    pub lines: u32,
    pub score: u64,
    pub level: u32,
    pub gravity: f64,
    pub danger_zone: bool,
}

impl GameSnapshot {
    pub fn started(&self) -> bool {
        self.status.is_started()
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Cell at `(x, y)`, or `None` outside the playfield.
    pub fn cell(&self, x: i8, y: i8) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.board
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; WIDTH]; HEIGHT],
            active: None,
            ghost_y: None,
            hold: None,
            hold_available: true,
            next: ArrayVec::new(),
            status: GameStatus::Idle,
            mode: Mode::default(),
            lines: 0,
            score: 0,
            level: 0,
            gravity: 0.0,
            danger_zone: false,
        }
    }
}
