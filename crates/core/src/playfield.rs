//! Playfield module - the grid of locked cells
//!
//! The playfield is 10 columns by 22 rows stored as a flat row-major array.
//! Row 0 is the floor; rows 20 and 21 sit above the ceiling and catch
//! pieces that lock partially out of view.
//!
//! Only locked blocks live here. The falling piece is tracked by the engine
//! and tested against the grid with [`Playfield::is_occupiable`].

use crate::piece::Piece;
use crate::types::{Cell, Shape, BOARD_HEIGHT, BOARD_WIDTH, DANGER_ZONE_ROW};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;
const SIZE: usize = WIDTH * HEIGHT;

#[derive(Debug, Clone, PartialEq)]
pub struct Playfield {
    /// Row-major cells, index `y * WIDTH + x`.
    cells: [Cell; SIZE],
}

impl Playfield {
    pub fn new() -> Self {
        Self { cells: [None; SIZE] }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH || y < 0 || y >= BOARD_HEIGHT {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> i8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> i8 {
        BOARD_HEIGHT
    }

    /// Cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` lies outside the playfield.
    pub fn cell(&self, x: i8, y: i8) -> Cell {
        match Self::index(x, y) {
            Some(idx) => self.cells[idx],
            None => panic!("playfield cell ({}, {}) out of range", x, y),
        }
    }

    /// Checked variant of [`Playfield::cell`].
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Write a single cell. Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty.
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Whether all four blocks of `piece` anchored at `(x, y)` land on free cells.
    pub fn is_occupiable(&self, piece: &Piece, x: i8, y: i8) -> bool {
        piece
            .cells(x, y)
            .iter()
            .all(|&(cx, cy)| self.is_free(cx, cy))
    }

    /// Write `piece` into the grid at `(x, y)`.
    ///
    /// The caller must have checked the placement with `is_occupiable`;
    /// blocks that fall outside the grid are dropped.
    pub fn lock(&mut self, piece: &Piece, x: i8, y: i8) {
        let Some(shape) = piece.shape() else {
            return;
        };
        for (cx, cy) in piece.cells(x, y) {
            debug_assert!(self.is_free(cx, cy), "locking onto ({}, {})", cx, cy);
            self.set(cx, cy, Some(shape));
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|c| c.is_some())
    }

    fn is_row_empty(&self, y: usize) -> bool {
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|c| c.is_none())
    }

    /// Remove every full row and let the rows above fall into the gaps.
    ///
    /// Rows keep their relative order. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut write_y = 0;
        let mut cleared = 0;

        for read_y in 0..HEIGHT {
            if self.is_row_full(read_y) {
                cleared += 1;
                continue;
            }
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
            write_y += 1;
        }

        self.cells[write_y * WIDTH..].fill(None);
        cleared
    }

    /// Any locked block at or above the danger row.
    pub fn is_in_danger_zone(&self) -> bool {
        (DANGER_ZONE_ROW as usize..HEIGHT).any(|y| !self.is_row_empty(y))
    }

    /// Number of locked blocks.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Rows from the floor up.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(WIDTH)
    }

    /// Fill row `y` with `shape`, leaving the listed columns empty.
    pub fn fill_row_except(&mut self, y: i8, shape: Shape, holes: &[i8]) {
        for x in 0..BOARD_WIDTH {
            let cell = if holes.contains(&x) { None } else { Some(shape) };
            self.set(x, y, cell);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}
