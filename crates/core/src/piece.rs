//! Piece module - a shape instance with four block offsets
//!
//! Offsets are relative to the piece anchor. A block at `(x, y)` sits on
//! playfield cell `(anchor_x + x, anchor_y - y)`, so positive `y` offsets
//! point toward the floor.
//!
//! Rotation never mutates a piece in place: `rotate_left`/`rotate_right`
//! return a new candidate that the engine may or may not accept.

use crate::types::Shape;

/// A tetromino instance (or the empty "no piece" value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    shape: Option<Shape>,
    blocks: [(i8, i8); 4],
}

impl Piece {
    /// Number of blocks in every piece.
    pub const BLOCK_COUNT: usize = 4;

    /// A piece in its spawn orientation.
    pub fn new(shape: Shape) -> Self {
        Self::with_shape(Some(shape))
    }

    /// Default layout for `shape`, or all-zero offsets when `shape` is `None`.
    pub fn with_shape(shape: Option<Shape>) -> Self {
        let blocks = match shape {
            Some(shape) => shape.offsets(),
            None => [(0, 0); 4],
        };
        Self { shape, blocks }
    }

    pub fn empty() -> Self {
        Self::with_shape(None)
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn blocks(&self) -> &[(i8, i8); 4] {
        &self.blocks
    }

    pub fn x(&self, i: usize) -> i8 {
        self.blocks[i].0
    }

    pub fn y(&self, i: usize) -> i8 {
        self.blocks[i].1
    }

    /// Absolute playfield cells when anchored at `(x, y)`.
    pub fn cells(&self, x: i8, y: i8) -> [(i8, i8); 4] {
        self.blocks.map(|(bx, by)| (x + bx, y - by))
    }

    /// Rotate 90° counter-clockwise: `(x, y) -> (y, -x)`.
    pub fn rotate_left(&self) -> Self {
        if self.is_fixed() {
            return *self;
        }
        Self {
            shape: self.shape,
            blocks: self.blocks.map(|(x, y)| (y, -x)),
        }
    }

    /// Rotate 90° clockwise: `(x, y) -> (-y, x)`.
    pub fn rotate_right(&self) -> Self {
        if self.is_fixed() {
            return *self;
        }
        Self {
            shape: self.shape,
            blocks: self.blocks.map(|(x, y)| (-y, x)),
        }
    }

    fn is_fixed(&self) -> bool {
        self.shape.map_or(true, |s| s.is_rotation_invariant())
    }

    pub fn min_x(&self) -> i8 {
        self.blocks.iter().map(|b| b.0).min().unwrap_or(0)
    }

    pub fn max_x(&self) -> i8 {
        self.blocks.iter().map(|b| b.0).max().unwrap_or(0)
    }

    pub fn min_y(&self) -> i8 {
        self.blocks.iter().map(|b| b.1).min().unwrap_or(0)
    }

    pub fn max_y(&self) -> i8 {
        self.blocks.iter().map(|b| b.1).max().unwrap_or(0)
    }

    pub fn width(&self) -> i8 {
        self.max_x() - self.min_x() + 1
    }

    pub fn height(&self) -> i8 {
        self.max_y() - self.min_y() + 1
    }
}

impl From<Shape> for Piece {
    fn from(shape: Shape) -> Self {
        Self::new(shape)
    }
}
