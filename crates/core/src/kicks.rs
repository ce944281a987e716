//! Kick scans for blocked rotations
//!
//! When a rotated piece does not fit at its anchor, the engine may look for
//! a nearby anchor instead. Both scans are bounded by the piece's own
//! extent and return the first free anchor found.
//!
//! The `fits` closure reports whether the candidate piece fits at a given
//! anchor, so these functions stay independent of the playfield type.

use crate::piece::Piece;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Sideways scan on the anchor row.
///
/// Scans rightward `x+1 .. x+w-1` when the piece has room on the right of
/// `x`, otherwise leftward from `x-1` down to `x-w`.
pub fn wall_kick(piece: &Piece, x: i8, y: i8, fits: impl Fn(i8, i8) -> bool) -> Option<i8> {
    let w = piece.width();
    if x >= 0 && x <= BOARD_WIDTH - w - 1 {
        (x + 1..x + w - 1).find(|&kx| fits(kx, y))
    } else if x >= w - 1 && x < BOARD_WIDTH {
        (x - w..x).rev().find(|&kx| fits(kx, y))
    } else {
        None
    }
}

/// Upward scan `y+1 .. y+h` in the anchor column.
pub fn floor_kick(piece: &Piece, x: i8, y: i8, fits: impl Fn(i8, i8) -> bool) -> Option<i8> {
    let h = piece.height();
    if y >= 0 && y <= BOARD_HEIGHT - h - 1 {
        (y + 1..y + h).find(|&ky| fits(x, ky))
    } else {
        None
    }
}
