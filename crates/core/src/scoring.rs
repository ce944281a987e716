//! Scoring module - line clear points, drop bonuses and the gravity curve
//!
//! Line clears pay `LINE_SCORES[n] * (level + 1)^2`, using the level the
//! piece locked at. Hard drops pay per cell; soft drops pay one point per
//! cell descended while the key is held.

use crate::types::{
    HARD_DROP_POINTS_PER_CELL, LINES_PER_LEVEL, LINE_SCORES, MAX_GRAVITY, TICKS_PER_SECOND,
};

/// Points for clearing `lines` rows at `level`.
pub fn line_clear_score(lines: usize, level: u32) -> u64 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    let multiplier = (level as u64 + 1).pow(2);
    LINE_SCORES[lines] * multiplier
}

/// Points for a hard drop of `cells` rows.
pub fn hard_drop_score(cells: u32) -> u64 {
    cells as u64 * HARD_DROP_POINTS_PER_CELL
}

/// Whether clearing `cleared` rows moved the line total across a level boundary.
///
/// A single lock raises the level by at most one, however many
/// boundaries it crosses.
pub fn crosses_level_boundary(lines_after: u32, cleared: u32) -> bool {
    let before = lines_after.saturating_sub(cleared);
    lines_after / LINES_PER_LEVEL > before / LINES_PER_LEVEL
}

/// Gravity in cells per tick: `min(20, ratio^level / 60)`.
pub fn gravity_for_level(speed_up_ratio: f64, level: u32) -> f64 {
    let exponent = level.min(i32::MAX as u32) as i32;
    (speed_up_ratio.powi(exponent) / TICKS_PER_SECOND as f64).min(MAX_GRAVITY)
}
