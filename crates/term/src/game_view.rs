//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameStatus, Shape, BOARD_CEILING, BOARD_WIDTH};

const BLOCK: char = '█';
const GHOST: char = '▒';

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const BORDER: Rgb = Rgb::new(200, 200, 200);
const DANGER: Rgb = Rgb::new(220, 60, 60);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Board position on screen, shared by the drawing helpers.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the Tetrion.
///
/// Only rows below the ceiling are drawn. Row 0 is at the bottom of the well.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    ///
    /// Callers can reuse a framebuffer across frames.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(BORDER, PANEL_BG).into_cell(' '));

        let board_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_h = (BOARD_CEILING as u16) * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_w + 2) / 2,
            y: viewport.height.saturating_sub(board_h + 2) / 2,
            w: board_w + 2,
            h: board_h + 2,
        };

        let border_fg = if snap.danger_zone { DANGER } else { BORDER };
        fb.fill_rect(frame.x + 1, frame.y + 1, board_w, board_h, ' ', CellStyle::new(BORDER, BOARD_BG));
        draw_border(fb, frame, CellStyle::new(border_fg, PANEL_BG));

        for y in 0..BOARD_CEILING {
            for x in 0..BOARD_WIDTH {
                match snap.cell(x, y).flatten() {
                    Some(shape) => {
                        let style = CellStyle::new(shape.colors().normal, BOARD_BG);
                        self.put_board_cell(fb, frame, x, y, BLOCK, style);
                    }
                    None => {
                        let style = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
                        self.put_board_cell(fb, frame, x, y, '·', style);
                    }
                }
            }
        }

        if let Some(active) = snap.active {
            if let Some(ghost_y) = snap.ghost_y {
                let style = CellStyle::new(active.shape.colors().ghost, BOARD_BG);
                for (x, y) in active.ghost_cells(ghost_y) {
                    self.put_board_cell(fb, frame, x, y, GHOST, style);
                }
            }
            let style = CellStyle::new(active.shape.colors().active, BOARD_BG).bold();
            for (x, y) in active.cells {
                self.put_board_cell(fb, frame, x, y, BLOCK, style);
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);
        draw_status_line(fb, snap, frame);

        if snap.paused() {
            draw_overlay_text(fb, frame, "PAUSED");
        } else if snap.game_over() {
            draw_overlay_text(fb, frame, "GAME OVER");
        } else if !snap.started() {
            draw_overlay_text(fb, frame, "P TO START");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Screen position of the top-left character of board cell `(x, y)`.
    fn cell_origin(&self, frame: Frame, x: i8, y: i8) -> Option<(u16, u16)> {
        if !(0..BOARD_WIDTH).contains(&x) || !(0..BOARD_CEILING).contains(&y) {
            return None;
        }
        let row_from_top = (BOARD_CEILING - 1 - y) as u16;
        Some((
            frame.x + 1 + (x as u16) * self.cell_w,
            frame.y + 1 + row_from_top * self.cell_h,
        ))
    }

    fn put_board_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, ch: char, style: CellStyle) {
        if let Some((px, py)) = self.cell_origin(frame, x, y) {
            fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (name, n) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level as u64),
            ("LINES", snap.lines as u64),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_num(panel_x, y + 1, n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "MODE", label);
        fb.put_str(panel_x, y + 1, snap.mode.as_str(), value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match snap.hold {
            Some(shape) => {
                let style = if snap.hold_available {
                    CellStyle::new(shape.colors().normal, PANEL_BG)
                } else {
                    CellStyle::new(shape.colors().ghost, PANEL_BG).dim()
                };
                draw_mini(fb, panel_x, y, shape, style);
            }
            None => {
                fb.put_str(panel_x, y, "-", value);
            }
        }
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for shape in snap.next.iter() {
            if y.saturating_add(2) > viewport.height {
                break;
            }
            draw_mini(fb, panel_x, y, *shape, CellStyle::new(shape.colors().normal, PANEL_BG));
            y = y.saturating_add(3);
        }
    }
}

/// Small two-row drawing of a shape in its spawn orientation.
fn draw_mini(fb: &mut FrameBuffer, x: u16, y: u16, shape: Shape, style: CellStyle) {
    let offsets = shape.offsets();
    let min_x = offsets.iter().map(|b| b.0).min().unwrap_or(0);
    let min_y = offsets.iter().map(|b| b.1).min().unwrap_or(0);
    for (bx, by) in offsets {
        let px = x + ((bx - min_x) as u16) * 2;
        let py = y + (by - min_y) as u16;
        fb.put_str(px, py, "██", style);
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// One line under the well: game state, danger warning, key hints.
fn draw_status_line(fb: &mut FrameBuffer, snap: &GameSnapshot, frame: Frame) {
    let y = frame.y.saturating_add(frame.h);
    let state = match snap.status {
        GameStatus::Idle => "IDLE",
        GameStatus::Running => "RUNNING",
        GameStatus::Paused => "PAUSED",
        GameStatus::GameOver => "OVER",
    };
    let mut x = fb.put_str(frame.x, y, state, CellStyle::new(BORDER, PANEL_BG).bold());
    if snap.danger_zone {
        x = fb.put_str(x + 1, y, "DANGER", CellStyle::new(DANGER, PANEL_BG).bold());
    }
    fb.put_str(x + 1, y, "p:pause r:restart q:quit", CellStyle::new(BORDER, PANEL_BG).dim());
}

fn draw_overlay_text(fb: &mut FrameBuffer, frame: Frame, text: &str) {
    let mid_y = frame.y.saturating_add(frame.h / 2);
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    fb.put_str(x, mid_y, text, style);
}
