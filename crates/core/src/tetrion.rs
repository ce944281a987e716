//! Tetrion module - the engine state machine
//!
//! [`Tetrion`] owns the playfield, the next-shape queue, the falling and
//! held pieces and every counter the rules need. It is driven from outside:
//! call [`Tetrion::tick`] sixty times a second and feed key edges through
//! [`Tetrion::apply`] between ticks.
//!
//! # Tick order
//!
//! 1. With no falling piece, spawn one and stop there.
//! 2. Resolve a pending rotation (kicks allowed).
//! 3. Auto-shift a held shift key.
//! 4. Apply gravity, one cell at a time.
//! 5. If the last descent failed, advance the lock delay and maybe lock.
//!
//! Locking clears rows and scores immediately; the next piece spawns on the
//! following tick.

use crate::kicks::{floor_kick, wall_kick};
use crate::log_event;
use crate::piece::Piece;
use crate::playfield::Playfield;
use crate::queue::ShapeQueue;
use crate::scoring::{crosses_level_boundary, gravity_for_level, hard_drop_score, line_clear_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

use arrayvec::ArrayVec;

/// Emitted once per lock, consumed with [`Tetrion::take_last_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Line clear points only; drop bonuses are not included.
    pub points: u64,
    pub level_up: bool,
    pub danger_zone: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

impl Direction {
    fn dx(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Key state as last reported by press/release intents.
#[derive(Debug, Clone, Copy, Default)]
struct HeldControls {
    shift_left: bool,
    shift_right: bool,
    rotate_left: bool,
    rotate_right: bool,
    soft_drop: bool,
    hard_drop: bool,
}

impl HeldControls {
    fn slot(&mut self, control: Control) -> &mut bool {
        match control {
            Control::ShiftLeft => &mut self.shift_left,
            Control::ShiftRight => &mut self.shift_right,
            Control::RotateLeft => &mut self.rotate_left,
            Control::RotateRight => &mut self.rotate_right,
            Control::SoftDrop => &mut self.soft_drop,
            Control::HardDrop => &mut self.hard_drop,
        }
    }

    fn is_held(&self, control: Control) -> bool {
        match control {
            Control::ShiftLeft => self.shift_left,
            Control::ShiftRight => self.shift_right,
            Control::RotateLeft => self.rotate_left,
            Control::RotateRight => self.rotate_right,
            Control::SoftDrop => self.soft_drop,
            Control::HardDrop => self.hard_drop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Falling {
    piece: Piece,
    x: i8,
    y: i8,
}

#[derive(Debug)]
pub struct Tetrion {
    playfield: Playfield,
    queue: ShapeQueue,
    mode: Mode,
    rules: Rules,
    /// Level used when a pause toggle starts a new game.
    start_level: u32,
    status: GameStatus,
    falling: Option<Falling>,
    hold: Option<Shape>,
    hold_available: bool,
    lines: u32,
    score: u64,
    level: u32,
    /// Cells per tick.
    gravity: f64,
    lock_delay_frames: u32,
    frames_since_last_drop: u32,
    /// Cells descended under soft drop since the last credit; `None` when not soft dropping.
    soft_drop_streak: Option<u32>,
    danger_zone: bool,
    held: HeldControls,
    shift: Option<Direction>,
    shift_countdown: u32,
    pending_rotation: Option<Direction>,
    last_event: Option<LockEvent>,
}

impl Tetrion {
    /// An idle engine in the default mode, drawing from `queue`.
    pub fn new(queue: ShapeQueue) -> Self {
        let mode = Mode::default();
        let rules = mode.rules();
        Self {
            playfield: Playfield::new(),
            queue,
            mode,
            rules,
            start_level: 0,
            status: GameStatus::Idle,
            falling: None,
            hold: None,
            hold_available: true,
            lines: 0,
            score: 0,
            level: 0,
            gravity: gravity_for_level(rules.speed_up_ratio, 0),
            lock_delay_frames: 0,
            frames_since_last_drop: 0,
            soft_drop_streak: None,
            danger_zone: false,
            held: HeldControls::default(),
            shift: None,
            shift_countdown: AUTO_SHIFT_DELAY,
            pending_rotation: None,
            last_event: None,
        }
    }

    /// Engine with a local seeded bag and the default preview size.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ShapeQueue::seeded(seed, DEFAULT_PREVIEW_LEN))
    }

    // ---- configuration ----

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Switch rule sets. Gravity is recomputed for the current level.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.rules = mode.rules();
        self.set_level(self.level);
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    pub fn set_start_level(&mut self, level: u32) {
        self.start_level = level;
    }

    // ---- queries ----

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn started(&self) -> bool {
        self.status.is_started()
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    /// Direct access to the locked cells, for puzzle setups and tests.
    pub fn playfield_mut(&mut self) -> &mut Playfield {
        &mut self.playfield
    }

    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling.as_ref().map(|f| &f.piece)
    }

    pub fn falling_shape(&self) -> Option<Shape> {
        self.falling.and_then(|f| f.piece.shape())
    }

    /// Anchor of the falling piece.
    pub fn falling_position(&self) -> Option<(i8, i8)> {
        self.falling.map(|f| (f.x, f.y))
    }

    /// Absolute cells of the falling piece.
    pub fn falling_cells(&self) -> Option<[(i8, i8); 4]> {
        self.falling.map(|f| f.piece.cells(f.x, f.y))
    }

    /// Lowest anchor row the falling piece can reach by dropping straight down.
    pub fn ghost_y(&self) -> Option<i8> {
        let f = self.falling?;
        let mut y = f.y;
        while self.playfield.is_occupiable(&f.piece, f.x, y - 1) {
            y -= 1;
        }
        Some(y)
    }

    pub fn hold_piece(&self) -> Option<Shape> {
        self.hold
    }

    pub fn hold_available(&self) -> bool {
        self.hold_available
    }

    pub fn next_shapes(&self) -> ArrayVec<Shape, MAX_PREVIEW_LEN> {
        self.queue.next_shapes()
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn danger_zone(&self) -> bool {
        self.danger_zone
    }

    pub fn lock_delay_frames(&self) -> u32 {
        self.lock_delay_frames
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.is_held(control)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        for (row, cells) in out.board.iter_mut().zip(self.playfield.rows()) {
            row.copy_from_slice(cells);
        }
        out.active = self.falling.and_then(|f| {
            f.piece.shape().map(|shape| ActiveSnapshot {
                shape,
                x: f.x,
                y: f.y,
                cells: f.piece.cells(f.x, f.y),
            })
        });
        out.ghost_y = self.ghost_y();
        out.hold = self.hold;
        out.hold_available = self.hold_available;
        out.next = self.queue.next_shapes();
        out.status = self.status;
        out.mode = self.mode;
        out.lines = self.lines;
        out.score = self.score;
        out.level = self.level;
        out.gravity = self.gravity;
        out.danger_zone = self.danger_zone;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    // ---- lifecycle ----

    /// Reset everything and begin a game at `level`. Ignored while paused.
    pub fn start(&mut self, level: u32) {
        if self.status == GameStatus::Paused {
            return;
        }
        log_event!(
            "Tetrion",
            "starting game at level {} ({})",
            level,
            self.mode.as_str()
        );

        self.playfield.clear();
        self.falling = None;
        self.hold = None;
        self.hold_available = true;
        self.lines = 0;
        self.score = 0;
        self.lock_delay_frames = 0;
        self.frames_since_last_drop = 0;
        self.soft_drop_streak = None;
        self.danger_zone = false;
        self.shift_countdown = AUTO_SHIFT_DELAY;
        self.pending_rotation = None;
        self.last_event = None;
        self.set_level(level);
        self.status = GameStatus::Running;
    }

    /// End the game, discarding the falling and held pieces.
    pub fn stop(&mut self) {
        if self.status.is_started() {
            log_event!(
                "Tetrion",
                "game over: {} lines, score {}, level {}",
                self.lines,
                self.score,
                self.level
            );
        }
        self.falling = None;
        self.hold = None;
        self.status = GameStatus::GameOver;
    }

    /// Pause or resume; with no game in progress, start one at the start level.
    pub fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Running => self.status = GameStatus::Paused,
            GameStatus::Paused => self.status = GameStatus::Running,
            GameStatus::Idle | GameStatus::GameOver => self.start(self.start_level),
        }
    }

    fn set_level(&mut self, level: u32) {
        self.level = level;
        self.gravity = gravity_for_level(self.rules.speed_up_ratio, level);
    }

    fn is_live(&self) -> bool {
        self.status == GameStatus::Running && self.falling.is_some()
    }

    // ---- input ----

    /// Apply one intent. Returns whether it had any effect.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Press(control) => self.press(control),
            Intent::Release(control) => self.release(control),
            Intent::Hold => self.hold(),
            Intent::PauseToggle => {
                self.toggle_pause();
                true
            }
            Intent::Start(level) => {
                if self.paused() {
                    return false;
                }
                self.start(level);
                true
            }
        }
    }

    fn press(&mut self, control: Control) -> bool {
        let slot = self.held.slot(control);
        if *slot {
            return false;
        }
        *slot = true;

        match control {
            Control::ShiftLeft | Control::ShiftRight => {
                let dir = shift_direction(control);
                self.shift = Some(dir);
                self.shift_countdown = AUTO_SHIFT_DELAY;
                self.shift_falling(dir);
            }
            Control::RotateLeft => self.pending_rotation = Some(Direction::Left),
            Control::RotateRight => self.pending_rotation = Some(Direction::Right),
            Control::SoftDrop => {
                if self.status == GameStatus::Running {
                    self.frames_since_last_drop = 0;
                    self.soft_drop_streak = Some(0);
                }
            }
            Control::HardDrop => {
                self.hard_drop();
            }
        }
        true
    }

    fn release(&mut self, control: Control) -> bool {
        let slot = self.held.slot(control);
        if !*slot {
            return false;
        }
        *slot = false;

        match control {
            Control::ShiftLeft | Control::ShiftRight => {
                let dir = shift_direction(control);
                if self.shift == Some(dir) {
                    self.shift = if self.held.shift_left {
                        Some(Direction::Left)
                    } else if self.held.shift_right {
                        Some(Direction::Right)
                    } else {
                        None
                    };
                }
                self.shift_countdown = AUTO_SHIFT_DELAY;
            }
            Control::RotateLeft => {
                if self.pending_rotation == Some(Direction::Left) {
                    self.pending_rotation = None;
                }
            }
            Control::RotateRight => {
                if self.pending_rotation == Some(Direction::Right) {
                    self.pending_rotation = None;
                }
            }
            Control::SoftDrop | Control::HardDrop => {}
        }
        true
    }

    /// Store the falling shape and bring in the held one (or the next queued one).
    pub fn hold(&mut self) -> bool {
        if !self.is_live() || !self.hold_available {
            return false;
        }
        self.spawn(true);
        true
    }

    // ---- simulation ----

    /// Advance one frame. Returns true when a piece locked.
    pub fn tick(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        if self.falling.is_none() {
            self.spawn(false);
            return false;
        }

        self.resolve_rotation();
        self.auto_shift();
        self.apply_gravity()
    }

    fn resolve_rotation(&mut self) {
        let (Some(dir), Some(f)) = (self.pending_rotation, self.falling) else {
            return;
        };
        let candidate = match dir {
            Direction::Left => f.piece.rotate_left(),
            Direction::Right => f.piece.rotate_right(),
        };
        if self.try_move(candidate, f.x, f.y, true) {
            self.pending_rotation = None;
        }
    }

    fn auto_shift(&mut self) {
        let Some(dir) = self.shift else {
            return;
        };
        if self.shift_countdown > 0 {
            self.shift_countdown -= 1;
            if self.shift_countdown > 0 {
                return;
            }
        }
        // A blocked repeat leaves the countdown at zero and retries next tick.
        if self.shift_falling(dir) {
            self.shift_countdown = AUTO_SHIFT_PERIOD;
        }
    }

    fn apply_gravity(&mut self) -> bool {
        self.frames_since_last_drop += 1;
        let mut cells = self.gravity * self.frames_since_last_drop as f64;
        if self.held.soft_drop {
            cells *= SOFT_DROP_FACTOR;
        }

        let mut grounded = false;
        while cells >= 1.0 {
            cells -= 1.0;
            if !self.descend() {
                grounded = true;
                break;
            }
        }
        if !grounded {
            return false;
        }

        let waited = self.lock_delay_frames;
        self.lock_delay_frames += 1;
        if waited >= self.rules.lock_delay {
            self.lock_piece();
            return true;
        }
        false
    }

    /// Move the falling piece down one row, settling soft drop points on failure.
    fn descend(&mut self) -> bool {
        let Some(f) = self.falling else {
            return false;
        };
        if self.try_move(f.piece, f.x, f.y - 1, false) {
            self.frames_since_last_drop = 0;
            if self.held.soft_drop {
                if let Some(streak) = self.soft_drop_streak.as_mut() {
                    *streak += 1;
                }
            }
            return true;
        }

        if self.held.soft_drop {
            self.score += self.soft_drop_streak.unwrap_or(0) as u64;
            self.soft_drop_streak = Some(0);
        } else {
            self.soft_drop_streak = None;
        }
        false
    }

    fn shift_falling(&mut self, dir: Direction) -> bool {
        if !self.is_live() {
            return false;
        }
        let Some(f) = self.falling else {
            return false;
        };
        self.try_move(f.piece, f.x + dir.dx(), f.y, false)
    }

    /// Drop to the floor and lock at once.
    fn hard_drop(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        let Some(start) = self.falling else {
            return false;
        };

        let mut y = start.y;
        while self.try_move(start.piece, start.x, y - 1, false) {
            y -= 1;
        }
        if self.held.hard_drop {
            self.score += hard_drop_score((start.y - y) as u32);
        }
        self.lock_piece();
        true
    }

    /// Place `piece` at `(x, y)`, or at a kicked anchor when `rotating`.
    fn try_move(&mut self, piece: Piece, x: i8, y: i8, rotating: bool) -> bool {
        let target = {
            let fits = |kx: i8, ky: i8| self.playfield.is_occupiable(&piece, kx, ky);
            if fits(x, y) {
                Some((x, y))
            } else if !rotating {
                None
            } else {
                let walled = if self.rules.wall_kick {
                    wall_kick(&piece, x, y, &fits).map(|kx| (kx, y))
                } else {
                    None
                };
                match walled {
                    Some(t) => Some(t),
                    None if self.rules.floor_kick => {
                        floor_kick(&piece, x, y, &fits).map(|ky| (x, ky))
                    }
                    None => None,
                }
            }
        };

        let Some((x, y)) = target else {
            return false;
        };
        self.falling = Some(Falling { piece, x, y });
        if self.rules.infinite_lock_delay {
            self.lock_delay_frames = 0;
        }
        true
    }

    fn spawn(&mut self, from_hold: bool) {
        let current = self.falling.and_then(|f| f.piece.shape());
        let shape = match (from_hold, current) {
            (true, Some(current)) => {
                self.hold_available = false;
                match self.hold.replace(current) {
                    Some(held) => held,
                    None => self.queue.take(),
                }
            }
            _ => self.queue.take(),
        };

        let piece = Piece::new(shape);
        self.falling = None;
        self.lock_delay_frames = 0;
        self.frames_since_last_drop = 0;
        // Drop points belong to the piece that earned them.
        self.soft_drop_streak = self.held.soft_drop.then_some(0);
        if !self.try_move(piece, SPAWN_X, SPAWN_Y + piece.min_y(), false) {
            self.stop();
        }
    }

    fn lock_piece(&mut self) {
        let Some(f) = self.falling.take() else {
            return;
        };
        self.playfield.lock(&f.piece, f.x, f.y);
        self.lock_delay_frames = 0;
        self.frames_since_last_drop = 0;
        self.hold_available = true;

        let cleared = self.playfield.clear_full_rows() as u32;
        let points = line_clear_score(cleared as usize, self.level);
        self.score += points;
        self.lines += cleared;

        let level_up = cleared > 0 && crosses_level_boundary(self.lines, cleared);
        if level_up {
            self.set_level(self.level + 1);
            log_event!(
                "Tetrion",
                "level {} ({:.3} cells/tick)",
                self.level,
                self.gravity
            );
        }
        if cleared == 4 {
            log_event!("Tetrion", "TETRIS");
        }

        self.danger_zone = self.playfield.is_in_danger_zone();
        self.last_event = Some(LockEvent {
            lines_cleared: cleared,
            points,
            level_up,
            danger_zone: self.danger_zone,
        });
    }
}

fn shift_direction(control: Control) -> Direction {
    if control == Control::ShiftLeft {
        Direction::Left
    } else {
        Direction::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::ShapeSource;
    use std::collections::VecDeque;

    /// Replays the given shapes, then cycles O pieces.
    struct Script(VecDeque<Shape>);

    impl ShapeSource for Script {
        fn take(&mut self) -> Option<Shape> {
            Some(self.0.pop_front().unwrap_or(Shape::O))
        }
    }

    fn scripted(shapes: &[Shape], mode: Mode) -> Tetrion {
        let queue = ShapeQueue::new(Script(shapes.iter().copied().collect()), 3);
        let mut t = Tetrion::new(queue);
        t.set_mode(mode);
        t
    }

    fn tap(t: &mut Tetrion, control: Control) -> bool {
        let pressed = t.apply(Intent::Press(control));
        t.apply(Intent::Release(control));
        pressed
    }

    #[test]
    fn test_new_is_idle() {
        let mut t = Tetrion::with_seed(1);
        assert_eq!(t.status(), GameStatus::Idle);
        assert!(!t.started());
        assert!(!t.tick());
        assert!(t.falling_piece().is_none());
        assert_eq!(t.next_shapes().len(), DEFAULT_PREVIEW_LEN);
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut t = scripted(&[Shape::J], Mode::Mix);
        t.start(0);
        assert!(t.falling_piece().is_none());
        t.tick();
        assert_eq!(t.falling_shape(), Some(Shape::J));
        // J has min_y = -1, so its top block still lands on row 19.
        assert_eq!(t.falling_position(), Some((4, 18)));
        let top = t.falling_cells().map(|c| c.iter().map(|p| p.1).max());
        assert_eq!(top, Some(Some(19)));
    }

    #[test]
    fn test_hard_drop_i_in_modern() {
        let mut t = scripted(&[Shape::I], Mode::Modern);
        t.start(0);
        t.tick();
        assert!(tap(&mut t, Control::HardDrop));

        for x in 3..=6 {
            assert_eq!(t.playfield().cell(x, 0), Some(Shape::I));
        }
        assert_eq!(t.playfield().filled_count(), 4);
        assert_eq!(t.score(), 38);
        assert!(t.falling_piece().is_none());
    }

    #[test]
    fn test_held_hard_drop_does_not_repeat() {
        let mut t = scripted(&[Shape::I, Shape::T], Mode::Mix);
        t.start(0);
        t.tick();
        assert!(t.apply(Intent::Press(Control::HardDrop)));
        t.tick();
        assert_eq!(t.falling_shape(), Some(Shape::T));
        // Key repeat while held is ignored.
        assert!(!t.apply(Intent::Press(Control::HardDrop)));
        assert_eq!(t.falling_shape(), Some(Shape::T));
    }

    #[test]
    fn test_tetris_scores_1200() {
        let mut t = scripted(&[Shape::I], Mode::Mix);
        t.start(0);
        for y in 0..4 {
            t.playfield_mut().fill_row_except(y, Shape::Z, &[4]);
        }
        t.tick();
        t.apply(Intent::Press(Control::RotateRight));
        t.tick();
        assert_eq!(t.falling_piece().map(|p| p.width()), Some(1));

        tap(&mut t, Control::HardDrop);
        let event = t.take_last_event().expect("lock event");
        assert_eq!(event.lines_cleared, 4);
        assert_eq!(event.points, 1200);
        assert_eq!(t.lines(), 4);
        // 17 cells of hard drop on top.
        assert_eq!(t.score(), 1200 + 34);
        assert_eq!(t.playfield().filled_count(), 0);
    }

    #[test]
    fn test_single_at_level_two_scores_360() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(2);
        t.playfield_mut().fill_row_except(0, Shape::L, &[4, 5]);
        t.tick();
        tap(&mut t, Control::HardDrop);

        let event = t.take_last_event().expect("lock event");
        assert_eq!(event.points, 360);
        assert_eq!(t.score(), 360 + 36);
        assert_eq!(t.playfield().cell(4, 0), Some(Shape::O));
        assert_eq!(t.playfield().cell(5, 0), Some(Shape::O));
        assert_eq!(t.playfield().filled_count(), 2);
    }

    #[test]
    fn test_level_rises_once_per_boundary() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.lines = 8;
        t.playfield_mut().fill_row_except(0, Shape::L, &[4, 5]);
        t.playfield_mut().fill_row_except(1, Shape::L, &[4, 5]);
        t.tick();
        tap(&mut t, Control::HardDrop);

        let event = t.take_last_event().expect("lock event");
        assert_eq!(event.points, 100);
        assert!(event.level_up);
        assert_eq!(t.lines(), 10);
        assert_eq!(t.level(), 1);
        assert_eq!(t.gravity(), gravity_for_level(t.rules().speed_up_ratio, 1));
    }

    #[test]
    fn test_level_boundary_from_high_start_level() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(5);
        t.lines = 19;
        t.playfield_mut().fill_row_except(0, Shape::L, &[4, 5]);
        t.tick();
        tap(&mut t, Control::HardDrop);
        assert_eq!(t.lines(), 20);
        assert_eq!(t.level(), 6);
    }

    #[test]
    fn test_no_level_up_without_clear() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        tap(&mut t, Control::HardDrop);
        let event = t.take_last_event().expect("lock event");
        assert!(!event.level_up);
        assert_eq!(event.lines_cleared, 0);
        assert_eq!(t.level(), 0);
        assert!(t.take_last_event().is_none());
    }

    #[test]
    fn test_hold_flow() {
        let mut t = scripted(&[Shape::T, Shape::S, Shape::Z], Mode::Mix);
        t.start(0);
        t.tick();
        assert_eq!(t.falling_shape(), Some(Shape::T));

        assert!(t.apply(Intent::Hold));
        assert_eq!(t.hold_piece(), Some(Shape::T));
        assert_eq!(t.falling_shape(), Some(Shape::S));
        assert!(!t.hold_available());

        // Second hold before a lock does nothing.
        assert!(!t.apply(Intent::Hold));
        assert_eq!(t.hold_piece(), Some(Shape::T));
        assert_eq!(t.falling_shape(), Some(Shape::S));

        tap(&mut t, Control::HardDrop);
        assert!(t.hold_available());
        t.tick();
        assert_eq!(t.falling_shape(), Some(Shape::Z));

        assert!(t.apply(Intent::Hold));
        assert_eq!(t.falling_shape(), Some(Shape::T));
        assert_eq!(t.hold_piece(), Some(Shape::Z));
        assert_eq!(t.falling_position(), Some((SPAWN_X, SPAWN_Y - 1)));
    }

    #[test]
    fn test_hold_requires_running_game() {
        let mut t = Tetrion::with_seed(3);
        assert!(!t.apply(Intent::Hold));
        t.start(0);
        // Nothing has spawned yet.
        assert!(!t.apply(Intent::Hold));
    }

    #[test]
    fn test_classic_locks_on_first_failed_descent() {
        let mut t = scripted(&[Shape::I], Mode::Classic);
        t.start(60);
        assert_eq!(t.gravity(), MAX_GRAVITY);
        t.tick();
        assert!(t.tick());
        assert_eq!(t.playfield().cell(3, 0), Some(Shape::I));
    }

    #[test]
    fn test_modern_lock_delay_counts_grounded_ticks() {
        let mut t = scripted(&[Shape::I], Mode::Modern);
        t.start(30);
        t.tick();
        for _ in 0..30 {
            assert!(!t.tick());
        }
        assert_eq!(t.falling_position(), Some((4, 0)));
        assert!(t.tick());
    }

    #[test]
    fn test_infinity_resets_lock_delay_on_move() {
        let mut t = scripted(&[Shape::I], Mode::Modern);
        t.start(30);
        t.tick();
        for _ in 0..20 {
            assert!(!t.tick());
        }
        assert!(tap(&mut t, Control::ShiftRight));
        assert_eq!(t.lock_delay_frames(), 0);
        for _ in 0..30 {
            assert!(!t.tick());
        }
        assert!(t.tick());
        assert_eq!(t.playfield().cell(7, 0), Some(Shape::I));
    }

    #[test]
    fn test_mix_lock_delay_ignores_moves() {
        let mut t = scripted(&[Shape::I], Mode::Mix);
        t.start(60);
        t.tick();
        for _ in 0..20 {
            assert!(!t.tick());
        }
        tap(&mut t, Control::ShiftRight);
        for _ in 0..10 {
            assert!(!t.tick());
        }
        assert!(t.tick());
    }

    #[test]
    fn test_auto_shift_timing() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        assert_eq!(t.falling_position().map(|p| p.0), Some(4));

        t.apply(Intent::Press(Control::ShiftLeft));
        assert_eq!(t.falling_position().map(|p| p.0), Some(3));
        for _ in 0..10 {
            t.tick();
        }
        assert_eq!(t.falling_position().map(|p| p.0), Some(3));
        t.tick();
        assert_eq!(t.falling_position().map(|p| p.0), Some(2));
        for _ in 0..5 {
            t.tick();
        }
        assert_eq!(t.falling_position().map(|p| p.0), Some(2));
        t.tick();
        assert_eq!(t.falling_position().map(|p| p.0), Some(1));

        t.apply(Intent::Release(Control::ShiftLeft));
        for _ in 0..20 {
            t.tick();
        }
        assert_eq!(t.falling_position().map(|p| p.0), Some(1));
    }

    #[test]
    fn test_blocked_shift_retries_every_tick() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        t.apply(Intent::Press(Control::ShiftRight));
        // 4 -> 5 immediately, then repeats at ticks 11, 17 and 23 reach column 8.
        for _ in 0..23 {
            t.tick();
        }
        assert_eq!(t.falling_position().map(|p| p.0), Some(8));
        for _ in 0..6 {
            t.tick();
        }
        assert_eq!(t.shift_countdown, 0);
        t.tick();
        assert_eq!(t.falling_position().map(|p| p.0), Some(8));
    }

    #[test]
    fn test_rotation_resolves_on_tick() {
        let mut t = scripted(&[Shape::T], Mode::Mix);
        t.start(0);
        t.tick();
        let before = *t.falling_piece().expect("piece");
        t.apply(Intent::Press(Control::RotateLeft));
        assert_eq!(t.falling_piece(), Some(&before));
        t.tick();
        assert_eq!(t.falling_piece(), Some(&before.rotate_left()));

        // One rotation per press.
        t.tick();
        assert_eq!(t.falling_piece(), Some(&before.rotate_left()));
    }

    #[test]
    fn test_release_cancels_pending_rotation() {
        let mut t = scripted(&[Shape::T], Mode::Mix);
        t.start(0);
        t.tick();
        let before = *t.falling_piece().expect("piece");
        tap(&mut t, Control::RotateRight);
        t.tick();
        assert_eq!(t.falling_piece(), Some(&before));
    }

    /// Vertical I pushed against the right wall, ready to rotate back flat.
    fn vertical_i_on_right_wall(mode: Mode) -> Tetrion {
        let mut t = scripted(&[Shape::I], mode);
        t.start(0);
        t.tick();
        t.apply(Intent::Press(Control::RotateRight));
        t.tick();
        t.apply(Intent::Release(Control::RotateRight));
        for _ in 0..6 {
            tap(&mut t, Control::ShiftRight);
        }
        assert_eq!(t.falling_position().map(|p| p.0), Some(9));
        t
    }

    #[test]
    fn test_wall_kick_moves_rotation_off_wall() {
        let mut t = vertical_i_on_right_wall(Mode::Modern);
        t.apply(Intent::Press(Control::RotateLeft));
        t.tick();
        assert_eq!(t.falling_piece().map(|p| p.width()), Some(4));
        assert_eq!(t.falling_position().map(|p| p.0), Some(7));
    }

    #[test]
    fn test_classic_has_no_wall_kick() {
        let mut t = vertical_i_on_right_wall(Mode::Classic);
        t.apply(Intent::Press(Control::RotateLeft));
        t.tick();
        assert_eq!(t.falling_piece().map(|p| p.width()), Some(1));
        assert_eq!(t.falling_position().map(|p| p.0), Some(9));
    }

    /// Flat I resting on the floor with gravity far from its next step.
    fn flat_i_on_floor(mode: Mode) -> Tetrion {
        let mut t = scripted(&[Shape::I], mode);
        t.start(0);
        t.tick();
        t.falling = Some(Falling {
            piece: Piece::new(Shape::I),
            x: 4,
            y: 0,
        });
        t.frames_since_last_drop = 0;
        t
    }

    #[test]
    fn test_classic_floor_kick_lifts_rotation() {
        let mut t = flat_i_on_floor(Mode::Classic);
        t.apply(Intent::Press(Control::RotateRight));
        assert!(!t.tick());
        assert_eq!(t.falling_piece().map(|p| p.width()), Some(1));
        assert_eq!(t.falling_position(), Some((4, 2)));
        assert_eq!(t.falling_cells().map(|c| c.iter().map(|p| p.1).min()), Some(Some(0)));
    }

    #[test]
    fn test_modern_falls_back_to_floor_kick() {
        let mut t = flat_i_on_floor(Mode::Modern);
        assert!(t.rules().wall_kick);
        t.apply(Intent::Press(Control::RotateRight));
        t.tick();
        assert_eq!(t.falling_piece().map(|p| p.width()), Some(1));
        assert_eq!(t.falling_position(), Some((4, 2)));
    }

    #[test]
    fn test_mix_has_no_floor_kick() {
        let mut t = flat_i_on_floor(Mode::Mix);
        t.apply(Intent::Press(Control::RotateRight));
        t.tick();
        assert_eq!(t.falling_piece().map(|p| p.width()), Some(4));
        assert_eq!(t.falling_position(), Some((4, 0)));
    }

    #[test]
    fn test_soft_drop_credits_on_landing() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        t.apply(Intent::Press(Control::SoftDrop));
        for _ in 0..200 {
            t.tick();
            if t.score() > 0 {
                break;
            }
        }
        // O anchored at row 19 settles with its anchor on row 1.
        assert_eq!(t.score(), 18);
        assert_eq!(t.falling_position(), Some((4, 1)));
    }

    #[test]
    fn test_soft_drop_streak_does_not_follow_hold() {
        let mut t = scripted(&[Shape::T, Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        t.apply(Intent::Press(Control::SoftDrop));
        for _ in 0..30 {
            t.tick();
        }
        let (_, y) = t.falling_position().expect("piece");
        assert!(y < SPAWN_Y);
        assert_eq!(t.score(), 0);

        assert!(t.apply(Intent::Hold));
        assert_eq!(t.falling_shape(), Some(Shape::O));
        for _ in 0..200 {
            t.tick();
            if t.score() > 0 {
                break;
            }
        }
        // Only the O's own 18 rows count.
        assert_eq!(t.score(), 18);
        assert_eq!(t.falling_position(), Some((4, 1)));
    }

    #[test]
    fn test_soft_drop_released_early_earns_nothing() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        t.apply(Intent::Press(Control::SoftDrop));
        for _ in 0..12 {
            t.tick();
        }
        t.apply(Intent::Release(Control::SoftDrop));
        for _ in 0..2000 {
            if t.tick() {
                break;
            }
        }
        assert_eq!(t.score(), 0);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut t = scripted(&[Shape::T, Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        assert!(t.apply(Intent::Hold));
        // Leave column 0 open so nothing clears.
        for y in 0..18 {
            t.playfield_mut().fill_row_except(y, Shape::Z, &[0]);
        }
        tap(&mut t, Control::HardDrop);
        assert_eq!(t.playfield().cell(4, 19), Some(Shape::O));
        t.tick();

        assert!(t.game_over());
        assert!(!t.started());
        assert!(t.falling_piece().is_none());
        assert!(t.hold_piece().is_none());
        assert!(!t.tick());
    }

    #[test]
    fn test_danger_zone_flag() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.playfield_mut().set(0, 16, Some(Shape::J));
        t.tick();
        assert!(!t.danger_zone());
        tap(&mut t, Control::HardDrop);
        assert!(t.danger_zone());
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        let position = t.falling_position();

        t.apply(Intent::PauseToggle);
        assert!(t.paused());
        for _ in 0..500 {
            assert!(!t.tick());
        }
        assert_eq!(t.falling_position(), position);

        t.apply(Intent::PauseToggle);
        assert_eq!(t.status(), GameStatus::Running);
    }

    #[test]
    fn test_pause_toggle_starts_idle_game() {
        let mut t = Tetrion::with_seed(5);
        t.set_start_level(3);
        t.apply(Intent::PauseToggle);
        assert_eq!(t.status(), GameStatus::Running);
        assert_eq!(t.level(), 3);
    }

    #[test]
    fn test_start_ignored_while_paused() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        tap(&mut t, Control::HardDrop);
        t.apply(Intent::PauseToggle);
        assert!(!t.apply(Intent::Start(4)));
        assert_eq!(t.level(), 0);
        assert_eq!(t.playfield().filled_count(), 4);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut t = scripted(&[Shape::O], Mode::Mix);
        t.start(0);
        t.tick();
        tap(&mut t, Control::HardDrop);
        assert!(t.score() > 0);

        assert!(t.apply(Intent::Start(2)));
        assert_eq!(t.score(), 0);
        assert_eq!(t.lines(), 0);
        assert_eq!(t.level(), 2);
        assert_eq!(t.playfield().filled_count(), 0);
        assert!(t.hold_available());
    }

    #[test]
    fn test_ghost_y() {
        let mut t = scripted(&[Shape::I], Mode::Mix);
        t.start(0);
        assert_eq!(t.ghost_y(), None);
        t.tick();
        assert_eq!(t.ghost_y(), Some(0));
        t.playfield_mut().set(4, 5, Some(Shape::O));
        assert_eq!(t.ghost_y(), Some(6));
        // Projection never moves the piece.
        assert_eq!(t.falling_position(), Some((4, 19)));
    }

    #[test]
    fn test_snapshot() {
        let mut t = scripted(&[Shape::L], Mode::Modern);
        t.start(0);
        t.tick();
        t.playfield_mut().set(9, 0, Some(Shape::Z));

        let snap = t.snapshot();
        assert_eq!(snap.status, GameStatus::Running);
        assert_eq!(snap.mode, Mode::Modern);
        assert_eq!(snap.board[0][9], Some(Shape::Z));
        assert_eq!(snap.cell(9, 0), Some(Some(Shape::Z)));
        assert_eq!(snap.next.len(), 3);
        let active = snap.active.expect("active piece");
        assert_eq!(active.shape, Shape::L);
        assert_eq!(Some(active.cells), t.falling_cells());
        assert!(snap.ghost_y.is_some());

        let json = serde_json::to_string(&snap).expect("serialize");
        assert!(json.contains("\"status\":\"Running\""));
    }
}
