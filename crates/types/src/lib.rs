//! Shared types and tuning constants for the Tetrion engine.
//!
//! Everything in this crate is plain data: the seven shapes and their
//! colors, the rule sets selected by [`Mode`], the input vocabulary
//! ([`Control`] / [`Intent`]) and the constants that pin down the playfield
//! geometry and frame timing.
//!
//! # Playfield geometry
//!
//! Coordinates are `(x, y)` with `x` growing to the right and `y` growing
//! upward; row 0 is the floor.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BOARD_WIDTH` | 10 | Columns |
//! | `BOARD_HEIGHT` | 22 | Rows, including the two overflow rows above the ceiling |
//! | `BOARD_CEILING` | 20 | First row above the visible field |
//! | `DANGER_ZONE_ROW` | 16 | Lowest row of the danger zone |
//!
//! # Frame timing
//!
//! The engine advances in fixed ticks of 1/60 s. All delays are counted in
//! ticks, never in wall-clock time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICKS_PER_SECOND` | 60 | Tick rate |
//! | `AUTO_SHIFT_DELAY` | 11 | Ticks before a held shift starts repeating |
//! | `AUTO_SHIFT_PERIOD` | 6 | Ticks between repeated shifts |
//! | `SOFT_DROP_FACTOR` | 20 | Gravity multiplier while soft drop is held |
//!
//! # Examples
//!
//! ```
//! use tetrion_types::{Control, Intent, Mode, Shape, BOARD_WIDTH};
//!
//! assert_eq!(Shape::from_str("t"), Some(Shape::T));
//! assert_eq!(Mode::from_str("modern"), Some(Mode::Modern));
//! assert!(Mode::Modern.rules().infinite_lock_delay);
//!
//! let intent = Intent::Press(Control::HardDrop);
//! assert_eq!(intent.control(), Some(Control::HardDrop));
//! assert_eq!(BOARD_WIDTH, 10);
//! ```

use serde::Serialize;

/// Playfield width in cells.
pub const BOARD_WIDTH: i8 = 10;

/// Playfield height in cells, ceiling overflow included.
pub const BOARD_HEIGHT: i8 = 22;

/// Rows at or above the ceiling are normally not drawn.
pub const BOARD_CEILING: i8 = 20;

/// Any locked cell at or above this row puts the stack in the danger zone.
pub const DANGER_ZONE_ROW: i8 = BOARD_CEILING - 4;

/// Spawn anchor column.
pub const SPAWN_X: i8 = BOARD_WIDTH / 2 - 1;

/// Spawn anchor row before the piece's `min_y` is added.
pub const SPAWN_Y: i8 = BOARD_CEILING - 1;

/// Engine tick rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Lines needed per level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity multiplier applied while soft drop is held.
pub const SOFT_DROP_FACTOR: f64 = 20.0;

/// Upper bound on gravity in cells per tick.
pub const MAX_GRAVITY: f64 = BOARD_CEILING as f64;

/// Ticks a shift key must be held before auto-shift starts.
pub const AUTO_SHIFT_DELAY: u32 = 11;

/// Ticks between auto-shift repeats.
pub const AUTO_SHIFT_PERIOD: u32 = 6;

/// Points for clearing 0..=4 lines at level 0.
pub const LINE_SCORES: [u64; 5] = [0, 40, 100, 300, 1200];

/// Points per cell for a hard drop.
pub const HARD_DROP_POINTS_PER_CELL: u64 = 2;

/// Default number of preview slots.
pub const DEFAULT_PREVIEW_LEN: usize = 5;

/// Upper bound on preview slots.
pub const MAX_PREVIEW_LEN: usize = 6;

/// Number of shapes in one bag.
pub const BAG_SIZE: usize = 7;

/// Capacity of the background shape channel for a given preview size.
pub const fn shape_channel_capacity(preview_len: usize) -> usize {
    BAG_SIZE + preview_len
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel divided by 0.7, saturating at 255.
    pub const fn brighter(self) -> Self {
        const fn up(c: u8) -> u8 {
            let v = (c as u16) * 10 / 7;
            if v > 255 {
                255
            } else {
                v as u8
            }
        }
        Self::new(up(self.r), up(self.g), up(self.b))
    }

    /// Each channel scaled by 0.7.
    pub const fn darker(self) -> Self {
        const fn down(c: u8) -> u8 {
            ((c as u16) * 7 / 10) as u8
        }
        Self::new(down(self.r), down(self.g), down(self.b))
    }
}

/// Display colors of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeColors {
    /// Locked cells.
    pub normal: Rgb,
    /// The falling piece.
    pub active: Rgb,
    /// The ghost projection.
    pub ghost: Rgb,
}

impl ShapeColors {
    const fn from_base(base: Rgb) -> Self {
        Self {
            normal: base,
            active: base.brighter(),
            ghost: base.darker().darker().darker(),
        }
    }
}

/// The seven tetromino shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Shape {
    /// Every shape, in catalog order. A fresh bag starts from this list.
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    /// Parse a shape from its letter (case-insensitive)
    ///
    /// ```
    /// use tetrion_types::Shape;
    ///
    /// assert_eq!(Shape::from_str("i"), Some(Shape::I));
    /// assert_eq!(Shape::from_str("Z"), Some(Shape::Z));
    /// assert_eq!(Shape::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i" => Some(Shape::I),
            "j" => Some(Shape::J),
            "l" => Some(Shape::L),
            "o" => Some(Shape::O),
            "s" => Some(Shape::S),
            "t" => Some(Shape::T),
            "z" => Some(Shape::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::I => "i",
            Shape::J => "j",
            Shape::L => "l",
            Shape::O => "o",
            Shape::S => "s",
            Shape::T => "t",
            Shape::Z => "z",
        }
    }

    /// Spawn-orientation block offsets relative to the anchor.
    ///
    /// A block at offset `(x, y)` occupies cell `(anchor_x + x, anchor_y - y)`.
    /// Every layout contains `(0, 0)`, so the anchor cell is always occupied.
    pub const fn offsets(&self) -> [(i8, i8); 4] {
        match self {
            Shape::I => [(2, 0), (1, 0), (0, 0), (-1, 0)],
            Shape::J => [(1, -1), (1, 0), (0, 0), (-1, 0)],
            Shape::L => [(1, 0), (0, 0), (-1, 0), (-1, -1)],
            Shape::O => [(0, 0), (1, 0), (1, 1), (0, 1)],
            Shape::S => [(1, -1), (0, -1), (0, 0), (-1, 0)],
            Shape::T => [(1, 0), (0, 0), (-1, 0), (0, -1)],
            Shape::Z => [(1, 0), (0, 0), (0, -1), (-1, -1)],
        }
    }

    pub const fn colors(&self) -> ShapeColors {
        ShapeColors::from_base(match self {
            Shape::I => Rgb::new(102, 204, 204),
            Shape::J => Rgb::new(218, 170, 0),
            Shape::L => Rgb::new(102, 102, 204),
            Shape::O => Rgb::new(204, 204, 102),
            Shape::S => Rgb::new(102, 204, 102),
            Shape::T => Rgb::new(204, 102, 204),
            Shape::Z => Rgb::new(204, 102, 102),
        })
    }

    /// Whether rotation leaves this shape unchanged.
    pub const fn is_rotation_invariant(&self) -> bool {
        matches!(self, Shape::O)
    }
}

/// A playfield cell: `None` when empty, otherwise the shape that locked there.
pub type Cell = Option<Shape>;

/// Rule parameters selected by a [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    /// Base of the exponential gravity curve.
    pub speed_up_ratio: f64,
    /// Scan sideways for a fit when a rotation is blocked.
    pub wall_kick: bool,
    /// Scan upward for a fit when a rotation is blocked.
    pub floor_kick: bool,
    /// Ticks a grounded piece waits before locking.
    pub lock_delay: u32,
    /// Successful moves reset the lock delay counter.
    pub infinite_lock_delay: bool,
}

/// Rule set presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Mode {
    Classic,
    Modern,
    #[default]
    Mix,
}

impl Mode {
    pub const CLASSIC_SPEED_UP_RATIO: f64 = 1.1625;
    pub const MODERN_SPEED_UP_RATIO: f64 = 1.45;
    pub const MODERN_LOCK_DELAY: u32 = 30;

    pub fn rules(&self) -> Rules {
        match self {
            Mode::Classic => Rules {
                speed_up_ratio: Self::CLASSIC_SPEED_UP_RATIO,
                wall_kick: false,
                floor_kick: true,
                lock_delay: 0,
                infinite_lock_delay: false,
            },
            Mode::Modern => Rules {
                speed_up_ratio: Self::MODERN_SPEED_UP_RATIO,
                wall_kick: true,
                floor_kick: true,
                lock_delay: Self::MODERN_LOCK_DELAY,
                infinite_lock_delay: true,
            },
            Mode::Mix => Rules {
                speed_up_ratio: Self::CLASSIC_SPEED_UP_RATIO,
                wall_kick: true,
                floor_kick: false,
                lock_delay: Self::MODERN_LOCK_DELAY,
                infinite_lock_delay: false,
            },
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Some(Mode::Classic),
            "modern" => Some(Mode::Modern),
            "mix" => Some(Mode::Mix),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Modern => "modern",
            Mode::Mix => "mix",
        }
    }
}

/// Keys the engine tracks as held or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
    SoftDrop,
    HardDrop,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::ShiftLeft,
        Control::ShiftRight,
        Control::RotateLeft,
        Control::RotateRight,
        Control::SoftDrop,
        Control::HardDrop,
    ];

    /// Parse a control from its snake_case name
    ///
    /// ```
    /// use tetrion_types::Control;
    ///
    /// assert_eq!(Control::from_str("shift_left"), Some(Control::ShiftLeft));
    /// assert_eq!(Control::from_str("hardDrop"), Some(Control::HardDrop));
    /// assert_eq!(Control::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().replace('_', "").as_str() {
            "shiftleft" => Some(Control::ShiftLeft),
            "shiftright" => Some(Control::ShiftRight),
            "rotateleft" => Some(Control::RotateLeft),
            "rotateright" => Some(Control::RotateRight),
            "softdrop" => Some(Control::SoftDrop),
            "harddrop" => Some(Control::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::ShiftLeft => "shift_left",
            Control::ShiftRight => "shift_right",
            Control::RotateLeft => "rotate_left",
            Control::RotateRight => "rotate_right",
            Control::SoftDrop => "soft_drop",
            Control::HardDrop => "hard_drop",
        }
    }
}

/// Discrete input delivered to the engine between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Key-down edge of a held control.
    Press(Control),
    /// Key-up edge of a held control.
    Release(Control),
    /// Swap the falling piece with the hold slot.
    Hold,
    /// Pause or resume; starts a new game when none is running.
    PauseToggle,
    /// Start a new game at the given level.
    Start(u32),
}

impl Intent {
    /// The held control this intent refers to, if any.
    pub fn control(&self) -> Option<Control> {
        match self {
            Intent::Press(c) | Intent::Release(c) => Some(*c),
            _ => None,
        }
    }
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GameStatus {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

impl GameStatus {
    /// A game is in progress, paused or not.
    pub fn is_started(&self) -> bool {
        matches!(self, GameStatus::Running | GameStatus::Paused)
    }
}
