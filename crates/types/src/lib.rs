//! Shared vocabulary for the tetrion workspace.
//!
//! This crate defines the data types and constants every other crate speaks
//! in. Everything here is plain data with no external dependencies, so it is
//! usable from the core engine, the input mapper, and the terminal renderer
//! alike.
//!
//! # Board Dimensions
//!
//! The standard play field:
//!
//! - **Columns**: 10 (indexed 0-9)
//! - **Rows**: 20 (indexed 0-19, row 0 at the top)
//!
//! Pieces address the board in (row, column) order; see [`Pos`].
//!
//! # Timing Constants
//!
//! All values in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LOCK_DELAY_MS` | 500 | Short-term grace window once a piece lands |
//! | `LOCK_RESET_LIMIT` | 10 | Accepted moves while pre-locked before moves are refused |
//! | `LINE_CLEAR_PAUSE_MS` | 500 | Visual pause between marking and removing cleared rows |
//! | `INPUT_POLL_MS` | 7 | Keyboard poll cadence |
//! | `WAIT_SLICE_MS` | 1 | Re-check granularity of the cancellable gravity sleep |
//!
//! # Fall Intervals by Level
//!
//! Gravity speeds up with the level (milliseconds per row). Levels above 15
//! clamp to the last entry. None of the entries equals `LOCK_DELAY_MS`; the
//! two budgets are distinct frame kinds, never told apart by value.
//!
//! | Level | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10 | 11 | 12 | 13 | 14 | 15 |
//! |-------|---|---|---|---|---|---|---|---|---|----|----|----|----|----|----|
//! | ms | 1000 | 793 | 618 | 473 | 355 | 262 | 190 | 135 | 94 | 64 | 43 | 28 | 18 | 11 | 7 |
//!
//! # Examples
//!
//! ```
//! use tetrion_types::{Shape, Orientation, Cell, Pos};
//!
//! let o = Orientation::North.rotate_cw();
//! assert_eq!(o, Orientation::East);
//!
//! let cell = Cell::live(Shape::T, o, 3, 17);
//! assert!(cell.blocks());
//! assert_eq!(cell.shape(), Some(Shape::T));
//!
//! let p = Pos::new(4, 7);
//! assert_eq!(p.shifted(1, 0), Pos::new(5, 7));
//! ```

/// Play-field height in rows.
pub const BOARD_ROWS: usize = 20;

/// Play-field width in columns.
pub const BOARD_COLS: usize = 10;

/// Number of shapes in one randomizer bag.
pub const BAG_SIZE: usize = 7;

/// Smallest allowed preview window.
pub const PREVIEW_MIN: usize = 1;

/// Largest allowed preview window.
pub const PREVIEW_MAX: usize = 6;

/// Preview window used by the game binary.
pub const DEFAULT_PREVIEW: usize = 3;

/// Short-term lock delay: grace period once a piece lands (500ms).
pub const LOCK_DELAY_MS: u32 = 500;

/// Long-term lock delay: accepted moves while pre-locked before further
/// translates/rotates are refused (10).
pub const LOCK_RESET_LIMIT: u8 = 10;

/// Pause between marking rows as clearing and physically removing them.
pub const LINE_CLEAR_PAUSE_MS: u32 = 500;

/// Keyboard poll cadence for the input thread.
pub const INPUT_POLL_MS: u64 = 7;

/// Re-check granularity of the cancellable gravity wait.
pub const WAIT_SLICE_MS: u64 = 1;

/// Lowest selectable starting level.
pub const MIN_LEVEL: u32 = 1;

/// Highest selectable starting level; also the last fall-interval entry.
pub const MAX_LEVEL: u32 = 15;

/// Fall interval per level in milliseconds, index 0 = level 1.
pub const FALL_INTERVALS: [u32; 15] = [
    1000, 793, 618, 473, 355, 262, 190, 135, 94, 64, 43, 28, 18, 11, 7,
];

/// The seven tetromino shapes.
///
/// Spawn layouts, rotation deltas and wall-kick tables are constant data
/// keyed by this enum (see `tetrion-core`); there is one type for all seven
/// shapes, not a type per shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
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
    /// All shapes in bag-index order.
    pub const ALL: [Shape; BAG_SIZE] = [
        Shape::I,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    /// Bag index of this shape (0-6).
    pub fn index(self) -> usize {
        match self {
            Shape::I => 0,
            Shape::J => 1,
            Shape::L => 2,
            Shape::O => 3,
            Shape::S => 4,
            Shape::T => 5,
            Shape::Z => 6,
        }
    }

    /// Shape for a bag index (0-6).
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range index; indices only ever come from the
    /// randomizer's own sampling.
    pub fn from_index(index: usize) -> Self {
        Shape::ALL[index]
    }
}

/// Piece orientation, cyclic under rotation.
///
/// - **North**: spawn orientation
/// - **East**: 90° clockwise
/// - **South**: 180°
/// - **West**: 270° clockwise
///
/// The clockwise cycle is North → East → South → West → North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// All orientations in clockwise order.
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    /// Rotate 90° clockwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrion_types::Orientation;
    ///
    /// assert_eq!(Orientation::North.rotate_cw(), Orientation::East);
    /// assert_eq!(Orientation::West.rotate_cw(), Orientation::North);
    /// ```
    pub fn rotate_cw(self) -> Self {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
        }
    }

    /// Rotate 90° counter-clockwise.
    pub fn rotate_ccw(self) -> Self {
        match self {
            Orientation::North => Orientation::West,
            Orientation::West => Orientation::South,
            Orientation::South => Orientation::East,
            Orientation::East => Orientation::North,
        }
    }

    /// Apply a [`Spin`] to this orientation.
    pub fn rotated(self, spin: Spin) -> Self {
        match spin {
            Spin::Cw => self.rotate_cw(),
            Spin::Ccw => self.rotate_ccw(),
        }
    }

    /// Table index of this orientation (North = 0, clockwise order).
    pub fn index(self) -> usize {
        match self {
            Orientation::North => 0,
            Orientation::East => 1,
            Orientation::South => 2,
            Orientation::West => 3,
        }
    }
}

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    /// Clockwise.
    Cw,
    /// Counter-clockwise.
    Ccw,
}

impl Spin {
    /// Table index of this direction (Cw = 0).
    pub fn index(self) -> usize {
        match self {
            Spin::Cw => 0,
            Spin::Ccw => 1,
        }
    }
}

/// Sideways/downward piece movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
    Down,
}

impl Shift {
    /// Per-cell (row, col) offset of this shift.
    pub fn offset(self) -> (i16, i16) {
        match self {
            Shift::Left => (0, -1),
            Shift::Right => (0, 1),
            Shift::Down => (1, 0),
        }
    }
}

/// Row count cleared by one contiguous group of full rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearType {
    Single,
    Double,
    Triple,
    Tetris,
}

impl ClearType {
    /// Number of rows this clear removes.
    pub fn rows(self) -> u32 {
        match self {
            ClearType::Single => 1,
            ClearType::Double => 2,
            ClearType::Triple => 3,
            ClearType::Tetris => 4,
        }
    }

    /// Clear type for a contiguous run of full rows (1-4).
    pub fn from_rows(rows: usize) -> Option<Self> {
        match rows {
            1 => Some(ClearType::Single),
            2 => Some(ClearType::Double),
            3 => Some(ClearType::Triple),
            4 => Some(ClearType::Tetris),
            _ => None,
        }
    }

    /// Base score awarded for this clear, before the level multiplier.
    pub fn base_score(self) -> u32 {
        match self {
            ClearType::Single => 100,
            ClearType::Double => 300,
            ClearType::Triple => 500,
            ClearType::Tetris => 800,
        }
    }
}

/// A (row, column) board coordinate.
///
/// Row 0 is the top row. Coordinates are signed so that candidate positions
/// may leave the board during move legality checks; whether a `Pos` is valid
/// is judged against a concrete board's bounds. Equality is by (row, column)
/// only, which is what the self-overlap checks inside a piece's own four
/// cells rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub row: i16,
    pub col: i16,
}

impl Pos {
    pub fn new(row: i16, col: i16) -> Self {
        Pos { row, col }
    }

    /// This position displaced by (row, col) deltas.
    pub fn shifted(self, dr: i16, dc: i16) -> Self {
        Pos {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// The cell directly below.
    pub fn below(self) -> Self {
        self.shifted(1, 0)
    }
}

/// Occupancy of one board cell.
///
/// Only `Live` cells block movement; ghost silhouettes and rows marked for
/// clearing are passable. The `sub` index (1-4) records which of the piece's
/// four cells wrote this entry, and `id` groups the four cells of one spawn
/// so the renderer can tell a live piece apart from an older locked piece of
/// the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Part of a full row awaiting removal; the tag selects the clear glyph.
    Clearing(ClearType),
    Live {
        shape: Shape,
        orientation: Orientation,
        sub: u8,
        id: u32,
    },
    Ghost {
        shape: Shape,
        orientation: Orientation,
        sub: u8,
    },
}

impl Cell {
    /// A live cell; `sub` must be 1-4.
    pub fn live(shape: Shape, orientation: Orientation, sub: u8, id: u32) -> Self {
        assert!((1..=4).contains(&sub), "sub-block index out of range: {sub}");
        Cell::Live {
            shape,
            orientation,
            sub,
            id,
        }
    }

    /// A ghost cell; `sub` must be 1-4.
    pub fn ghost(shape: Shape, orientation: Orientation, sub: u8) -> Self {
        assert!((1..=4).contains(&sub), "sub-block index out of range: {sub}");
        Cell::Ghost {
            shape,
            orientation,
            sub,
        }
    }

    /// True for cells that reject movement into them.
    pub fn blocks(self) -> bool {
        matches!(self, Cell::Live { .. })
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_ghost(self) -> bool {
        matches!(self, Cell::Ghost { .. })
    }

    pub fn is_clearing(self) -> bool {
        matches!(self, Cell::Clearing(_))
    }

    /// Shape of a live or ghost cell.
    pub fn shape(self) -> Option<Shape> {
        match self {
            Cell::Live { shape, .. } | Cell::Ghost { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Owning piece id of a live cell.
    pub fn id(self) -> Option<u32> {
        match self {
            Cell::Live { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Input events the engine accepts, mapped 1:1 from key bindings.
///
/// `Confirm` and `LevelUp` only matter outside a running round (menu and
/// pause handling); the rest drive the live piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one column left.
    MoveLeft,
    /// Move piece one column right.
    MoveRight,
    /// Drop piece one row (scores 1 point when accepted).
    SoftDrop,
    /// Drop piece to its resting row (scores 2 points).
    HardDrop,
    /// Rotate piece 90° clockwise.
    RotateCw,
    /// Rotate piece 90° counter-clockwise.
    RotateCcw,
    /// Swap the live piece with the hold slot (once per spawn).
    Hold,
    /// Pause a running round; abort when already paused; quit from the menu.
    Pause,
    /// Start a round from the menu; resume from pause.
    Confirm,
    /// Cycle the starting level (menu only).
    LevelUp,
}

/// What the gravity loop should do after a tick.
///
/// Budgets are distinct kinds rather than bare millisecond values, so a
/// fall interval that happens to equal the lock delay can never be
/// mistaken for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBudget {
    /// Tick again immediately.
    Now,
    /// Wait the level's fall interval (milliseconds), or until input
    /// changes what the next tick would do.
    Fall(u32),
    /// Wait out the lock-delay grace window.
    Grace,
    /// Rows are marked for removal: render, hold the lock for the clear
    /// pause, sweep, then tick again.
    Clearing,
    /// The round just ended; park until a new start.
    Over,
}

/// Mode flags of the outer game loop.
///
/// These are independent booleans, not a single-state enum: `started` and
/// `paused` are both true while a round sits in the pause menu.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeFlags {
    pub started: bool,
    pub paused: bool,
    pub exit: bool,
}

impl ModeFlags {
    /// True while gravity should advance the game.
    pub fn running(self) -> bool {
        self.started && !self.paused && !self.exit
    }
}
