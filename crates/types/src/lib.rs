//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, making them usable in any
//! context (rules engine, simulator output, persistence, presentation).
//!
//! # Board Dimensions
//!
//! | Mode | Board | Hand |
//! |------|-------|------|
//! | Classic | 8x8 | 3 pieces |
//! | Story | 8x8 | 3 pieces |
//! | Chaos | 10x10 | 5 pieces |
//!
//! Boards never exceed [`MAX_BOARD_SIZE`] cells per side, so every board fits a
//! 100-bit mask.
//!
//! # Cells
//!
//! | Cell | Blocks placement | Counts toward a line | Clears |
//! |------|------------------|----------------------|--------|
//! | `Empty` | no | no | - |
//! | `Filled` | yes | yes | on first line clear |
//! | `Obstacle` | yes | no (excluded from the line) | never |
//! | `Ice1` | yes | yes | on first line clear |
//! | `Ice2` | yes | yes | degrades to `Ice1` |
//!
//! # Examples
//!
//! ```
//! use gridblocks_types::{Cell, Color, GameMode, CLASSIC_BOARD_SIZE};
//!
//! let cell = Cell::Ice2(Color::Blue);
//! assert!(cell.blocks_placement());
//! assert!(cell.counts_toward_line());
//! assert_eq!(cell.color(), Some(Color::Blue));
//!
//! assert_eq!(GameMode::from_str("classic"), Some(GameMode::Classic));
//! assert_eq!(GameMode::Classic.board_size(), CLASSIC_BOARD_SIZE);
//! ```

use serde::{Deserialize, Serialize};

/// Largest supported board side (10x10 = 100 cells)
pub const MAX_BOARD_SIZE: usize = 10;

/// Largest supported number of cells on a board
pub const MAX_CELLS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

/// Board side for Classic and Story modes
pub const CLASSIC_BOARD_SIZE: usize = 8;

/// Board side for Chaos mode
pub const CHAOS_BOARD_SIZE: usize = 10;

/// Pieces dealt per hand on 8x8 boards
pub const CLASSIC_HAND_SIZE: usize = 3;

/// Pieces dealt per hand on 10x10 boards
pub const CHAOS_HAND_SIZE: usize = 5;

/// Largest supported hand
pub const MAX_HAND_SIZE: usize = 5;

/// Largest supported piece bounding box side
pub const MAX_PIECE_SIDE: usize = 5;

/// Largest supported piece cell count
pub const MAX_PIECE_CELLS: usize = MAX_PIECE_SIDE * MAX_PIECE_SIDE;

/// Cells a placement may be nudged back onto the board (pointer imprecision)
pub const PLACEMENT_TOLERANCE: i32 = 1;

/// Block colors
///
/// Colors are logical; the presentation layer decides the actual tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl Color {
    /// Every color, in palette order
    pub const ALL: [Color; 8] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
        Color::Pink,
    ];

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gridblocks_types::Color;
    ///
    /// assert_eq!(Color::from_str("Red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "orange" => Some(Color::Orange),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "cyan" => Some(Color::Cyan),
            "blue" => Some(Color::Blue),
            "purple" => Some(Color::Purple),
            "pink" => Some(Color::Pink),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }
}

/// Special type of a cell, without its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Empty,
    Filled,
    Obstacle,
    Ice1,
    Ice2,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Empty => "empty",
            CellKind::Filled => "filled",
            CellKind::Obstacle => "obstacle",
            CellKind::Ice1 => "ice1",
            CellKind::Ice2 => "ice2",
        }
    }
}

/// A cell on the game board
///
/// - `Empty`: free cell
/// - `Filled(color)`: normal block, clears with its line
/// - `Obstacle`: permanent, blocks placement, never clears
/// - `Ice1(color)`: one line clear left
/// - `Ice2(color)`: two line clears left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "color", rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
    Obstacle,
    Ice1(Color),
    Ice2(Color),
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Empty => CellKind::Empty,
            Cell::Filled(_) => CellKind::Filled,
            Cell::Obstacle => CellKind::Obstacle,
            Cell::Ice1(_) => CellKind::Ice1,
            Cell::Ice2(_) => CellKind::Ice2,
        }
    }

    /// Rebuild a cell from its kind and optional color
    ///
    /// Returns `None` when a colored kind has no color.
    pub fn from_kind(kind: CellKind, color: Option<Color>) -> Option<Self> {
        match kind {
            CellKind::Empty => Some(Cell::Empty),
            CellKind::Obstacle => Some(Cell::Obstacle),
            CellKind::Filled => color.map(Cell::Filled),
            CellKind::Ice1 => color.map(Cell::Ice1),
            CellKind::Ice2 => color.map(Cell::Ice2),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Whether a piece cell may not be dropped here (collision mask membership)
    pub fn blocks_placement(&self) -> bool {
        !self.is_empty()
    }

    /// Whether this cell satisfies its line's completion requirement (clear mask membership)
    pub fn counts_toward_line(&self) -> bool {
        matches!(self, Cell::Filled(_) | Cell::Ice1(_) | Cell::Ice2(_))
    }

    pub fn is_ice(&self) -> bool {
        matches!(self, Cell::Ice1(_) | Cell::Ice2(_))
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Filled(c) | Cell::Ice1(c) | Cell::Ice2(c) => Some(*c),
            Cell::Empty | Cell::Obstacle => None,
        }
    }
}

/// Board coordinate, row-major (`row` grows downward, `col` grows rightward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Game modes
///
/// - **Classic**: endless play on an empty 8x8 board
/// - **Story**: 8x8 levels seeded with obstacles, ice and markers
/// - **Chaos**: endless play on a 10x10 board with a five-piece hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Story,
    Chaos,
}

impl GameMode {
    /// Parse mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "story" => Some(GameMode::Story),
            "chaos" => Some(GameMode::Chaos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Story => "story",
            GameMode::Chaos => "chaos",
        }
    }

    /// Default board side for this mode
    pub fn board_size(&self) -> usize {
        match self {
            GameMode::Classic | GameMode::Story => CLASSIC_BOARD_SIZE,
            GameMode::Chaos => CHAOS_BOARD_SIZE,
        }
    }

    /// Default hand capacity for this mode
    pub fn hand_size(&self) -> usize {
        match self {
            GameMode::Classic | GameMode::Story => CLASSIC_HAND_SIZE,
            GameMode::Chaos => CHAOS_HAND_SIZE,
        }
    }
}

/// Lifecycle phase of a game
///
/// `Idle -> InProgress -> GameOver`; `GameOver` is sticky until a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    InProgress,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::InProgress => "in_progress",
            Phase::GameOver => "game_over",
        }
    }
}
