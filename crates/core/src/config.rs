//! Mode configuration - board size, hand size, palette and level layouts
//!
//! A [`ModeConfig`] is everything `start_game` needs. Presets cover the three
//! modes; custom configs can be deserialized (the simulator reads them as JSON).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Cell, Color, Coord, GameMode, MAX_BOARD_SIZE, MAX_HAND_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size {0} is outside 1..={max}", max = MAX_BOARD_SIZE)]
    BoardSize(usize),
    #[error("hand size {0} is outside 1..={max}", max = MAX_HAND_SIZE)]
    HandSize(usize),
    #[error("palette is empty")]
    EmptyPalette,
    #[error("layout cell ({row}, {col}) is outside a {size}x{size} board")]
    LayoutOutOfBounds { row: u8, col: u8, size: usize },
}

/// One pre-placed cell of a level layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub row: u8,
    pub col: u8,
    pub cell: Cell,
}

/// Initial board contents for a level
///
/// Blocks are written in order (a later block on the same cell wins); markers are
/// added after the blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelLayout {
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,
    #[serde(default)]
    pub markers: Vec<Coord>,
}

impl LevelLayout {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.markers.is_empty()
    }

    pub fn with_block(mut self, row: u8, col: u8, cell: Cell) -> Self {
        self.blocks.push(LayoutBlock { row, col, cell });
        self
    }

    pub fn with_marker(mut self, row: u8, col: u8) -> Self {
        self.markers.push(Coord::new(row, col));
        self
    }

    /// Small 8x8 story level: a ring of obstacles, ice on the diagonals, stars
    /// on the middle rows.
    pub fn demo() -> Self {
        let mut layout = LevelLayout::default()
            .with_block(0, 0, Cell::Obstacle)
            .with_block(0, 7, Cell::Obstacle)
            .with_block(7, 0, Cell::Obstacle)
            .with_block(7, 7, Cell::Obstacle);
        for i in [2u8, 5] {
            layout = layout
                .with_block(i, i, Cell::Ice2(Color::Cyan))
                .with_block(i, 7 - i, Cell::Ice1(Color::Blue));
        }
        layout
            .with_block(3, 1, Cell::Filled(Color::Yellow))
            .with_marker(3, 1)
            .with_marker(4, 6)
    }

    fn validate(&self, size: usize) -> Result<(), ConfigError> {
        let cells = self
            .blocks
            .iter()
            .map(|b| (b.row, b.col))
            .chain(self.markers.iter().map(|m| (m.row, m.col)));
        for (row, col) in cells {
            if row as usize >= size || col as usize >= size {
                return Err(ConfigError::LayoutOutOfBounds { row, col, size });
            }
        }
        Ok(())
    }
}

fn default_palette() -> Vec<Color> {
    Color::ALL.to_vec()
}

/// Everything needed to start a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub mode: GameMode,
    pub board_size: usize,
    pub hand_size: usize,
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
    #[serde(default)]
    pub layout: LevelLayout,
}

impl ModeConfig {
    /// Defaults for a mode with an empty layout
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            board_size: mode.board_size(),
            hand_size: mode.hand_size(),
            palette: default_palette(),
            layout: LevelLayout::default(),
        }
    }

    pub fn classic() -> Self {
        Self::for_mode(GameMode::Classic)
    }

    pub fn chaos() -> Self {
        Self::for_mode(GameMode::Chaos)
    }

    pub fn story(layout: LevelLayout) -> Self {
        Self {
            layout,
            ..Self::for_mode(GameMode::Story)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        if self.hand_size == 0 || self.hand_size > MAX_HAND_SIZE {
            return Err(ConfigError::HandSize(self.hand_size));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        self.layout.validate(self.board_size)
    }
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self::classic()
    }
}
