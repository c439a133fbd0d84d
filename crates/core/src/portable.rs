//! Portable snapshots for persistence
//!
//! Plain serde structs that carry exactly enough to rebuild a board (or a whole
//! game) later. The persistence layer picks the encoding; the engine only converts
//! to and from these values and validates them on the way in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::config::ConfigError;
use crate::hand::Hand;
use crate::pieces::{Piece, Shape, ShapeError};
use crate::types::{Cell, CellKind, Color, Coord, MAX_BOARD_SIZE, MAX_HAND_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortableError {
    #[error("board size {0} is outside 1..={max}", max = MAX_BOARD_SIZE)]
    BoardSize(u8),
    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },
    #[error("cell {index} of kind {kind:?} needs a color")]
    MissingColor { index: usize, kind: CellKind },
    #[error("marker ({row}, {col}) is outside the board")]
    MarkerOutOfBounds { row: u8, col: u8 },
    #[error("hand holds {found} pieces, capacity is {capacity}")]
    HandSize { capacity: usize, found: usize },
    #[error("board is {found}x{found}, config expects {expected}x{expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("hand piece {index} has an invalid shape: {source}")]
    Shape {
        index: usize,
        #[source]
        source: ShapeError,
    },
}

/// One cell: its kind and, for blocks, its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableCell {
    #[serde(rename = "type")]
    pub kind: CellKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl From<Cell> for PortableCell {
    fn from(cell: Cell) -> Self {
        Self {
            kind: cell.kind(),
            color: cell.color(),
        }
    }
}

/// Board snapshot: size, row-major cells, uncollected markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableBoard {
    pub size: u8,
    pub cells: Vec<PortableCell>,
    #[serde(default)]
    pub markers: Vec<Coord>,
}

impl Board {
    pub fn to_portable(&self) -> PortableBoard {
        PortableBoard {
            size: self.size() as u8,
            cells: self.cells().iter().copied().map(PortableCell::from).collect(),
            markers: self.markers().collect(),
        }
    }

    pub fn from_portable(portable: &PortableBoard) -> Result<Board, PortableError> {
        let size = portable.size as usize;
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(PortableError::BoardSize(portable.size));
        }
        if portable.cells.len() != size * size {
            return Err(PortableError::CellCount {
                expected: size * size,
                found: portable.cells.len(),
            });
        }

        let mut board = Board::new(size);
        for (index, cell) in portable.cells.iter().enumerate() {
            let value = Cell::from_kind(cell.kind, cell.color).ok_or(PortableError::MissingColor {
                index,
                kind: cell.kind,
            })?;
            board.set(index / size, index % size, value);
        }
        for marker in &portable.markers {
            if !board.add_marker(marker.row as usize, marker.col as usize) {
                return Err(PortableError::MarkerOutOfBounds {
                    row: marker.row,
                    col: marker.col,
                });
            }
        }
        board.sync_masks();
        Ok(board)
    }
}

/// Hand piece snapshot; the shape is a `'#'`/`'.'` pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortablePiece {
    pub shape: Vec<String>,
    pub color: Color,
    #[serde(default = "default_weight")]
    pub spawn_weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl From<&Piece> for PortablePiece {
    fn from(piece: &Piece) -> Self {
        Self {
            shape: piece.shape.to_pattern(),
            color: piece.color,
            spawn_weight: piece.spawn_weight,
        }
    }
}

impl PortablePiece {
    pub fn to_piece(&self) -> Result<Piece, ShapeError> {
        Ok(Piece::new(
            Shape::parse(&self.shape)?,
            self.color,
            self.spawn_weight,
        ))
    }
}

/// Rebuild a hand; pieces get fresh ids in order
pub fn hand_from_portable(capacity: usize, pieces: &[PortablePiece]) -> Result<Hand, PortableError> {
    if pieces.len() > capacity || capacity > MAX_HAND_SIZE {
        return Err(PortableError::HandSize {
            capacity,
            found: pieces.len(),
        });
    }
    let mut hand = Hand::new(capacity.max(1));
    for (index, portable) in pieces.iter().enumerate() {
        let piece = portable
            .to_piece()
            .map_err(|source| PortableError::Shape { index, source })?;
        hand.push(piece);
    }
    Ok(hand)
}

/// Everything needed to resume an in-progress (or finished) game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableGame {
    pub board: PortableBoard,
    pub hand: Vec<PortablePiece>,
    pub score: u64,
    pub combo: u32,
    pub moves_since_last_clear: u32,
    #[serde(default)]
    pub lines_cleared: u32,
    #[serde(default)]
    pub pieces_placed: u32,
    #[serde(default)]
    pub stars_collected: u32,
    #[serde(default)]
    pub high_score: u64,
    #[serde(default)]
    pub game_over: bool,
}
