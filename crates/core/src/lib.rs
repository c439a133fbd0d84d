//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the puzzle rules, state management, and persistence
//! formats. It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for replays and bots)
//! - **Testable**: Unit tests for every rule next to the code
//! - **Portable**: Runs anywhere (terminal, GUI, headless simulator)
//! - **Fast**: Bit-mask collision and line checks, no allocation on the hot path
//!
//! # Module Structure
//!
//! - [`bitgrid`]: 128-bit cell masks used by every board query
//! - [`board`]: N x N board with special cells, line clears and deadlock detection
//! - [`config`]: Mode presets and level layouts
//! - [`game_state`]: The `Idle -> InProgress -> GameOver` state machine
//! - [`hand`]: Pieces offered to the player, with ids
//! - [`pieces`]: Polyomino shapes and the weighted catalog
//! - [`portable`]: Serde formats for saving and resuming
//! - [`rng`]: Seeded generator and the weighted draw
//! - [`scoring`]: Block points, clear bonus and combo
//! - [`snapshot`]: Fixed-size read-only view for presentation
//!
//! # Game Rules
//!
//! - **Placement**: Drop any hand piece where it fits; an origin one cell off the
//!   board is nudged back on
//! - **Lines**: Full rows and columns clear together; obstacles never clear and
//!   do not need filling
//! - **Ice**: Two-layer ice survives one clear as single-layer ice
//! - **Hand**: Redealt only once every piece has been placed
//! - **Game over**: No piece in the hand fits anywhere
//!
//! # Example
//!
//! ```
//! use gridblocks_core::{GameState, ModeConfig};
//!
//! let mut game = GameState::new(12345);
//! game.start_game(ModeConfig::classic()).unwrap();
//!
//! // Drop the first hand piece at its first legal spot.
//! let held = *game.hand().iter().next().unwrap();
//! let (row, col) = game.board().valid_positions(&held.piece).next().unwrap();
//! let outcome = game.place_piece(held.id, col as i32, row as i32).unwrap();
//!
//! assert_eq!(game.score(), outcome.score.total);
//! assert!(game.score() > 0); // every placed cell scores a point
//! ```

pub mod bitgrid;
pub mod board;
pub mod config;
pub mod game_state;
pub mod hand;
pub mod pieces;
pub mod portable;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use gridblocks_types as types;

// Re-export commonly used types for convenience
pub use bitgrid::BitGrid;
pub use board::{Board, ClearResult, ClearedCell, PlacedCells};
pub use config::{ConfigError, LayoutBlock, LevelLayout, ModeConfig};
pub use game_state::{GameState, PlaceOutcome, PlacementError};
pub use hand::{Hand, HeldPiece, PieceId};
pub use pieces::{CatalogEntry, CatalogError, Piece, PieceCatalog, Shape, ShapeError};
pub use portable::{PortableBoard, PortableCell, PortableError, PortableGame, PortablePiece};
pub use rng::{seeded_rng, GameRng};
pub use scoring::{calculate_score, ComboTracker, ScoreResult};
pub use snapshot::{GameSnapshot, HandPieceSnapshot};
