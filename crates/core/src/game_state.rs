//! Game state machine - owns the board, hand, score and phase
//!
//! ```text
//! Idle --start_game--> InProgress --(no piece fits)--> GameOver
//!                          ^                              |
//!                          +----start_game / reset_game---+
//! ```
//!
//! Every successful [`GameState::place_piece`] runs the full placement
//! transition: write the piece, score its cells, resolve lines, update the combo,
//! retire the piece from the hand (redealing when it runs dry) and finally check
//! whether anything in the new hand still fits.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{Board, ClearResult, PlacedCells};
use crate::config::{ConfigError, ModeConfig};
use crate::hand::{Hand, PieceId};
use crate::pieces::PieceCatalog;
use crate::portable::{hand_from_portable, PortableError, PortableGame, PortablePiece};
use crate::rng::{seeded_rng, GameRng};
use crate::scoring::{calculate_score, ComboTracker, ScoreResult};
use crate::snapshot::{GameSnapshot, HandPieceSnapshot};
use crate::types::Phase;

/// Why a placement was refused; the game is left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("piece {0} is not in the hand")]
    UnknownPiece(PieceId),
    #[error("piece does not fit at column {col}, row {row}")]
    InvalidPlacement { col: i32, row: i32 },
}

/// Everything one successful placement changed
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOutcome {
    pub piece_id: PieceId,
    /// Cells written by the piece, row-major
    pub placed: PlacedCells,
    pub score: ScoreResult,
    pub clear: ClearResult,
    /// A fresh hand was dealt because the last piece was used
    pub refilled: bool,
    /// The placement left no piece that fits
    pub game_over: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: ModeConfig,
    catalog: PieceCatalog,
    rng: GameRng,
    seed: u64,
    phase: Phase,
    board: Board,
    hand: Hand,
    score: u64,
    combo: ComboTracker,
    lines_cleared: u32,
    pieces_placed: u32,
    stars_collected: u32,
    /// Best final score seen by this state machine (survives restarts)
    high_score: u64,
    /// Monotonic game id (increments on every start)
    game_id: u32,
}

impl GameState {
    /// Create an idle game with the standard catalog
    pub fn new(seed: u64) -> Self {
        Self::with_catalog(seed, PieceCatalog::standard())
    }

    /// Create an idle game dealing from `catalog`
    pub fn with_catalog(seed: u64, catalog: PieceCatalog) -> Self {
        let config = ModeConfig::default();
        Self {
            board: Board::new(config.board_size),
            hand: Hand::new(config.hand_size),
            config,
            catalog,
            rng: seeded_rng(seed),
            seed,
            phase: Phase::Idle,
            score: 0,
            combo: ComboTracker::default(),
            lines_cleared: 0,
            pieces_placed: 0,
            stars_collected: 0,
            high_score: 0,
            game_id: 0,
        }
    }

    /// Rebuild a game from a portable snapshot
    ///
    /// Pieces in the restored hand get fresh ids. A restored game whose hand no
    /// longer fits anywhere comes back as `GameOver`.
    pub fn resume(
        seed: u64,
        config: ModeConfig,
        portable: &PortableGame,
    ) -> Result<Self, PortableError> {
        config.validate()?;
        let board = Board::from_portable(&portable.board)?;
        if board.size() != config.board_size {
            return Err(PortableError::SizeMismatch {
                expected: config.board_size,
                found: board.size(),
            });
        }
        let hand = hand_from_portable(config.hand_size, &portable.hand)?;

        let mut state = Self::new(seed);
        state.config = config;
        state.board = board;
        state.hand = hand;
        state.score = portable.score;
        state.combo = ComboTracker {
            combo: portable.combo,
            moves_since_last_clear: portable.moves_since_last_clear,
        };
        state.lines_cleared = portable.lines_cleared;
        state.pieces_placed = portable.pieces_placed;
        state.stars_collected = portable.stars_collected;
        state.high_score = portable.high_score;
        state.game_id = 1;

        if portable.game_over {
            state.phase = Phase::GameOver;
            state.high_score = state.high_score.max(state.score);
        } else {
            state.phase = Phase::InProgress;
            state
                .hand
                .refill_if_empty(&state.catalog, &mut state.rng, &state.config.palette);
            if !state.board.has_any_valid_move(state.hand.pieces()) {
                state.finish();
            }
        }
        Ok(state)
    }

    /// Portable copy of the current game
    pub fn to_portable(&self) -> PortableGame {
        PortableGame {
            board: self.board.to_portable(),
            hand: self.hand.pieces().map(PortablePiece::from).collect(),
            score: self.score,
            combo: self.combo.combo,
            moves_since_last_clear: self.combo.moves_since_last_clear,
            lines_cleared: self.lines_cleared,
            pieces_placed: self.pieces_placed,
            stars_collected: self.stars_collected,
            high_score: self.high_score,
            game_over: self.phase == Phase::GameOver,
        }
    }

    /// Start a new game with `config`
    ///
    /// Allowed from any phase; a running game is abandoned. The first hand is
    /// checked right away, so a layout that leaves no room starts as `GameOver`.
    pub fn start_game(&mut self, config: ModeConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.begin();
        Ok(())
    }

    /// Restart with the current config
    pub fn reset_game(&mut self) {
        self.begin();
    }

    /// Fresh board, hand and counters for the stored (already validated) config
    fn begin(&mut self) {
        let mut board = Board::new(self.config.board_size);
        if let Err(err) = board.apply_layout(&self.config.layout) {
            // Layouts are validated together with their config.
            debug_assert!(false, "stored layout rejected: {err}");
            board.clear();
        }
        self.board = board;
        self.hand = Hand::new(self.config.hand_size);
        self.hand
            .deal(&self.catalog, &mut self.rng, &self.config.palette);

        self.score = 0;
        self.combo.reset();
        self.lines_cleared = 0;
        self.pieces_placed = 0;
        self.stars_collected = 0;
        self.game_id = self.game_id.wrapping_add(1);
        self.phase = Phase::InProgress;

        info!(
            game_id = self.game_id,
            mode = self.config.mode.as_str(),
            board_size = self.config.board_size,
            hand_size = self.config.hand_size,
            markers = self.board.markers_remaining(),
            "game started"
        );

        if !self.board.has_any_valid_move(self.hand.pieces()) {
            self.finish();
        }
    }

    /// Place hand piece `id` with its top-left corner at column `col`, row `row`
    ///
    /// On error nothing changes.
    ///
    /// # Panics
    ///
    /// If the game is not in progress. Callers gate on [`GameState::phase`].
    pub fn place_piece(
        &mut self,
        id: PieceId,
        col: i32,
        row: i32,
    ) -> Result<PlaceOutcome, PlacementError> {
        assert!(
            self.phase == Phase::InProgress,
            "place_piece called while the game is {}",
            self.phase.as_str()
        );

        let piece = self
            .hand
            .get(id)
            .map(|held| held.piece)
            .ok_or(PlacementError::UnknownPiece(id))?;
        if !self.board.can_place(&piece, col, row) {
            return Err(PlacementError::InvalidPlacement { col, row });
        }

        let placed = self.board.place(&piece, col, row);
        let clear = self.board.resolve_lines();
        let lines = clear.line_count();
        let score = calculate_score(
            &mut self.combo,
            piece.cell_count(),
            lines,
            self.board.size(),
            self.hand.capacity(),
        );

        self.score = self.score.saturating_add(score.total);
        self.pieces_placed += 1;
        self.lines_cleared += lines;
        self.stars_collected += clear.collected_markers.len() as u32;

        if lines > 0 {
            debug!(
                lines,
                combo = score.combo,
                bonus = score.clear_bonus,
                cleared = clear.cleared_cells.len(),
                degraded = clear.degraded_ice.len(),
                markers = clear.collected_markers.len(),
                "lines cleared"
            );
        }

        self.hand.remove(id);
        let refilled = self
            .hand
            .refill_if_empty(&self.catalog, &mut self.rng, &self.config.palette);
        if refilled {
            debug!(hand_size = self.hand.len(), "hand refilled");
        }

        let game_over = !self.board.has_any_valid_move(self.hand.pieces());
        if game_over {
            self.finish();
        }

        Ok(PlaceOutcome {
            piece_id: id,
            placed,
            score,
            clear,
            refilled,
            game_over,
        })
    }

    /// Whether `place_piece(id, col, row)` would succeed
    pub fn can_place_piece(&self, id: PieceId, col: i32, row: i32) -> bool {
        self.phase == Phase::InProgress
            && self
                .hand
                .get(id)
                .is_some_and(|held| self.board.can_place(&held.piece, col, row))
    }

    /// End a running game from outside (time limits and the like)
    ///
    /// Returns false if no game was running.
    pub fn force_game_over(&mut self) -> bool {
        if self.phase != Phase::InProgress {
            return false;
        }
        warn!(game_id = self.game_id, score = self.score, "game over forced");
        self.finish();
        true
    }

    fn finish(&mut self) {
        self.phase = Phase::GameOver;
        self.high_score = self.high_score.max(self.score);
        info!(
            game_id = self.game_id,
            score = self.score,
            high_score = self.high_score,
            lines = self.lines_cleared,
            pieces = self.pieces_placed,
            "game over"
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo.combo
    }

    pub fn moves_since_last_clear(&self) -> u32 {
        self.combo.moves_since_last_clear
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    pub fn stars_collected(&self) -> u32 {
        self.stars_collected
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fill `out` with the current state without allocating
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let size = self.board.size();
        out.clear();
        out.size = size as u8;
        for (r, row) in self.board.rows().enumerate() {
            out.board[r][..size].copy_from_slice(row);
        }
        for marker in self.board.markers() {
            out.markers[marker.row as usize][marker.col as usize] = true;
        }
        for (slot, held) in out.hand.iter_mut().zip(self.hand.iter()) {
            *slot = Some(HandPieceSnapshot::from(held));
        }
        out.hand_len = self.hand.len() as u8;
        out.mode = self.config.mode;
        out.phase = self.phase;
        out.game_id = self.game_id;
        out.seed = self.seed;
        out.score = self.score;
        out.high_score = self.high_score;
        out.combo = self.combo.combo;
        out.moves_since_last_clear = self.combo.moves_since_last_clear;
        out.lines = self.lines_cleared;
        out.pieces_placed = self.pieces_placed;
        out.stars_collected = self.stars_collected;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}
