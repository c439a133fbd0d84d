use crate::hand::{HeldPiece, PieceId};
use crate::pieces::Shape;
use crate::types::{Cell, Color, GameMode, Phase, MAX_BOARD_SIZE, MAX_HAND_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandPieceSnapshot {
    pub id: PieceId,
    pub shape: Shape,
    pub color: Color,
}

impl From<&HeldPiece> for HandPieceSnapshot {
    fn from(value: &HeldPiece) -> Self {
        Self {
            id: value.id,
            shape: value.piece.shape,
            color: value.piece.color,
        }
    }
}

/// Read-only view of a game for presentation
///
/// Fixed-size so it can be refreshed in place every frame. Only the top-left
/// `size` x `size` corner of `board`/`markers` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub size: u8,
    pub board: [[Cell; MAX_BOARD_SIZE]; MAX_BOARD_SIZE],
    pub markers: [[bool; MAX_BOARD_SIZE]; MAX_BOARD_SIZE],
    pub hand: [Option<HandPieceSnapshot>; MAX_HAND_SIZE],
    pub hand_len: u8,
    pub mode: GameMode,
    pub phase: Phase,
    pub game_id: u32,
    pub seed: u64,
    pub score: u64,
    pub high_score: u64,
    pub combo: u32,
    pub moves_since_last_clear: u32,
    pub lines: u32,
    pub pieces_placed: u32,
    pub stars_collected: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.board = [[Cell::Empty; MAX_BOARD_SIZE]; MAX_BOARD_SIZE];
        self.markers = [[false; MAX_BOARD_SIZE]; MAX_BOARD_SIZE];
        self.hand = [None; MAX_HAND_SIZE];
        self.hand_len = 0;
        self.mode = GameMode::Classic;
        self.phase = Phase::Idle;
        self.game_id = 0;
        self.seed = 0;
        self.score = 0;
        self.high_score = 0;
        self.combo = 0;
        self.moves_since_last_clear = 0;
        self.lines = 0;
        self.pieces_placed = 0;
        self.stars_collected = 0;
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Hand pieces in dealing order
    pub fn hand_pieces(&self) -> impl Iterator<Item = &HandPieceSnapshot> + '_ {
        self.hand[..self.hand_len as usize].iter().flatten()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            size: 0,
            board: [[Cell::Empty; MAX_BOARD_SIZE]; MAX_BOARD_SIZE],
            markers: [[false; MAX_BOARD_SIZE]; MAX_BOARD_SIZE],
            hand: [None; MAX_HAND_SIZE],
            hand_len: 0,
            mode: GameMode::Classic,
            phase: Phase::Idle,
            game_id: 0,
            seed: 0,
            score: 0,
            high_score: 0,
            combo: 0,
            moves_since_last_clear: 0,
            lines: 0,
            pieces_placed: 0,
            stars_collected: 0,
        };
        s.clear();
        s
    }
}
