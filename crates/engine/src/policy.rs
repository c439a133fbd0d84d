//! Placement policies - automated players for the simulator and tests
//!
//! | Policy | Picks |
//! |--------|-------|
//! | `first-fit` | first hand piece that fits, at its first row-major spot |
//! | `random` | uniformly among every legal (piece, spot) pair |
//! | `greedy` | most lines cleared, then the largest remaining empty region |

use rand::Rng;

use gridblocks_core::rng::{seeded_rng, GameRng};
use gridblocks_core::{Board, GameState, Piece, PieceId};

/// One placement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub piece: PieceId,
    pub col: i32,
    pub row: i32,
}

impl Move {
    fn at(piece: PieceId, (row, col): (usize, usize)) -> Self {
        Self {
            piece,
            col: col as i32,
            row: row as i32,
        }
    }
}

pub trait PlacementPolicy {
    fn name(&self) -> &'static str;

    /// Next move for `state`, or `None` if nothing fits
    fn choose(&mut self, state: &GameState) -> Option<Move>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementPolicy for FirstFit {
    fn name(&self) -> &'static str {
        "first-fit"
    }

    fn choose(&mut self, state: &GameState) -> Option<Move> {
        let board = state.board();
        state.hand().iter().find_map(|held| {
            board
                .valid_positions(&held.piece)
                .next()
                .map(|pos| Move::at(held.id, pos))
        })
    }
}

/// Uniform choice among legal moves, from its own seeded generator
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: GameRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(seed),
        }
    }
}

impl PlacementPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, state: &GameState) -> Option<Move> {
        let board = state.board();
        let moves: Vec<Move> = state
            .hand()
            .iter()
            .flat_map(|held| board.valid_positions(&held.piece).map(|pos| Move::at(held.id, pos)))
            .collect();
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.random_range(0..moves.len())])
    }
}

/// One-ply lookahead: clear as much as possible, keep the board open
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Greedy {
    /// (lines cleared, largest empty region) after dropping `piece` at `pos`
    fn evaluate(board: &Board, piece: &Piece, (row, col): (usize, usize)) -> (u32, usize) {
        let mut after = board.clone();
        after.place(piece, col as i32, row as i32);
        let lines = after.resolve_lines().line_count();
        (lines, after.largest_empty_region())
    }
}

impl PlacementPolicy for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose(&mut self, state: &GameState) -> Option<Move> {
        let board = state.board();
        let mut best: Option<((u32, usize), Move)> = None;
        for held in state.hand() {
            for pos in board.valid_positions(&held.piece) {
                let key = Self::evaluate(board, &held.piece, pos);
                // Strictly better only, so ties keep the earliest move.
                if best.as_ref().map_or(true, |(best_key, _)| key > *best_key) {
                    best = Some((key, Move::at(held.id, pos)));
                }
            }
        }
        best.map(|(_, mv)| mv)
    }
}

/// Policy selector for command lines and configs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    FirstFit,
    Random,
    #[default]
    Greedy,
}

impl PolicyKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first-fit" | "first_fit" | "firstfit" => Some(PolicyKind::FirstFit),
            "random" => Some(PolicyKind::Random),
            "greedy" => Some(PolicyKind::Greedy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::FirstFit => "first-fit",
            PolicyKind::Random => "random",
            PolicyKind::Greedy => "greedy",
        }
    }

    /// Build the policy; `seed` only matters for `Random`
    pub fn build(self, seed: u64) -> Box<dyn PlacementPolicy> {
        match self {
            PolicyKind::FirstFit => Box::new(FirstFit),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Greedy => Box::new(Greedy),
        }
    }
}
