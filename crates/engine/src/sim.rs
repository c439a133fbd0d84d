//! Headless game runner
//!
//! Drives a [`GameState`] with a [`PlacementPolicy`] until the game ends or a
//! move cap is reached, then reports a [`GameSummary`].

use serde::Serialize;
use tracing::{debug, info};

use gridblocks_core::{ConfigError, GameState, ModeConfig};

use crate::place::apply_place;
use crate::policy::PlacementPolicy;

/// Why a simulated game stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No hand piece fit anywhere
    NoMoves,
    /// The move cap was reached and the game was ended by force
    MoveLimit,
    /// The policy gave up or proposed an illegal move
    PolicyStuck,
}

/// Result of one simulated game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub game: u32,
    pub seed: u64,
    pub mode: &'static str,
    pub policy: &'static str,
    pub score: u64,
    pub lines: u32,
    pub pieces: u32,
    pub stars: u32,
    pub max_combo: u32,
    pub reason: StopReason,
}

/// Play one game of `config` from `seed` with `policy`
///
/// `max_moves` of 0 means no cap.
pub fn run_game(
    game: u32,
    seed: u64,
    config: ModeConfig,
    policy: &mut dyn PlacementPolicy,
    max_moves: u32,
) -> Result<GameSummary, ConfigError> {
    let mut state = GameState::new(seed);
    state.start_game(config)?;

    let mut max_combo = 0;
    let mut reason = StopReason::NoMoves;
    while !state.game_over() {
        if max_moves > 0 && state.pieces_placed() >= max_moves {
            state.force_game_over();
            reason = StopReason::MoveLimit;
            break;
        }
        let Some(mv) = policy.choose(&state) else {
            state.force_game_over();
            reason = StopReason::PolicyStuck;
            break;
        };
        match apply_place(&mut state, mv.piece, mv.col, mv.row) {
            Ok(outcome) => {
                max_combo = max_combo.max(outcome.score.combo);
            }
            Err(err) => {
                debug!(code = err.code(), "policy proposed an illegal move");
                state.force_game_over();
                reason = StopReason::PolicyStuck;
                break;
            }
        }
    }

    let summary = GameSummary {
        game,
        seed,
        mode: state.config().mode.as_str(),
        policy: policy.name(),
        score: state.score(),
        lines: state.lines_cleared(),
        pieces: state.pieces_placed(),
        stars: state.stars_collected(),
        max_combo,
        reason,
    };
    info!(
        game,
        seed,
        score = summary.score,
        lines = summary.lines,
        pieces = summary.pieces,
        "simulated game finished"
    );
    Ok(summary)
}
