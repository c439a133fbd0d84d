use thiserror::Error;
use tracing::debug;

use gridblocks_core::{GameState, PieceId, PlaceOutcome, PlacementError};
use gridblocks_types::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("game is not playable")]
    NotPlayable,
    #[error("piece is not in the hand")]
    UnknownPiece,
    #[error("piece does not fit at the requested position")]
    InvalidPlacement,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::UnknownPiece | PlaceError::InvalidPlacement => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::UnknownPiece => "piece is not in the hand",
            PlaceError::InvalidPlacement => "piece does not fit at the requested position",
        }
    }
}

impl From<PlacementError> for PlaceError {
    fn from(value: PlacementError) -> Self {
        match value {
            PlacementError::UnknownPiece(_) => PlaceError::UnknownPiece,
            PlacementError::InvalidPlacement { .. } => PlaceError::InvalidPlacement,
        }
    }
}

/// Place a hand piece on behalf of an input source
///
/// Unlike [`GameState::place_piece`], a request outside a running game is an
/// ordinary error here.
pub fn apply_place(
    state: &mut GameState,
    piece: PieceId,
    col: i32,
    row: i32,
) -> Result<PlaceOutcome, PlaceError> {
    if state.phase() != Phase::InProgress {
        return Err(PlaceError::NotPlayable);
    }

    state.place_piece(piece, col, row).map_err(|err| {
        debug!(piece = piece.0, col, row, code = PlaceError::from(err).code(), "place rejected");
        PlaceError::from(err)
    })
}

/// [`apply_place`] reduced to success or failure
pub fn try_place(state: &mut GameState, piece: PieceId, col: i32, row: i32) -> bool {
    apply_place(state, piece, col, row).is_ok()
}
