//! Property tests for board invariants (masks, special cells, deadlock detection).

include!("common/proptest_prelude.rs");

use std::collections::HashSet;

use gridblocks::core::pieces::STANDARD_CATALOG;
use gridblocks::core::{Board, Piece};
use gridblocks::types::{Cell, Color};
use proptest::prelude::*;

fn color() -> impl Strategy<Value = Color> {
    (0..Color::ALL.len()).prop_map(|i| Color::ALL[i])
}

fn cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        4 => Just(Cell::Empty),
        4 => color().prop_map(Cell::Filled),
        1 => Just(Cell::Obstacle),
        1 => color().prop_map(Cell::Ice1),
        1 => color().prop_map(Cell::Ice2),
    ]
}

/// A board of size 2..=10 with arbitrary cells
fn board() -> impl Strategy<Value = Board> {
    (2usize..=10).prop_flat_map(|size| {
        prop::collection::vec(cell(), size * size).prop_map(move |cells| {
            let mut board = Board::new(size);
            for (i, c) in cells.into_iter().enumerate() {
                board.set(i / size, i % size, c);
            }
            board
        })
    })
}

fn piece() -> impl Strategy<Value = Piece> {
    (0..STANDARD_CATALOG.len(), color()).prop_map(|(i, color)| {
        let (_, shape, weight) = STANDARD_CATALOG[i];
        Piece::new(shape, color, weight)
    })
}

/// Exhaustive fit check that reads cells only
fn fits_anywhere(board: &Board, piece: &Piece) -> bool {
    let size = board.size();
    (0..size).any(|row| {
        (0..size).any(|col| {
            piece.shape.cells().all(|(dr, dc)| {
                board.get(row + dr, col + dc) == Some(Cell::Empty)
            })
        })
    })
}

fn obstacles(board: &Board) -> Vec<(usize, usize)> {
    let size = board.size();
    (0..size * size)
        .map(|i| (i / size, i % size))
        .filter(|&(r, c)| board.get(r, c) == Some(Cell::Obstacle))
        .collect()
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    /// Property: masks agree with cells after any sequence of place + resolve
    #[test]
    fn prop_masks_stay_in_sync(
        mut board in board(),
        moves in prop::collection::vec((piece(), -1i32..=10, -1i32..=10), 1..12),
    ) {
        prop_assert!(board.masks_in_sync());
        for (piece, x, y) in moves {
            if board.can_place(&piece, x, y) {
                let placed = board.place(&piece, x, y);
                prop_assert_eq!(placed.len(), piece.cell_count());
                prop_assert!(board.masks_in_sync());
            }
            board.resolve_lines();
            prop_assert!(board.masks_in_sync());
        }
    }

    /// Property: obstacles survive every clear, and nothing becomes an obstacle
    #[test]
    fn prop_obstacles_are_permanent(mut board in board(), piece in piece(), x in 0i32..10, y in 0i32..10) {
        let before = obstacles(&board);
        if board.can_place(&piece, x, y) {
            board.place(&piece, x, y);
        }
        board.resolve_lines();
        prop_assert_eq!(obstacles(&board), before);
    }

    /// Property: a resolve with no complete line leaves the board untouched
    #[test]
    fn prop_resolve_without_complete_line_is_noop(mut board in board()) {
        let size = board.size();
        let any_complete = (0..size).any(|i| board.is_row_complete(i) || board.is_col_complete(i));
        let before = board.clone();
        let result = board.resolve_lines();
        prop_assert_eq!(result.is_empty(), !any_complete);
        if !any_complete {
            prop_assert_eq!(board, before);
        }
    }

    /// Property: every non-obstacle cell of a cleared line is processed exactly once
    #[test]
    fn prop_clear_accounts_for_every_line_cell(mut board in board()) {
        let before = board.clone();
        let result = board.resolve_lines();
        let size = board.size();

        let mut affected = HashSet::new();
        for &r in &result.rows {
            affected.extend((0..size).map(|c| (r as usize, c)));
        }
        for &c in &result.cols {
            affected.extend((0..size).map(|r| (r, c as usize)));
        }
        affected.retain(|&(r, c)| before.get(r, c) != Some(Cell::Obstacle));

        prop_assert_eq!(
            result.cleared_cells.len() + result.degraded_ice.len(),
            affected.len()
        );
        for &(r, c) in &affected {
            let expected = match before.get(r, c) {
                Some(Cell::Ice2(color)) => Cell::Ice1(color),
                _ => Cell::Empty,
            };
            prop_assert_eq!(board.get(r, c), Some(expected));
        }
    }

    /// Property: the bit-mask deadlock check matches an exhaustive scan
    #[test]
    fn prop_deadlock_detection_is_sound(
        board in board(),
        hand in prop::collection::vec(piece(), 1..=5),
    ) {
        let expected = hand.iter().any(|p| fits_anywhere(&board, p));
        prop_assert_eq!(board.has_any_valid_move(hand.iter()), expected);
    }

    /// Property: can_place agrees with the exhaustive scan at in-range origins
    #[test]
    fn prop_can_place_matches_cells(board in board(), piece in piece()) {
        let size = board.size();
        for row in 0..size {
            for col in 0..size {
                let fits_on_board = row + piece.height() <= size && col + piece.width() <= size;
                let expected = fits_on_board
                    && piece
                        .shape
                        .cells()
                        .all(|(dr, dc)| board.get(row + dr, col + dc) == Some(Cell::Empty));
                let valid = board.valid_positions(&piece).any(|p| p == (row, col));
                prop_assert_eq!(valid, expected);
                if fits_on_board {
                    prop_assert_eq!(board.can_place(&piece, col as i32, row as i32), expected);
                }
            }
        }
    }

    /// Property: density is the `Filled` fraction and stays in [0, 1]
    #[test]
    fn prop_density_bounds(board in board()) {
        let size = board.size();
        let cells: Vec<Cell> = (0..size * size)
            .filter_map(|i| board.get(i / size, i % size))
            .collect();
        let filled = cells.iter().filter(|c| matches!(c, Cell::Filled(_))).count();
        let blocks = cells.iter().filter(|c| c.counts_toward_line()).count();
        prop_assert_eq!(board.filled_count(), filled);
        prop_assert!((0.0..=1.0).contains(&board.density()));
        prop_assert_eq!(board.is_empty(), blocks == 0);
    }
}
