//! Integration tests for the game lifecycle through the public facade

use gridblocks::core::{
    Board, GameSnapshot, GameState, LevelLayout, ModeConfig, PortableGame, PortablePiece,
};
use gridblocks::engine::{apply_place, run_game, FirstFit, PlaceError, PlacementPolicy};
use gridblocks::types::{Cell, Color, Phase};

fn portable_piece(pattern: &[&str]) -> PortablePiece {
    PortablePiece {
        shape: pattern.iter().map(|s| s.to_string()).collect(),
        color: Color::Yellow,
        spawn_weight: 1.0,
    }
}

/// A running game on `board` holding exactly `hand`
fn game_with(board: Board, hand_size: usize, hand: &[&[&str]]) -> GameState {
    let config = ModeConfig {
        board_size: board.size(),
        hand_size,
        ..ModeConfig::classic()
    };
    let portable = PortableGame {
        board: board.to_portable(),
        hand: hand.iter().map(|p| portable_piece(p)).collect(),
        ..GameState::new(0).to_portable()
    };
    GameState::resume(99, config, &portable).unwrap()
}

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(12345);
    assert_eq!(state.phase(), Phase::Idle);

    state.start_game(ModeConfig::classic()).unwrap();
    assert_eq!(state.phase(), Phase::InProgress);
    assert_eq!(state.hand().len(), 3);
    assert!(state.board().is_empty());

    let mut policy = FirstFit;
    let mut moves = 0;
    while !state.game_over() && moves < 5_000 {
        let mv = policy.choose(&state).expect("policy finds a move while playable");
        apply_place(&mut state, mv.piece, mv.col, mv.row).unwrap();
        moves += 1;
    }
    if !state.game_over() {
        state.force_game_over();
    }

    assert_eq!(state.phase(), Phase::GameOver);
    assert_eq!(state.high_score(), state.score());
    assert_eq!(
        apply_place(&mut state, gridblocks::core::PieceId(1), 0, 0),
        Err(PlaceError::NotPlayable)
    );

    // Restart keeps the high score and clears everything else.
    let high = state.high_score();
    state.reset_game();
    assert_eq!(state.score(), 0);
    assert_eq!(state.combo(), 0);
    assert_eq!(state.lines_cleared(), 0);
    assert_eq!(state.high_score(), high);
}

#[test]
fn test_simple_clear_scenario() {
    let mut board = Board::new(8);
    for col in 0..4 {
        board.set(0, col, Cell::Filled(Color::Red));
    }
    let mut state = game_with(board, 3, &[&["####"], &["#"], &["#"]]);
    let bar = state.hand().iter().next().unwrap().id;

    let outcome = apply_place(&mut state, bar, 4, 0).unwrap();
    assert_eq!(outcome.clear.line_count(), 1);
    // 4 blocks + 1 x 8 x (1 / 2) x 4
    assert_eq!(state.score(), 4 + 16);
    assert_eq!(outcome.clear.cleared_cells.len(), 8);
    assert!(state.board().is_empty());
}

#[test]
fn test_double_clear_scores_both_lines() {
    let board = {
        let mut b = Board::new(8);
        for i in 1..8 {
            b.set(0, i, Cell::Filled(Color::Red));
            b.set(i, 0, Cell::Filled(Color::Red));
        }
        b
    };
    let mut state = game_with(board, 3, &[&["#"], &["#"], &["#"]]);
    let dot = state.hand().iter().next().unwrap().id;

    let outcome = apply_place(&mut state, dot, 0, 0).unwrap();
    assert_eq!(outcome.clear.line_count(), 2);
    assert_eq!(outcome.score.combo, 2);
    // 1 block + 2 x 8 x (2 / 2) x 1
    assert_eq!(state.score(), 1 + 16);
}

#[test]
fn test_game_over_scenario() {
    let mut board = Board::new(8);
    // Checkerboard of obstacles; opening the corner leaves room for one domino.
    for row in 0..8 {
        for col in 0..8 {
            if (row + col) % 2 == 0 {
                board.set(row, col, Cell::Obstacle);
            }
        }
    }
    board.set(7, 7, Cell::Empty);
    let mut state = game_with(board, 2, &[&["##"], &["##"]]);
    assert_eq!(state.phase(), Phase::InProgress);

    let first = state.hand().iter().next().unwrap().id;
    let outcome = apply_place(&mut state, first, 6, 7).unwrap();
    assert!(outcome.game_over);
    assert_eq!(state.phase(), Phase::GameOver);
    assert_eq!(state.high_score(), state.score());
}

#[test]
fn test_story_game_collects_markers() {
    let layout = LevelLayout::default()
        .with_block(0, 0, Cell::Obstacle)
        .with_block(0, 1, Cell::Filled(Color::Green))
        .with_marker(0, 1)
        .with_marker(5, 5);
    let mut state = GameState::new(4);
    state.start_game(ModeConfig::story(layout)).unwrap();
    assert_eq!(state.board().markers_remaining(), 2);

    let mut board = state.board().clone();
    for col in 2..7 {
        board.set(0, col, Cell::Filled(Color::Green));
    }
    let config = state.config().clone();
    let portable = PortableGame {
        board: board.to_portable(),
        hand: vec![portable_piece(&["#"])],
        ..state.to_portable()
    };
    let mut state = GameState::resume(4, config, &portable).unwrap();
    let dot = state.hand().iter().next().unwrap().id;

    let outcome = apply_place(&mut state, dot, 7, 0).unwrap();
    assert_eq!(outcome.clear.collected_markers.len(), 1);
    assert_eq!(state.stars_collected(), 1);
    assert_eq!(state.board().markers_remaining(), 1);
    assert_eq!(state.board().get(0, 0), Some(Cell::Obstacle));
}

#[test]
fn test_snapshot_follows_placements() {
    let mut state = GameState::new(31);
    state.start_game(ModeConfig::chaos()).unwrap();
    let mut snap = GameSnapshot::default();

    let mut policy = FirstFit;
    for _ in 0..10 {
        if state.game_over() {
            break;
        }
        let mv = policy.choose(&state).unwrap();
        apply_place(&mut state, mv.piece, mv.col, mv.row).unwrap();

        state.snapshot_into(&mut snap);
        assert_eq!(snap.score, state.score());
        assert_eq!(snap.hand_len as usize, state.hand().len());
        for (r, row) in state.board().rows().enumerate() {
            assert_eq!(&snap.board[r][..10], row);
        }
    }
    assert_eq!(snap, state.snapshot());
}

#[test]
fn test_resume_continues_identically() {
    let mut original = GameState::new(5);
    original.start_game(ModeConfig::classic()).unwrap();
    let mut policy = FirstFit;
    for _ in 0..4 {
        let mv = policy.choose(&original).unwrap();
        apply_place(&mut original, mv.piece, mv.col, mv.row).unwrap();
    }

    let json = serde_json::to_string(&original.to_portable()).unwrap();
    let portable: PortableGame = serde_json::from_str(&json).unwrap();
    let resumed = GameState::resume(5, ModeConfig::classic(), &portable).unwrap();

    assert_eq!(resumed.board(), original.board());
    assert_eq!(resumed.score(), original.score());
    assert_eq!(resumed.combo(), original.combo());
    assert_eq!(
        resumed.moves_since_last_clear(),
        original.moves_since_last_clear()
    );
    let shapes = |s: &GameState| s.hand().pieces().map(|p| p.shape).collect::<Vec<_>>();
    assert_eq!(shapes(&resumed), shapes(&original));
}

#[test]
fn test_simulator_runs_every_mode() {
    for config in [
        ModeConfig::classic(),
        ModeConfig::story(LevelLayout::demo()),
        ModeConfig::chaos(),
    ] {
        let summary = run_game(1, 2024, config, &mut FirstFit, 200).unwrap();
        assert!(summary.pieces > 0);
        assert!(summary.score >= summary.pieces as u64);
    }
}
