use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use sparring_chess::game_state::chess_types::{Cell, Color, PieceKind};
use sparring_chess::game_state::game_state::GameState;
use sparring_chess::move_generation::legal_move_checks::is_king_in_check;
use sparring_chess::move_generation::terminal::GameStatus;
use sparring_chess::moves::move_descriptions::MoveKind;
use sparring_chess::utils::algebraic::algebraic_to_cell;
use sparring_chess::utils::san::move_to_san;

fn cell(name: &str) -> Cell {
    algebraic_to_cell(name).expect("valid square")
}

#[test]
fn knight_to_c3_from_the_opening() {
    let mut game = GameState::new_game();
    let moves = game.legal_moves().expect("legal moves");
    let knight = moves
        .iter()
        .copied()
        .find(|mv| mv.from == cell("b1") && mv.to == cell("c3"))
        .expect("Nc3 is legal");
    assert_eq!(move_to_san(&mut game, &knight).expect("san"), "Nc3");

    let entry = game.commit_move(&knight).expect("commit").clone();
    assert_eq!(entry.san, "Nc3");
    assert_eq!(entry.mover, Color::Light);
    assert!(!is_king_in_check(&game, Color::Light));
    assert_eq!(game.side_to_move, Color::Dark);
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let mut game =
        GameState::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
    game.commit_san("d5").expect("double advance");
    assert_eq!(game.en_passant_target, Some(cell("d6")));

    let capture = game.commit_san("exd6").expect("en passant");
    assert_eq!(capture.kind, MoveKind::EnPassant);
    assert!(game.grid.piece_at(cell("d5")).is_none());
    let lander = game.grid.piece_at(cell("d6")).expect("capturing pawn");
    assert_eq!((lander.color(), lander.kind()), (Color::Light, PieceKind::Pawn));
}

#[test]
fn promotion_keeps_move_counters() {
    let mut game =
        GameState::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 3 40").expect("FEN should parse");
    game.commit_san("e8=Q").expect("promotion");
    let queen = game.grid.piece_at(cell("e8")).expect("promoted piece");
    assert_eq!((queen.color(), queen.kind()), (Color::Light, PieceKind::Queen));
    assert_eq!(game.fullmove_number, 40);
    assert_eq!(game.halfmove_clock, 0);
}

#[test]
fn history_replay_is_idempotent() {
    let mut game = GameState::new_game();
    let start_fen = game.get_fen();
    let start_key = game.position_key();

    let mut fens = vec![start_fen.clone()];
    for san in ["e4", "c5", "Nf3", "d6", "Bb5+", "Bd7", "O-O", "Nc6"] {
        game.commit_san(san).expect("scripted move");
        fens.push(game.get_fen());
    }
    let end_fen = game.get_fen();

    while game.step_back().expect("step back").is_some() {}
    assert_eq!(game.get_fen(), start_fen);
    assert_eq!(game.position_key(), start_key);
    assert!(!game.history.can_step_back());

    while game.step_forward().expect("step forward").is_some() {}
    assert_eq!(game.get_fen(), end_fen);

    // Mixed navigation lands on the recorded position for the cursor.
    for _ in 0..3 {
        game.step_back().expect("back");
    }
    game.step_forward().expect("forward");
    game.step_back().expect("back");
    game.step_back().expect("back");
    assert_eq!(game.history.cursor(), 4);
    assert_eq!(game.get_fen(), fens[4]);
    game.grid.check_consistency().expect("grid links intact");
}

#[test]
fn committing_after_stepping_back_truncates_the_future() {
    let mut game = GameState::new_game();
    game.commit_san("e4").expect("e4");
    game.commit_san("e5").expect("e5");
    game.step_back().expect("back");
    assert!(game.history.can_step_forward());

    game.commit_san("c5").expect("c5");
    assert_eq!(game.history.len(), 2);
    assert!(!game.history.can_step_forward());
    assert_eq!(game.history.san_moves(), vec!["e4", "c5"]);
}

#[test]
fn fools_mate_is_detected() {
    let mut game = GameState::new_game();
    for san in ["f3", "e5", "g4", "Qh4#"] {
        game.commit_san(san).expect("scripted move");
    }
    assert_eq!(
        game.status,
        GameStatus::Checkmate {
            winner: Color::Dark
        }
    );
    assert!(game.commit_san("a3").is_err());
}

#[test]
fn knight_shuffle_draws_by_repetition() {
    let mut game = GameState::new_game();
    for _ in 0..2 {
        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.commit_san(san).expect("shuffle");
        }
    }
    assert_eq!(game.status, GameStatus::DrawByRepetition);
}

#[test]
fn seeded_random_playouts_unwind_exactly() {
    let mut rng = StdRng::seed_from_u64(0x5EED_C4E55);
    for _ in 0..6 {
        let mut game = GameState::new_game();
        let mut fens = vec![game.get_fen()];
        for _ in 0..80 {
            if game.is_game_over() {
                break;
            }
            let moves = game.legal_moves().expect("legal moves");
            let Some(mv) = moves.choose(&mut rng).copied() else {
                break;
            };
            game.commit_move(&mv).expect("random legal move commits");
            game.grid.check_consistency().expect("grid links intact");
            fens.push(game.get_fen());
        }

        for expected in fens.iter().rev().skip(1) {
            game.step_back().expect("step back");
            assert_eq!(&game.get_fen(), expected);
        }
        assert!(game.step_back().expect("at start").is_none());
        game.grid.check_consistency().expect("grid links intact");
    }
}
