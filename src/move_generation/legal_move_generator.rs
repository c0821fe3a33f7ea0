//! Legal move generation.
//!
//! Collects every candidate move of a color from the piece catalogue, then
//! keeps only those that do not leave that color's king attacked. Each
//! candidate is trial-executed and undone through the execution engine in
//! simulation mode, so nothing outside the position observes the trial.

use crate::errors::ChessResult;
use crate::game_state::chess_types::{Cell, Color};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::simulate;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::moves::move_descriptions::Move;

/// Geometrically possible moves of every `color` piece, unfiltered.
pub fn candidate_moves(game_state: &GameState, color: Color) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    for piece in game_state.grid.pieces_of(color) {
        piece.candidate_moves(game_state, &mut out);
    }
    out
}

pub fn legal_moves(game_state: &mut GameState, color: Color) -> ChessResult<Vec<Move>> {
    let candidates = candidate_moves(game_state, color);
    let mut legal = Vec::with_capacity(candidates.len());
    for mv in candidates {
        let leaves_king_safe = simulate(game_state, &mv, |next| !is_king_in_check(next, color))?;
        if leaves_king_safe {
            legal.push(mv);
        }
    }
    Ok(legal)
}

/// Legal moves of whatever piece stands on `cell`.
pub fn legal_moves_from(game_state: &mut GameState, cell: Cell) -> ChessResult<Vec<Move>> {
    let Some(color) = game_state.grid.piece_at(cell).map(|p| p.color()) else {
        return Ok(Vec::new());
    };
    let mut moves = legal_moves(game_state, color)?;
    moves.retain(|mv| mv.from == cell);
    Ok(moves)
}

pub fn has_legal_move(game_state: &mut GameState, color: Color) -> ChessResult<bool> {
    for mv in candidate_moves(game_state, color) {
        if simulate(game_state, &mv, |next| !is_king_in_check(next, color))? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{candidate_moves, legal_moves, legal_moves_from};
    use crate::game_state::chess_types::{Cell, Color};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_checks::is_king_in_check;
    use crate::move_generation::legal_move_apply::simulate;

    #[test]
    fn starting_position_has_twenty_moves() {
        let mut game = GameState::new_game();
        assert_eq!(legal_moves(&mut game, Color::Light).expect("moves").len(), 20);
        assert_eq!(legal_moves(&mut game, Color::Dark).expect("moves").len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_pin_line() {
        let mut game =
            GameState::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").expect("FEN should parse");
        let e2 = Cell::new(4, 1).expect("e2");
        assert!(!candidate_moves(&game, Color::Light).iter().all(|m| m.from != e2));
        assert!(legal_moves_from(&mut game, e2).expect("moves").is_empty());
    }

    #[test]
    fn no_legal_move_leaves_own_king_attacked() {
        let mut game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        for color in [Color::Light, Color::Dark] {
            for mv in legal_moves(&mut game, color).expect("moves") {
                let exposed = simulate(&mut game, &mv, |next| is_king_in_check(next, color))
                    .expect("simulate");
                assert!(!exposed, "{mv} exposes the {color} king");
            }
        }
    }
}
