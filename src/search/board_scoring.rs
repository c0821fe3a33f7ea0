//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.
//! Scores are from the perspective of the side to move.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::tables::piece_square_tables::static_value;

pub const MATE_SCORE: i32 = 30000;

/// Scores closer to mate than this are mate scores.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

#[inline]
fn from_side_to_move(game_state: &GameState, white_minus_black: i32) -> i32 {
    match game_state.side_to_move {
        Color::Light => white_minus_black,
        Color::Dark => -white_minus_black,
    }
}

/// Plain material count; kings are ignored since both are always present.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    fn material_balance_white_minus_black(game_state: &GameState) -> i32 {
        game_state
            .grid
            .active_pieces()
            .filter(|p| p.kind() != PieceKind::King)
            .map(|p| match p.color() {
                Color::Light => static_value(p.kind()),
                Color::Dark => -static_value(p.kind()),
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        from_side_to_move(game_state, Self::material_balance_white_minus_black(game_state))
    }
}

/// Material plus piece-square bonuses, with the king table switched once the
/// queens are off or little material remains.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl PieceSquareScorer {
    const ENDGAME_MATERIAL: i32 = 1300;

    pub fn is_endgame(game_state: &GameState) -> bool {
        let mut queens = 0;
        let mut non_pawn_material = 0;
        for piece in game_state.grid.active_pieces() {
            match piece.kind() {
                PieceKind::Queen => {
                    queens += 1;
                    non_pawn_material += static_value(PieceKind::Queen);
                }
                PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook => {
                    non_pawn_material += static_value(piece.kind());
                }
                PieceKind::Pawn | PieceKind::King => {}
            }
        }
        queens == 0 || non_pawn_material <= Self::ENDGAME_MATERIAL * 2
    }
}

impl BoardScorer for PieceSquareScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let endgame = Self::is_endgame(game_state);
        let white_minus_black: i32 = game_state
            .grid
            .active_pieces()
            .map(|p| {
                let value = if p.kind() == PieceKind::King {
                    p.value(endgame) - p.static_value()
                } else {
                    p.value(endgame)
                };
                match p.color() {
                    Color::Light => value,
                    Color::Dark => -value,
                }
            })
            .sum();
        from_side_to_move(game_state, white_minus_black)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialScorer, PieceSquareScorer};
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_is_balanced() {
        let game = GameState::new_game();
        assert_eq!(MaterialScorer.score(&game), 0);
        assert_eq!(PieceSquareScorer.score(&game), 0);
    }

    #[test]
    fn scores_flip_with_side_to_move() {
        let white = GameState::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").expect("FEN");
        let black = GameState::from_fen("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1").expect("FEN");
        assert_eq!(MaterialScorer.score(&white), 900);
        assert_eq!(MaterialScorer.score(&black), -900);
        assert!(PieceSquareScorer.score(&white) > 0);
        assert!(PieceSquareScorer.score(&black) < 0);
    }

    #[test]
    fn centralized_knight_outscores_rim_knight() {
        let center = GameState::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").expect("FEN");
        let rim = GameState::from_fen("4k3/8/8/8/N7/8/8/4K3 w - - 0 1").expect("FEN");
        assert!(PieceSquareScorer.score(&center) > PieceSquareScorer.score(&rim));
    }
}
