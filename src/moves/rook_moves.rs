//! Rook candidate moves: orthogonal slides.

use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;
use crate::move_generation::legal_move_shared::push_slides;
use crate::moves::move_descriptions::Move;

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub fn generate_rook_moves(game_state: &GameState, rook: &Piece, out: &mut Vec<Move>) {
    push_slides(game_state, rook, &ROOK_DIRECTIONS, out);
}

#[cfg(test)]
mod tests {
    use super::generate_rook_moves;
    use crate::game_state::chess_types::Cell;
    use crate::game_state::game_state::GameState;

    #[test]
    fn rook_blocker_stops_ray() {
        let game = GameState::from_fen("4k3/8/8/8/p7/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        let a1 = Cell::new(0, 0).expect("a1");
        let rook = game.grid.piece_at(a1).expect("rook on a1");
        let mut out = Vec::new();
        generate_rook_moves(&game, rook, &mut out);

        let targets: Vec<String> = out.iter().map(|m| m.to.to_string()).collect();
        assert!(targets.contains(&"a4".to_owned()));
        assert!(!targets.contains(&"a5".to_owned()));
        assert!(!targets.contains(&"e1".to_owned()));
        // a2, a3, a4 (capture), b1, c1, d1
        assert_eq!(out.len(), 6);
        assert_eq!(out.iter().filter(|m| m.is_capture()).count(), 1);
    }
}
