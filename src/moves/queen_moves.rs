//! Queen candidate moves: union of rook and bishop slides.

use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;
use crate::move_generation::legal_move_shared::push_slides;
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::move_descriptions::Move;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub fn generate_queen_moves(game_state: &GameState, queen: &Piece, out: &mut Vec<Move>) {
    push_slides(game_state, queen, &ROOK_DIRECTIONS, out);
    push_slides(game_state, queen, &BISHOP_DIRECTIONS, out);
}
