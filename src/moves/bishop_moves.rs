//! Bishop candidate moves: diagonal slides.

use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;
use crate::move_generation::legal_move_shared::push_slides;
use crate::moves::move_descriptions::Move;

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub fn generate_bishop_moves(game_state: &GameState, bishop: &Piece, out: &mut Vec<Move>) {
    push_slides(game_state, bishop, &BISHOP_DIRECTIONS, out);
}
