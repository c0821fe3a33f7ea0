//! Knight candidate moves: the eight fixed jumps.

use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;
use crate::move_generation::legal_move_shared::push_steps;
use crate::moves::move_descriptions::Move;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub fn generate_knight_moves(game_state: &GameState, knight: &Piece, out: &mut Vec<Move>) {
    push_steps(game_state, knight, &KNIGHT_OFFSETS, out);
}
