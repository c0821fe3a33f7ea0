use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;

/// Single undo record produced by `execute_move` and consumed by `undo_move`.
///
/// Holds everything a move overwrites that cannot be recomputed from the move
/// itself: movement flags, the mover's kind before promotion, rights, clocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub mv: Move,
    pub prev_kind: PieceKind,
    pub prev_has_moved: bool,
    pub prev_rook_has_moved: bool,

    pub prev_side_to_move: Color,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_target: Option<Cell>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,
}
