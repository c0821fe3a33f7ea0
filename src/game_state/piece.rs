//! Piece catalogue entry: kind, color, location and per-piece movement state.

use crate::game_state::chess_types::{Cell, Color, PieceId, PieceKind};
use crate::game_state::game_state::GameState;
use crate::moves::bishop_moves::generate_bishop_moves;
use crate::moves::king_moves::generate_king_moves;
use crate::moves::knight_moves::generate_knight_moves;
use crate::moves::move_descriptions::Move;
use crate::moves::pawn_moves::generate_pawn_moves;
use crate::moves::queen_moves::generate_queen_moves;
use crate::moves::rook_moves::generate_rook_moves;
use crate::tables::piece_square_tables::{positional_value, static_value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) kind: PieceKind,
    pub(crate) color: Color,
    /// `None` once captured; the arena slot is kept for undo.
    pub(crate) cell: Option<Cell>,
    pub(crate) has_moved: bool,
}

impl Piece {
    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn cell(&self) -> Option<Cell> {
        self.cell
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.cell.is_none()
    }

    #[inline]
    pub fn static_value(&self) -> i32 {
        static_value(self.kind)
    }

    /// Static value plus the position-table bonus at the current cell.
    ///
    /// Only the search evaluation uses this; legality never does.
    pub fn value(&self, endgame: bool) -> i32 {
        match self.cell {
            Some(cell) => {
                self.static_value() + positional_value(self.kind, self.color, cell, endgame)
            }
            None => 0,
        }
    }

    /// Geometrically possible moves, not filtered for king safety.
    pub fn candidate_moves(&self, game_state: &GameState, out: &mut Vec<Move>) {
        if self.is_captured() {
            return;
        }
        match self.kind {
            PieceKind::Pawn => generate_pawn_moves(game_state, self, out),
            PieceKind::Knight => generate_knight_moves(game_state, self, out),
            PieceKind::Bishop => generate_bishop_moves(game_state, self, out),
            PieceKind::Rook => generate_rook_moves(game_state, self, out),
            PieceKind::Queen => generate_queen_moves(game_state, self, out),
            PieceKind::King => generate_king_moves(game_state, self, out),
        }
    }
}
