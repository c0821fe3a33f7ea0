//! King candidate moves, including castling.
//!
//! Castling requires the matching right, an unmoved king and rook on their
//! home cells, empty cells between them, and that the king neither stands on
//! nor passes through an attacked cell. The final cell is checked again by
//! the king-safety filter like any other move.

use crate::game_state::chess_types::{kingside_right, queenside_right, Cell, PieceKind};
use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;
use crate::move_generation::legal_move_checks::is_cell_attacked;
use crate::move_generation::legal_move_shared::push_steps;
use crate::moves::move_descriptions::{Move, MoveKind, RookTransfer};

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KING_HOME_COLUMN: u8 = 4;

pub fn generate_king_moves(game_state: &GameState, king: &Piece, out: &mut Vec<Move>) {
    push_steps(game_state, king, &KING_OFFSETS, out);
    generate_castling_moves(game_state, king, out);
}

fn generate_castling_moves(game_state: &GameState, king: &Piece, out: &mut Vec<Move>) {
    let Some(from) = king.cell() else {
        return;
    };
    let color = king.color();
    let row = color.home_row();
    if king.has_moved() || from.row() != row || from.column() != KING_HOME_COLUMN {
        return;
    }
    let enemy = color.opposite();

    // Cannot castle out of check.
    if is_cell_attacked(&game_state.grid, from, enemy) {
        return;
    }

    if game_state.castling_rights & kingside_right(color) != 0 {
        if let Some(transfer) = castle_path(game_state, king, 7, 5, &[5, 6], &[5, 6]) {
            out.push(Move {
                kind: MoveKind::CastleKingside(transfer),
                piece: king.id(),
                from,
                to: cell(6, row),
                captured: None,
            });
        }
    }

    if game_state.castling_rights & queenside_right(color) != 0 {
        if let Some(transfer) = castle_path(game_state, king, 0, 3, &[1, 2, 3], &[3, 2]) {
            out.push(Move {
                kind: MoveKind::CastleQueenside(transfer),
                piece: king.id(),
                from,
                to: cell(2, row),
                captured: None,
            });
        }
    }
}

/// Validates the rook partner and path; returns the rook relocation on success.
fn castle_path(
    game_state: &GameState,
    king: &Piece,
    rook_column: u8,
    rook_target_column: u8,
    must_be_empty: &[u8],
    must_be_safe: &[u8],
) -> Option<RookTransfer> {
    let color = king.color();
    let row = color.home_row();
    let rook_from = cell(rook_column, row);
    let rook = game_state.grid.piece_at(rook_from)?;
    if rook.kind() != PieceKind::Rook || rook.color() != color || rook.has_moved() {
        return None;
    }

    let grid = &game_state.grid;
    if must_be_empty
        .iter()
        .any(|&column| grid.occupant_at(cell(column, row)).is_some())
    {
        return None;
    }
    if must_be_safe
        .iter()
        .any(|&column| is_cell_attacked(grid, cell(column, row), color.opposite()))
    {
        return None;
    }

    Some(RookTransfer {
        rook: rook.id(),
        from: rook_from,
        to: cell(rook_target_column, row),
    })
}

#[inline]
fn cell(column: u8, row: u8) -> Cell {
    Cell::from_parts(column, row)
}
