//! Helpers shared by the per-piece candidate generators.

use crate::game_state::chess_types::{Cell, Color};
use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;
use crate::moves::move_descriptions::{CapturedPiece, Move, MoveKind};

/// Target of a single step: empty, enemy-occupied, or blocked by an own piece.
pub enum Landing {
    Empty,
    Enemy(CapturedPiece),
    Own,
}

#[inline]
pub fn landing(game_state: &GameState, mover: Color, cell: Cell) -> Landing {
    match game_state.grid.piece_at(cell) {
        None => Landing::Empty,
        Some(occupant) if occupant.color() == mover => Landing::Own,
        Some(occupant) => Landing::Enemy(CapturedPiece {
            piece: occupant.id(),
            cell,
        }),
    }
}

/// Plain move or capture onto `to`, depending on what stands there.
#[inline]
pub fn step_move(piece: &Piece, from: Cell, to: Cell, captured: Option<CapturedPiece>) -> Move {
    Move {
        kind: if captured.is_some() {
            MoveKind::Capture
        } else {
            MoveKind::Simple
        },
        piece: piece.id(),
        from,
        to,
        captured,
    }
}

/// Fixed-offset movement (knight, king).
pub fn push_steps(game_state: &GameState, piece: &Piece, offsets: &[(i8, i8)], out: &mut Vec<Move>) {
    let Some(from) = piece.cell() else {
        return;
    };
    for &(d_column, d_row) in offsets {
        let Some(to) = from.offset(d_column, d_row) else {
            continue;
        };
        match landing(game_state, piece.color(), to) {
            Landing::Empty => out.push(step_move(piece, from, to, None)),
            Landing::Enemy(captured) => out.push(step_move(piece, from, to, Some(captured))),
            Landing::Own => {}
        }
    }
}

/// Sliding movement bounded by the first occupant on each ray.
pub fn push_slides(
    game_state: &GameState,
    piece: &Piece,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    let Some(from) = piece.cell() else {
        return;
    };
    for &(d_column, d_row) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(d_column, d_row) {
            match landing(game_state, piece.color(), to) {
                Landing::Empty => out.push(step_move(piece, from, to, None)),
                Landing::Enemy(captured) => {
                    out.push(step_move(piece, from, to, Some(captured)));
                    break;
                }
                Landing::Own => break,
            }
            cursor = to;
        }
    }
}
