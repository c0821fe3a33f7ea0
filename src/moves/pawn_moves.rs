//! Pawn candidate moves.
//!
//! Direction depends on color. The double step needs an unmoved pawn on its
//! starting row; diagonal steps need an enemy occupant or the en-passant
//! target. Arrivals on the last row expand into one move per promotion target.

use crate::game_state::chess_types::{Cell, PieceKind};
use crate::game_state::game_state::GameState;
use crate::game_state::piece::Piece;
use crate::move_generation::legal_move_shared::{landing, Landing};
use crate::moves::move_descriptions::{CapturedPiece, Move, MoveKind};

pub fn generate_pawn_moves(game_state: &GameState, pawn: &Piece, out: &mut Vec<Move>) {
    let Some(from) = pawn.cell() else {
        return;
    };
    let color = pawn.color();
    let forward = color.forward();

    if let Some(one_step) = from.offset(0, forward) {
        if game_state.grid.occupant_at(one_step).is_none() {
            push_advance(pawn, from, one_step, None, out);

            if from.row() == color.pawn_row() && !pawn.has_moved() {
                if let Some(two_step) = one_step.offset(0, forward) {
                    if game_state.grid.occupant_at(two_step).is_none() {
                        out.push(Move {
                            kind: MoveKind::DoubleAdvance,
                            piece: pawn.id(),
                            from,
                            to: two_step,
                            captured: None,
                        });
                    }
                }
            }
        }
    }

    for d_column in [-1i8, 1i8] {
        let Some(to) = from.offset(d_column, forward) else {
            continue;
        };
        match landing(game_state, color, to) {
            Landing::Enemy(captured) => push_advance(pawn, from, to, Some(captured), out),
            Landing::Own => {}
            Landing::Empty => {
                if color == game_state.side_to_move && game_state.en_passant_target == Some(to) {
                    if let Some(captured) = en_passant_victim(game_state, pawn, from, to) {
                        out.push(Move {
                            kind: MoveKind::EnPassant,
                            piece: pawn.id(),
                            from,
                            to,
                            captured: Some(captured),
                        });
                    }
                }
            }
        }
    }
}

/// Single-row advance or capture, expanded into promotions on the last row.
fn push_advance(
    pawn: &Piece,
    from: Cell,
    to: Cell,
    captured: Option<CapturedPiece>,
    out: &mut Vec<Move>,
) {
    if to.row() == pawn.color().promotion_row() {
        for target in PieceKind::PROMOTION_TARGETS {
            out.push(Move {
                kind: MoveKind::Promotion(target),
                piece: pawn.id(),
                from,
                to,
                captured,
            });
        }
        return;
    }

    out.push(Move {
        kind: if captured.is_some() {
            MoveKind::Capture
        } else {
            MoveKind::Simple
        },
        piece: pawn.id(),
        from,
        to,
        captured,
    });
}

/// The enemy pawn beside `from` that just double-stepped past `to`.
fn en_passant_victim(
    game_state: &GameState,
    pawn: &Piece,
    from: Cell,
    to: Cell,
) -> Option<CapturedPiece> {
    let victim_cell = Cell::from_parts(to.column(), from.row());
    let victim = game_state.grid.piece_at(victim_cell)?;
    if victim.kind() == PieceKind::Pawn && victim.color() != pawn.color() {
        Some(CapturedPiece {
            piece: victim.id(),
            cell: victim_cell,
        })
    } else {
        None
    }
}
