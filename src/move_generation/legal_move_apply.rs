//! Execution engine: apply and revert moves in place.
//!
//! `execute_move` validates every precondition before it touches the grid,
//! including that the mover can reach the destination under its movement
//! rules, so a rejected move leaves the position untouched. Search, perft and
//! legality filtering replay moves produced by the generators and go through
//! the crate-private `apply_move`, which skips the reachability scan. `undo_move` is its exact
//! inverse, restoring occupancy, back-references, movement flags, the mover's
//! pre-promotion kind, castling rights, the en-passant target and both clocks.
//!
//! Neither function notifies anyone or records history; they are the raw
//! simulation-mode primitives. Committing (history, status, display) is layered
//! on top by `GameState::commit_move`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::{Move, MoveKind};

pub fn execute_move(game_state: &mut GameState, mv: &Move) -> ChessResult<UndoState> {
    validate_execution(game_state, mv)?;
    ensure_reachable(game_state, mv)?;
    apply_validated(game_state, mv)
}

/// Execution for moves taken from the candidate generators.
pub(crate) fn apply_move(game_state: &mut GameState, mv: &Move) -> ChessResult<UndoState> {
    validate_execution(game_state, mv)?;
    apply_validated(game_state, mv)
}

fn apply_validated(game_state: &mut GameState, mv: &Move) -> ChessResult<UndoState> {
    let grid = &mut game_state.grid;
    let (mover_color, mover_kind, mover_has_moved) = {
        let mover = grid
            .piece(mv.piece)
            .ok_or_else(|| ChessError::CorruptState("validated mover vanished".to_owned()))?;
        (mover.color, mover.kind, mover.has_moved)
    };
    let transfer = mv.rook_transfer();
    let prev_rook_has_moved = transfer
        .and_then(|t| grid.piece(t.rook))
        .is_some_and(|rook| rook.has_moved);

    let undo = UndoState {
        mv: *mv,
        prev_kind: mover_kind,
        prev_has_moved: mover_has_moved,
        prev_rook_has_moved,
        prev_side_to_move: game_state.side_to_move,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_target: game_state.en_passant_target,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
    };

    if let Some(captured) = mv.captured {
        grid.vacate(captured.cell);
    }

    grid.vacate(mv.from);
    grid.place(mv.piece, mv.to);
    if let Some(mover) = grid.piece_mut(mv.piece) {
        mover.has_moved = true;
        if let MoveKind::Promotion(target) = mv.kind {
            mover.kind = target;
        }
    }

    if let Some(transfer) = transfer {
        grid.vacate(transfer.from);
        grid.place(transfer.rook, transfer.to);
        if let Some(rook) = grid.piece_mut(transfer.rook) {
            rook.has_moved = true;
        }
    }

    update_castling_rights(game_state, mover_color, mover_kind, mv);

    game_state.en_passant_target = if mv.kind == MoveKind::DoubleAdvance {
        mv.from.offset(0, mover_color.forward())
    } else {
        None
    };

    if mover_kind == PieceKind::Pawn || mv.is_capture() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if mover_color == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = mover_color.opposite();
    game_state.ply = game_state.ply.saturating_add(1);
    let key = game_state.position_key();
    game_state.repetition_history.push(key);

    Ok(undo)
}

pub fn undo_move(game_state: &mut GameState, undo: &UndoState) -> ChessResult<()> {
    let mv = &undo.mv;
    let grid = &game_state.grid;

    if grid.occupant_at(mv.to) != Some(mv.piece) {
        return Err(ChessError::CorruptState(format!(
            "undo of {mv}: mover is not on {}",
            mv.to
        )));
    }
    let transfer = mv.rook_transfer();
    if let Some(transfer) = transfer {
        if grid.occupant_at(transfer.to) != Some(transfer.rook) {
            return Err(ChessError::CorruptState(format!(
                "undo of {mv}: castling rook is not on {}",
                transfer.to
            )));
        }
    }
    if let Some(captured) = mv.captured {
        if captured.cell != mv.to && grid.occupant_at(captured.cell).is_some() {
            return Err(ChessError::CorruptState(format!(
                "undo of {mv}: captured piece cell {} is occupied",
                captured.cell
            )));
        }
    }

    let grid = &mut game_state.grid;
    grid.vacate(mv.to);
    grid.place(mv.piece, mv.from);
    if let Some(mover) = grid.piece_mut(mv.piece) {
        mover.kind = undo.prev_kind;
        mover.has_moved = undo.prev_has_moved;
    }

    if let Some(transfer) = transfer {
        grid.vacate(transfer.to);
        grid.place(transfer.rook, transfer.from);
        if let Some(rook) = grid.piece_mut(transfer.rook) {
            rook.has_moved = undo.prev_rook_has_moved;
        }
    }

    if let Some(captured) = mv.captured {
        grid.place(captured.piece, captured.cell);
    }

    game_state.side_to_move = undo.prev_side_to_move;
    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_target = undo.prev_en_passant_target;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.fullmove_number = undo.prev_fullmove_number;
    game_state.ply = game_state.ply.saturating_sub(1);
    game_state.repetition_history.pop();

    Ok(())
}

/// Executes `mv`, runs `probe` on the resulting position, then undoes the move.
pub(crate) fn simulate<R>(
    game_state: &mut GameState,
    mv: &Move,
    probe: impl FnOnce(&mut GameState) -> R,
) -> ChessResult<R> {
    let undo = apply_move(game_state, mv)?;
    let out = probe(game_state);
    undo_move(game_state, &undo)?;
    Ok(out)
}

/// The move must be one of the mover's candidate moves, which also pins down
/// the capture, castling partner and promotion bookkeeping.
fn ensure_reachable(game_state: &GameState, mv: &Move) -> ChessResult<()> {
    let mut candidates = Vec::new();
    if let Some(mover) = game_state.grid.piece(mv.piece) {
        mover.candidate_moves(game_state, &mut candidates);
    }
    if candidates.contains(mv) {
        Ok(())
    } else {
        Err(ChessError::IllegalMove(format!(
            "{mv}: the piece on {} cannot reach {}",
            mv.from, mv.to
        )))
    }
}

fn validate_execution(game_state: &GameState, mv: &Move) -> ChessResult<()> {
    let grid = &game_state.grid;
    let occupant = grid
        .occupant_at(mv.from)
        .ok_or(ChessError::EmptyOrigin(mv.from))?;
    if occupant != mv.piece {
        return Err(ChessError::IllegalMove(format!(
            "{mv}: the piece on {} is not the declared mover",
            mv.from
        )));
    }
    let mover = grid
        .piece(occupant)
        .ok_or_else(|| ChessError::CorruptState(format!("cell {} has a dangling occupant", mv.from)))?;
    if mv.from == mv.to {
        return Err(ChessError::IllegalMove(format!("{mv}: origin equals destination")));
    }

    match (grid.piece_at(mv.to), mv.captured) {
        (None, None) => {}
        (None, Some(captured)) if mv.kind == MoveKind::EnPassant => {
            let victim = grid.piece(captured.piece);
            if grid.occupant_at(captured.cell) != Some(captured.piece)
                || victim.map_or(true, |v| v.color == mover.color || v.kind != PieceKind::Pawn)
            {
                return Err(ChessError::IllegalMove(format!(
                    "{mv}: no capturable pawn on {}",
                    captured.cell
                )));
            }
        }
        (Some(target), Some(captured))
            if target.id == captured.piece
                && captured.cell == mv.to
                && target.color != mover.color => {}
        _ => {
            return Err(ChessError::IllegalMove(format!(
                "{mv}: destination occupancy does not match the move"
            )));
        }
    }

    match mv.kind {
        MoveKind::DoubleAdvance | MoveKind::EnPassant | MoveKind::Promotion(_)
            if mover.kind != PieceKind::Pawn =>
        {
            return Err(ChessError::IllegalMove(format!("{mv}: only pawns may do that")));
        }
        MoveKind::Promotion(PieceKind::Pawn | PieceKind::King) => {
            return Err(ChessError::IllegalMove(format!("{mv}: invalid promotion target")));
        }
        MoveKind::CastleKingside(transfer) | MoveKind::CastleQueenside(transfer) => {
            let rook_ok = grid.occupant_at(transfer.from) == Some(transfer.rook)
                && grid
                    .piece(transfer.rook)
                    .is_some_and(|r| r.kind == PieceKind::Rook && r.color == mover.color);
            if mover.kind != PieceKind::King
                || !rook_ok
                || grid.occupant_at(transfer.to).is_some()
            {
                return Err(ChessError::IllegalMove(format!("{mv}: castling preconditions fail")));
            }
        }
        _ => {}
    }

    Ok(())
}

fn update_castling_rights(game_state: &mut GameState, mover_color: Color, mover_kind: PieceKind, mv: &Move) {
    if mover_kind == PieceKind::King {
        game_state.castling_rights &= !(kingside_right(mover_color) | queenside_right(mover_color));
    }

    // Moving a rook off, or capturing on, an original corner removes that right.
    let touched = [Some(mv.from), Some(mv.to), mv.captured.map(|c| c.cell)];
    for cell in touched.into_iter().flatten() {
        game_state.castling_rights &= !corner_right(cell);
    }
}

fn corner_right(cell: Cell) -> CastlingRights {
    match (cell.column(), cell.row()) {
        (0, 0) => CASTLE_LIGHT_QUEENSIDE,
        (7, 0) => CASTLE_LIGHT_KINGSIDE,
        (0, 7) => CASTLE_DARK_QUEENSIDE,
        (7, 7) => CASTLE_DARK_KINGSIDE,
        _ => 0,
    }
}
