//! Attack detection.
//!
//! A cell is attacked when some piece of the attacking color could capture
//! onto it with its movement pattern. Scanning outward from the target cell
//! gives the same answer as enumerating every opposing candidate move, without
//! recursing into castling generation.

use crate::game_state::chess_types::{Cell, Color, PieceKind};
use crate::game_state::game_state::GameState;
use crate::game_state::position_grid::PositionGrid;
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::king_moves::KING_OFFSETS;
use crate::moves::knight_moves::KNIGHT_OFFSETS;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

#[inline]
pub fn king_cell(grid: &PositionGrid, color: Color) -> Option<Cell> {
    grid.king_of(color).and_then(|king| king.cell())
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king) = king_cell(&game_state.grid, color) else {
        return false;
    };
    is_cell_attacked(&game_state.grid, king, color.opposite())
}

pub fn is_cell_attacked(grid: &PositionGrid, cell: Cell, attacker: Color) -> bool {
    !attackers_of_cell(grid, cell, attacker, true).is_empty()
}

/// Cells of `attacker` pieces that attack `cell`. With `first_only` the scan
/// stops at the first hit.
pub fn attackers_of_cell(
    grid: &PositionGrid,
    cell: Cell,
    attacker: Color,
    first_only: bool,
) -> Vec<Cell> {
    let mut found = Vec::new();
    let is_attacker = |from: Cell, kinds: &[PieceKind]| {
        grid.piece_at(from)
            .is_some_and(|p| p.color() == attacker && kinds.contains(&p.kind()))
    };

    // A pawn attacks diagonally forward, so look one row "behind" the target.
    for d_column in [-1i8, 1i8] {
        if let Some(from) = cell.offset(d_column, -attacker.forward()) {
            if is_attacker(from, &[PieceKind::Pawn]) {
                found.push(from);
                if first_only {
                    return found;
                }
            }
        }
    }

    for (offsets, kind) in [
        (&KNIGHT_OFFSETS[..], PieceKind::Knight),
        (&KING_OFFSETS[..], PieceKind::King),
    ] {
        for &(d_column, d_row) in offsets {
            if let Some(from) = cell.offset(d_column, d_row) {
                if is_attacker(from, &[kind]) {
                    found.push(from);
                    if first_only {
                        return found;
                    }
                }
            }
        }
    }

    for (directions, kinds) in [
        (&ROOK_DIRECTIONS, [PieceKind::Rook, PieceKind::Queen]),
        (&BISHOP_DIRECTIONS, [PieceKind::Bishop, PieceKind::Queen]),
    ] {
        for &(d_column, d_row) in directions {
            let mut cursor = cell;
            while let Some(from) = cursor.offset(d_column, d_row) {
                if grid.occupant_at(from).is_some() {
                    if is_attacker(from, &kinds) {
                        found.push(from);
                        if first_only {
                            return found;
                        }
                    }
                    break;
                }
                cursor = from;
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::{attackers_of_cell, is_cell_attacked, is_king_in_check};
    use crate::game_state::chess_types::{Cell, Color};
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_has_no_checks() {
        let game = GameState::new_game();
        assert!(!is_king_in_check(&game, Color::Light));
        assert!(!is_king_in_check(&game, Color::Dark));
        let f3 = Cell::new(5, 2).expect("f3");
        assert!(is_cell_attacked(&game.grid, f3, Color::Light));
        assert!(!is_cell_attacked(&game.grid, f3, Color::Dark));
    }

    #[test]
    fn sliding_attack_is_blocked_by_interposed_piece() {
        let game =
            GameState::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(!is_king_in_check(&game, Color::Light));
        let e2 = Cell::new(4, 1).expect("e2");
        assert!(is_cell_attacked(&game.grid, e2, Color::Dark));
    }

    #[test]
    fn double_attack_is_reported_twice() {
        let game =
            GameState::from_fen("4k3/8/8/8/8/5n2/8/r3K3 w - - 0 1").expect("FEN should parse");
        let e1 = Cell::new(4, 0).expect("e1");
        assert_eq!(attackers_of_cell(&game.grid, e1, Color::Dark, false).len(), 2);
    }
}
