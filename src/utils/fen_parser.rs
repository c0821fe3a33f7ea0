//! FEN-to-GameState parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string:
//! pieces, rights, clocks and the initial repetition key. FEN carries no
//! movement history, so per-piece "has moved" flags are derived: a pawn is
//! unmoved on its starting row, a king or rook is unmoved while a castling
//! right still depends on it.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_cell;

fn invalid(message: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(message.into())
}

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("Missing board layout in FEN"))?;
    let side_part = parts.next().ok_or_else(|| invalid("Missing side-to-move in FEN"))?;
    let castling_part = parts
        .next()
        .ok_or_else(|| invalid("Missing castling rights in FEN"))?;
    let en_passant_part = parts
        .next()
        .ok_or_else(|| invalid("Missing en-passant square in FEN"))?;
    let halfmove_part = parts.next().ok_or_else(|| invalid("Missing halfmove clock in FEN"))?;
    let fullmove_part = parts.next().ok_or_else(|| invalid("Missing fullmove number in FEN"))?;

    if parts.next().is_some() {
        return Err(invalid("FEN has extra trailing fields"));
    }

    let placements = parse_board(board_part)?;

    let mut game_state = GameState::new_empty();
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_target = parse_en_passant_target(en_passant_part)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(format!("Invalid halfmove clock: {halfmove_part}")))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| invalid(format!("Invalid fullmove number: {fullmove_part}")))?;
    if game_state.fullmove_number == 0 {
        return Err(invalid("Fullmove number starts at 1"));
    }

    for color in [Color::Light, Color::Dark] {
        let kings = placements
            .iter()
            .filter(|(_, c, k)| *c == color && *k == PieceKind::King)
            .count();
        if kings != 1 {
            return Err(invalid(format!("{color} must have exactly one king, found {kings}")));
        }
    }

    for (cell, color, kind) in placements {
        let has_moved = !starts_unmoved(kind, color, cell, game_state.castling_rights);
        game_state.grid.spawn(kind, color, cell, has_moved)?;
    }

    let key = game_state.position_key();
    game_state.repetition_history.push(key);

    Ok(game_state)
}

fn parse_board(board_part: &str) -> ChessResult<Vec<(Cell, Color, PieceKind)>> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("Board layout must contain 8 ranks"));
    }

    let mut placements = Vec::with_capacity(32);
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7i32 - fen_rank_idx as i32;
        let mut file = 0i32;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(format!("Invalid empty-square count '{ch}'")));
                }
                file += empty_count as i32;
                continue;
            }

            let (color, piece) = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(format!("Invalid piece character '{ch}' in board layout")))?;

            if file >= 8 {
                return Err(invalid("Board rank has too many files"));
            }

            placements.push((Cell::new(file, board_rank)?, color, piece));
            file += 1;
        }

        if file != 8 {
            return Err(invalid("Board rank does not sum to 8 files"));
        }
    }

    Ok(placements)
}

fn starts_unmoved(kind: PieceKind, color: Color, cell: Cell, rights: CastlingRights) -> bool {
    let on_home_row = cell.row() == color.home_row();
    match kind {
        PieceKind::Pawn => cell.row() == color.pawn_row(),
        PieceKind::King => {
            on_home_row
                && cell.column() == 4
                && rights & (kingside_right(color) | queenside_right(color)) != 0
        }
        PieceKind::Rook => {
            on_home_row
                && ((cell.column() == 7 && rights & kingside_right(color) != 0)
                    || (cell.column() == 0 && rights & queenside_right(color) != 0))
        }
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => on_home_row,
    }
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(format!("Invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(invalid(format!("Invalid castling rights character: {ch}"))),
        }
    }

    Ok(rights)
}

fn parse_en_passant_target(en_passant_part: &str) -> ChessResult<Option<Cell>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let cell = algebraic_to_cell(en_passant_part)
        .map_err(|_| invalid(format!("Invalid en-passant square: {en_passant_part}")))?;
    if cell.row() != 2 && cell.row() != 5 {
        return Err(invalid(format!(
            "En-passant square must be on rank 3 or 6: {en_passant_part}"
        )));
    }
    Ok(Some(cell))
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    Some((color, PieceKind::from_letter(ch)?))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Cell, Color, PieceKind};
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_game_state(&game_state));

        assert_eq!(game_state.side_to_move, Color::Light);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert!(game_state.grid.active_pieces().all(|p| !p.has_moved()));
    }

    #[test]
    fn derives_moved_flags_from_rights_and_rows() {
        let game_state = parse_fen("r3k2r/8/8/8/8/4P3/8/R3K2R w Kq - 0 20").expect("FEN should parse");
        let piece_at = |column, row| {
            game_state
                .grid
                .piece_at(Cell::new(column, row).expect("cell"))
                .expect("occupied")
        };

        assert!(!piece_at(4, 0).has_moved());
        assert!(!piece_at(7, 0).has_moved());
        assert!(piece_at(0, 0).has_moved());
        assert!(piece_at(7, 7).has_moved());
        assert!(!piece_at(0, 7).has_moved());
        assert_eq!(piece_at(4, 2).kind(), PieceKind::Pawn);
        assert!(piece_at(4, 2).has_moved());
    }

    #[test]
    fn rejects_malformed_fields() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkz - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1",
        ] {
            assert!(
                matches!(parse_fen(fen), Err(ChessError::InvalidFen(_))),
                "{fen} should be rejected"
            );
        }
    }
}
