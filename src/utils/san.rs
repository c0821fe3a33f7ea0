//! Standard Algebraic Notation for moves.
//!
//! `move_to_san` renders a legal move the way game records write it,
//! including disambiguation and the check/mate suffix (found by simulating the
//! move). `san_to_move` resolves a token back to exactly one legal move.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Cell, PieceKind};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::simulate;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{has_legal_move, legal_moves};
use crate::moves::move_descriptions::{Move, MoveKind};
use crate::utils::algebraic::algebraic_to_cell;

fn invalid(message: impl Into<String>) -> ChessError {
    ChessError::InvalidNotation(message.into())
}

/// SAN for `mv`, which must be legal for the piece standing on its origin.
pub fn move_to_san(game_state: &mut GameState, mv: &Move) -> ChessResult<String> {
    let mover = game_state
        .grid
        .piece_at(mv.from)
        .ok_or(ChessError::EmptyOrigin(mv.from))?;
    let (color, kind) = (mover.color(), mover.kind());

    let mut out = String::new();
    match mv.kind {
        MoveKind::CastleKingside(_) => out.push_str("O-O"),
        MoveKind::CastleQueenside(_) => out.push_str("O-O-O"),
        _ if kind == PieceKind::Pawn => {
            if mv.is_capture() {
                out.push(mv.from.file_char());
                out.push('x');
            }
            out.push_str(&mv.to.to_string());
            if let Some(target) = mv.promotion() {
                out.push('=');
                out.push(target.letter());
            }
        }
        _ => {
            out.push(kind.letter());
            let rivals: Vec<Cell> = legal_moves(game_state, color)?
                .into_iter()
                .filter(|other| other.to == mv.to && other.from != mv.from)
                .filter(|other| {
                    game_state
                        .grid
                        .piece(other.piece)
                        .is_some_and(|p| p.kind() == kind)
                })
                .map(|other| other.from)
                .collect();
            if !rivals.is_empty() {
                let shares_file = rivals.iter().any(|c| c.column() == mv.from.column());
                let shares_rank = rivals.iter().any(|c| c.row() == mv.from.row());
                if !shares_file {
                    out.push(mv.from.file_char());
                } else if !shares_rank {
                    out.push(mv.from.rank_char());
                } else {
                    out.push(mv.from.file_char());
                    out.push(mv.from.rank_char());
                }
            }
            if mv.is_capture() {
                out.push('x');
            }
            out.push_str(&mv.to.to_string());
        }
    }

    let opponent = color.opposite();
    let suffix = simulate(game_state, mv, |next| -> ChessResult<Option<char>> {
        if !is_king_in_check(next, opponent) {
            return Ok(None);
        }
        Ok(Some(if has_legal_move(next, opponent)? { '+' } else { '#' }))
    })??;
    if let Some(suffix) = suffix {
        out.push(suffix);
    }

    Ok(out)
}

/// Resolves a SAN token for the side to move. Check and annotation suffixes
/// (`+ # ! ?`) are ignored; `0-0` is accepted for `O-O`.
pub fn san_to_move(game_state: &mut GameState, san: &str) -> ChessResult<Move> {
    let token = trim_annotation_suffix(san.trim());
    if token.is_empty() {
        return Err(invalid("empty SAN token"));
    }

    let side = game_state.side_to_move;
    let legal = legal_moves(game_state, side)?;

    let castle = match token {
        "O-O" | "0-0" => Some(true),
        "O-O-O" | "0-0-0" => Some(false),
        _ => None,
    };
    if let Some(kingside) = castle {
        return legal
            .into_iter()
            .find(|mv| match mv.kind {
                MoveKind::CastleKingside(_) => kingside,
                MoveKind::CastleQueenside(_) => !kingside,
                _ => false,
            })
            .ok_or_else(|| invalid(format!("{san}: castling is not legal here")));
    }

    let pattern = SanPattern::parse(token)?;
    let matches: Vec<Move> = legal
        .into_iter()
        .filter(|mv| pattern.matches(game_state, mv))
        .collect();

    match matches.as_slice() {
        [mv] => Ok(*mv),
        [] => Err(invalid(format!("{san}: no legal move matches"))),
        _ => Err(invalid(format!("{san}: ambiguous, {} legal moves match", matches.len()))),
    }
}

pub fn trim_annotation_suffix(token: &str) -> &str {
    token.trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
}

struct SanPattern {
    kind: PieceKind,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    capture: bool,
    to: Cell,
    promotion: Option<PieceKind>,
}

impl SanPattern {
    fn parse(token: &str) -> ChessResult<Self> {
        let mut body = token;

        let mut promotion = None;
        if let Some((head, target)) = body.split_once('=') {
            promotion = Some(parse_promotion(target, token)?);
            body = head;
        } else if let Some(last) = body.chars().last().filter(|c| c.is_ascii_uppercase()) {
            promotion = Some(parse_promotion(&last.to_string(), token)?);
            body = &body[..body.len() - 1];
        }

        let (kind, rest) = match body.chars().next() {
            Some(ch) if ch.is_ascii_uppercase() => (
                PieceKind::from_letter(ch)
                    .filter(|k| *k != PieceKind::Pawn)
                    .ok_or_else(|| invalid(format!("{token}: unknown piece letter {ch}")))?,
                &body[1..],
            ),
            Some(_) => (PieceKind::Pawn, body),
            None => return Err(invalid(format!("{token}: missing destination"))),
        };

        if rest.len() < 2 || !rest.is_char_boundary(rest.len() - 2) {
            return Err(invalid(format!("{token}: missing destination")));
        }
        let (qualifiers, destination) = rest.split_at(rest.len() - 2);
        let to = algebraic_to_cell(destination)
            .map_err(|_| invalid(format!("{token}: bad destination {destination}")))?;

        let mut pattern = SanPattern {
            kind,
            from_file: None,
            from_rank: None,
            capture: false,
            to,
            promotion,
        };
        for ch in qualifiers.chars() {
            match ch {
                'a'..='h' => pattern.from_file = Some(ch as u8 - b'a'),
                '1'..='8' => pattern.from_rank = Some(ch as u8 - b'1'),
                'x' | ':' => pattern.capture = true,
                _ => return Err(invalid(format!("{token}: unexpected character {ch}"))),
            }
        }
        if promotion.is_some() && kind != PieceKind::Pawn {
            return Err(invalid(format!("{token}: only pawns promote")));
        }
        Ok(pattern)
    }

    fn matches(&self, game_state: &GameState, mv: &Move) -> bool {
        let Some(mover) = game_state.grid.piece(mv.piece) else {
            return false;
        };
        mover.kind() == self.kind
            && !mv.is_castle()
            && mv.to == self.to
            && mv.promotion() == self.promotion
            && (!self.capture || mv.is_capture())
            && self.from_file.map_or(true, |f| f == mv.from.column())
            && self.from_rank.map_or(true, |r| r == mv.from.row())
    }
}

fn parse_promotion(text: &str, token: &str) -> ChessResult<PieceKind> {
    let mut chars = text.chars();
    match (chars.next().and_then(PieceKind::from_letter), chars.next()) {
        (Some(kind), None) if PieceKind::PROMOTION_TARGETS.contains(&kind) => Ok(kind),
        _ => Err(invalid(format!("{token}: bad promotion target {text}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::{move_to_san, san_to_move};
    use crate::errors::ChessError;
    use crate::game_state::game_state::GameState;

    fn san_of(fen: &str, lan: &str) -> String {
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        let mv = game
            .legal_moves()
            .expect("moves")
            .into_iter()
            .find(|m| m.long_algebraic() == lan)
            .unwrap_or_else(|| panic!("{lan} should be legal"));
        move_to_san(&mut game, &mv).expect("san")
    }

    #[test]
    fn renders_pieces_pawns_and_castling() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(san_of(start, "b1c3"), "Nc3");
        assert_eq!(san_of(start, "e2e4"), "e4");
        assert_eq!(san_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1"), "O-O-O");
        assert_eq!(san_of("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1", "b7b8q"), "b8=Q+");
    }

    #[test]
    fn disambiguates_by_file_then_rank() {
        assert_eq!(san_of("4k3/8/8/8/8/8/4K3/R6R w - - 0 1", "a1d1"), "Rad1");
        assert_eq!(san_of("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1", "a1a3"), "R1a3");
        assert_eq!(
            san_of("4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1", "a1b2"),
            "Qa1b2"
        );
    }

    #[test]
    fn marks_mate() {
        assert_eq!(
            san_of("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8"),
            "Ra8#"
        );
    }

    #[test]
    fn parses_tokens_back_to_moves() {
        let mut game = GameState::new_game();
        for san in ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "0-0", "Nf6"] {
            game.commit_san(san).expect("italian line");
        }
        let mv = san_to_move(&mut game, "d4!?").expect("d4 resolves");
        assert_eq!(mv.long_algebraic(), "d2d4");

        assert!(matches!(
            san_to_move(&mut game, "Nc3d5"),
            Err(ChessError::InvalidNotation(_))
        ));
        assert!(matches!(
            san_to_move(&mut game, "Qh5xh7"),
            Err(ChessError::InvalidNotation(_))
        ));
    }

    #[test]
    fn ambiguous_tokens_are_rejected() {
        let mut game =
            GameState::from_fen("4k3/8/8/8/8/8/4K3/R6R w - - 0 1").expect("FEN should parse");
        assert!(matches!(
            san_to_move(&mut game, "Rd1"),
            Err(ChessError::InvalidNotation(_))
        ));
        assert_eq!(
            san_to_move(&mut game, "Rhf1").expect("disambiguated").long_algebraic(),
            "h1f1"
        );
        let mut promo = GameState::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").expect("FEN");
        assert_eq!(
            san_to_move(&mut promo, "b8N").expect("knight promotion").long_algebraic(),
            "b7b8n"
        );
    }
}
