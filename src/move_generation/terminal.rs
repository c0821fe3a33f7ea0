//! Terminal-condition detection.
//!
//! Evaluated after every committed move, in order: no legal moves (mate or
//! stalemate), insufficient material, threefold repetition, fifty-move rule,
//! then check versus ongoing.

use std::fmt;

use crate::errors::ChessResult;
use crate::game_state::chess_rules::{FIFTY_MOVE_RULE_HALFMOVES, REPETITION_DRAW_COUNT};
use crate::game_state::chess_types::{Cell, Color, PieceKind};
use crate::game_state::game_state::GameState;
use crate::game_state::position_grid::PositionGrid;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    /// Side to move is in check but has moves.
    Check,
    Checkmate { winner: Color },
    Stalemate,
    DrawByRepetition,
    DrawByInsufficientMaterial,
    DrawByFiftyMoves,
    Resigned { winner: Color },
    Disconnected,
}

impl GameStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } | GameStatus::Resigned { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawByRepetition
                | GameStatus::DrawByInsufficientMaterial
                | GameStatus::DrawByFiftyMoves
        )
    }

    /// Game-record result token: `1-0`, `0-1`, `1/2-1/2` or `*`.
    pub fn result_token(self) -> &'static str {
        match self.winner() {
            Some(Color::Light) => "1-0",
            Some(Color::Dark) => "0-1",
            None if self.is_draw() => "1/2-1/2",
            None => "*",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawByRepetition => write!(f, "draw by threefold repetition"),
            GameStatus::DrawByInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameStatus::DrawByFiftyMoves => write!(f, "draw by fifty-move rule"),
            GameStatus::Resigned { winner } => write!(f, "resignation, {winner} wins"),
            GameStatus::Disconnected => write!(f, "opponent disconnected"),
        }
    }
}

pub fn evaluate_status(game_state: &mut GameState) -> ChessResult<GameStatus> {
    let side = game_state.side_to_move;
    let in_check = is_king_in_check(game_state, side);

    if !has_legal_move(game_state, side)? {
        return Ok(if in_check {
            GameStatus::Checkmate {
                winner: side.opposite(),
            }
        } else {
            GameStatus::Stalemate
        });
    }
    if is_insufficient_material(&game_state.grid) {
        return Ok(GameStatus::DrawByInsufficientMaterial);
    }
    if repetition_count(game_state) >= REPETITION_DRAW_COUNT {
        return Ok(GameStatus::DrawByRepetition);
    }
    if game_state.halfmove_clock >= FIFTY_MOVE_RULE_HALFMOVES {
        return Ok(GameStatus::DrawByFiftyMoves);
    }

    Ok(if in_check {
        GameStatus::Check
    } else {
        GameStatus::Ongoing
    })
}

/// Neither side can mate: bare kings, a single minor piece, or only bishops
/// that all stand on one square color.
pub fn is_insufficient_material(grid: &PositionGrid) -> bool {
    let mut minors = 0usize;
    let mut bishop_square_colors = [false; 2];
    let mut knights = 0usize;

    for piece in grid.active_pieces() {
        match piece.kind() {
            PieceKind::King => {}
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => {
                knights += 1;
                minors += 1;
            }
            PieceKind::Bishop => {
                minors += 1;
                if let Some(cell) = piece.cell() {
                    bishop_square_colors[square_color(cell)] = true;
                }
            }
        }
    }

    if minors <= 1 {
        return true;
    }
    knights == 0 && !(bishop_square_colors[0] && bishop_square_colors[1])
}

/// Occurrences of the current position among every position reached so far.
pub fn repetition_count(game_state: &GameState) -> usize {
    let current = game_state.position_key();
    game_state
        .repetition_history
        .iter()
        .filter(|key| **key == current)
        .count()
}

#[inline]
fn square_color(cell: Cell) -> usize {
    usize::from((cell.column() + cell.row()) % 2)
}

#[cfg(test)]
mod tests {
    use super::{evaluate_status, is_insufficient_material, GameStatus};
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;

    fn status_of(fen: &str) -> GameStatus {
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        evaluate_status(&mut game).expect("status")
    }

    #[test]
    fn detects_mate_and_stalemate() {
        assert_eq!(
            status_of("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"),
            GameStatus::Checkmate {
                winner: Color::Dark
            }
        );
        assert_eq!(status_of("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), GameStatus::Stalemate);
        assert_eq!(status_of("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1"), GameStatus::Check);
    }

    #[test]
    fn insufficient_material_cases() {
        let grid_of = |fen: &str| GameState::from_fen(fen).expect("FEN should parse").grid;
        assert!(is_insufficient_material(&grid_of("4k3/8/8/8/8/8/8/4K3 w - - 0 1")));
        assert!(is_insufficient_material(&grid_of("4k3/8/8/8/8/8/8/4KN2 w - - 0 1")));
        assert!(is_insufficient_material(&grid_of("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1")));
        assert!(!is_insufficient_material(&grid_of("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1")));
        assert!(!is_insufficient_material(&grid_of("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1")));
    }

    #[test]
    fn fifty_move_clock_draws() {
        assert_eq!(
            status_of("4k3/8/8/8/8/8/4R3/4K3 b - - 100 80"),
            GameStatus::DrawByFiftyMoves
        );
    }

    #[test]
    fn knight_shuffle_repeats_threefold() {
        let mut game = GameState::new_game();
        for san in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1"] {
            game.commit_san(san).expect("shuffle");
            assert!(!game.is_game_over());
        }
        game.commit_san("Ng8").expect("final shuffle");
        assert_eq!(game.status, GameStatus::DrawByRepetition);
        assert_eq!(game.status.result_token(), "1/2-1/2");
    }
}
