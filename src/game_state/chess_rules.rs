//! Canonical chess-rule constants.
//!
//! Static rule literals shared by position setup, draw detection and the
//! game session.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-moves without a capture or pawn move that end the game in a draw.
pub const FIFTY_MOVE_RULE_HALFMOVES: u16 = 100;

/// Occurrences of the same position that end the game in a draw.
pub const REPETITION_DRAW_COUNT: usize = 3;
