//! Cell conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and `Cell`
//! values reused by FEN, SAN and the remote-move transport.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Cell;

/// Convert algebraic notation (for example: "e4") to a cell.
#[inline]
pub fn algebraic_to_cell(text: &str) -> ChessResult<Cell> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidNotation(format!(
            "Invalid algebraic square: {text}"
        )));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessError::InvalidNotation(format!(
            "Invalid algebraic file: {}",
            file as char
        )));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidNotation(format!(
            "Invalid algebraic rank: {}",
            rank as char
        )));
    }

    Cell::new(i32::from(file - b'a'), i32::from(rank - b'1'))
}

/// Convert a cell to algebraic notation (for example: "e4").
#[inline]
pub fn cell_to_algebraic(cell: Cell) -> String {
    cell.to_string()
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_cell, cell_to_algebraic};

    #[test]
    fn round_trip_cell_conversions() {
        let a1 = algebraic_to_cell("a1").expect("a1 should parse");
        assert_eq!((a1.column(), a1.row()), (0, 0));
        let h8 = algebraic_to_cell("h8").expect("h8 should parse");
        assert_eq!(h8.index(), 63);
        assert_eq!(cell_to_algebraic(h8), "h8");
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(algebraic_to_cell("i1").is_err());
        assert!(algebraic_to_cell("a9").is_err());
        assert!(algebraic_to_cell("e").is_err());
    }
}
