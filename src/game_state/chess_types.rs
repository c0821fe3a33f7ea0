//! Core value types shared by every subsystem.
//!
//! Cells, colors, piece kinds, arena piece identities and the compact
//! castling-rights bitmask live here so the grid, move generation, search and
//! session layers agree on one vocabulary.

use std::fmt;

use crate::errors::{ChessError, ChessResult};

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Row delta a pawn of this color advances by.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// Row holding this color's pieces at the start of a game.
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::Light => 1,
            Color::Dark => 6,
        }
    }

    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Light => write!(f, "White"),
            Color::Dark => write!(f, "Black"),
        }
    }
}

/// Piece kind (color is represented separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const PROMOTION_TARGETS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Upper-case letter used by SAN and (for white pieces) FEN.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// One of the 64 board positions, addressed by column (file) and row (rank).
///
/// `Cell { column: 0, row: 0 }` is a1 and `Cell { column: 7, row: 7 }` is h8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    column: u8,
    row: u8,
}

impl Cell {
    /// Checked constructor; coordinates outside `[0,7]` fail with `OutOfRange`.
    pub fn new(column: i32, row: i32) -> ChessResult<Self> {
        if !(0..8).contains(&column) || !(0..8).contains(&row) {
            return Err(ChessError::OutOfRange { column, row });
        }
        Ok(Self {
            column: column as u8,
            row: row as u8,
        })
    }

    /// Constructor for board constants; coordinates are masked into `[0,7]`.
    #[inline]
    pub(crate) const fn from_parts(column: u8, row: u8) -> Self {
        Self {
            column: column & 7,
            row: row & 7,
        }
    }

    /// Cell from a `0..=63` index (`row * 8 + column`).
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= 64 {
            return None;
        }
        Some(Self {
            column: (index % 8) as u8,
            row: (index / 8) as u8,
        })
    }

    #[inline]
    pub const fn column(self) -> u8 {
        self.column
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.column as usize
    }

    /// Neighbouring cell at the given delta, or `None` off the board.
    #[inline]
    pub fn offset(self, d_column: i8, d_row: i8) -> Option<Self> {
        let column = self.column as i8 + d_column;
        let row = self.row as i8 + d_row;
        if (0..8).contains(&column) && (0..8).contains(&row) {
            Some(Self {
                column: column as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    /// Iterator over all 64 cells in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..64).filter_map(Cell::from_index)
    }

    #[inline]
    pub fn file_char(self) -> char {
        char::from(b'a' + self.column)
    }

    #[inline]
    pub fn rank_char(self) -> char {
        char::from(b'1' + self.row)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Stable identity of a piece inside the grid's piece arena.
///
/// Identities survive capture (the arena slot is retained for undo) so history
/// entries and search snapshots can refer to pieces by instance rather than kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Compact castling rights bitmask.
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights = 0b1111;
pub type CastlingRights = u8;

#[inline]
pub const fn kingside_right(color: Color) -> CastlingRights {
    match color {
        Color::Light => CASTLE_LIGHT_KINGSIDE,
        Color::Dark => CASTLE_DARK_KINGSIDE,
    }
}

#[inline]
pub const fn queenside_right(color: Color) -> CastlingRights {
    match color {
        Color::Light => CASTLE_LIGHT_QUEENSIDE,
        Color::Dark => CASTLE_DARK_QUEENSIDE,
    }
}
