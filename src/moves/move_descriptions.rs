//! Move representation.
//!
//! A `Move` names the moving piece by arena identity plus its origin and
//! destination. The captured piece carries its own cell because en passant
//! removes a pawn from a cell other than the destination; castling moves carry
//! the rook partner so king and rook relocate in one step.

use std::fmt;

use crate::game_state::chess_types::{Cell, PieceId, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RookTransfer {
    pub rook: PieceId,
    pub from: Cell,
    pub to: Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapturedPiece {
    pub piece: PieceId,
    pub cell: Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Simple,
    Capture,
    DoubleAdvance,
    EnPassant,
    CastleKingside(RookTransfer),
    CastleQueenside(RookTransfer),
    /// Pawn reaching the last rank; may also capture.
    Promotion(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub kind: MoveKind,
    pub piece: PieceId,
    pub from: Cell,
    pub to: Cell,
    pub captured: Option<CapturedPiece>,
}

impl Move {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastleKingside(_) | MoveKind::CastleQueenside(_)
        )
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion(kind) => Some(kind),
            _ => None,
        }
    }

    #[inline]
    pub fn rook_transfer(&self) -> Option<RookTransfer> {
        match self.kind {
            MoveKind::CastleKingside(transfer) | MoveKind::CastleQueenside(transfer) => {
                Some(transfer)
            }
            _ => None,
        }
    }

    /// Long algebraic form (`e2e4`, `e7e8q`), handy for logs.
    pub fn long_algebraic(&self) -> String {
        let mut out = format!("{}{}", self.from, self.to);
        if let Some(kind) = self.promotion() {
            out.push(kind.letter().to_ascii_lowercase());
        }
        out
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.long_algebraic())
    }
}
