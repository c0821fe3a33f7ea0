//! Fixed 8x8 cell storage plus the arena of pieces that occupy it.
//!
//! The grid is the single source of truth for occupancy. Each cell stores at
//! most one `PieceId`; each piece stores its own cell. The two must agree
//! outside an execute/undo in progress, which `check_consistency` verifies.
//! `place` and `vacate` are crate-private so only the execution engine moves
//! pieces; rule code reads through `occupant_at` / `piece_at`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Cell, Color, PieceId, PieceKind};
use crate::game_state::piece::Piece;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionGrid {
    cells: [Option<PieceId>; 64],
    pieces: Vec<Piece>,
}

impl Default for PositionGrid {
    fn default() -> Self {
        Self {
            cells: [None; 64],
            pieces: Vec::with_capacity(32),
        }
    }
}

impl PositionGrid {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Checked cell lookup; fails with `OutOfRange` outside `[0,7]`.
    #[inline]
    pub fn cell_at(&self, column: i32, row: i32) -> ChessResult<Cell> {
        Cell::new(column, row)
    }

    #[inline]
    pub fn occupant_at(&self, cell: Cell) -> Option<PieceId> {
        self.cells[cell.index()]
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index())
    }

    #[inline]
    pub fn piece_at(&self, cell: Cell) -> Option<&Piece> {
        self.occupant_at(cell).and_then(|id| self.piece(id))
    }

    /// Pieces of `color` currently on the board, in arena order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces
            .iter()
            .filter(move |p| p.color == color && !p.is_captured())
    }

    /// All pieces on the board, in arena order.
    pub fn active_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| !p.is_captured())
    }

    pub fn king_of(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color).find(|p| p.kind == PieceKind::King)
    }

    /// Adds a new piece to the arena and places it on `cell`.
    ///
    /// Only position setup (FEN import) creates pieces.
    pub(crate) fn spawn(
        &mut self,
        kind: PieceKind,
        color: Color,
        cell: Cell,
        has_moved: bool,
    ) -> ChessResult<PieceId> {
        if self.cells[cell.index()].is_some() {
            return Err(ChessError::CorruptState(format!(
                "cell {cell} is already occupied"
            )));
        }
        let raw = u16::try_from(self.pieces.len())
            .map_err(|_| ChessError::CorruptState("piece arena overflow".to_owned()))?;
        let id = PieceId(raw);
        self.pieces.push(Piece {
            id,
            kind,
            color,
            cell: Some(cell),
            has_moved,
        });
        self.cells[cell.index()] = Some(id);
        Ok(id)
    }

    /// Puts `id` on `cell`, updating both the cell and the piece back-reference.
    pub(crate) fn place(&mut self, id: PieceId, cell: Cell) {
        self.cells[cell.index()] = Some(id);
        if let Some(piece) = self.pieces.get_mut(id.index()) {
            piece.cell = Some(cell);
        }
    }

    /// Clears `cell` and detaches its occupant, which keeps its arena slot.
    pub(crate) fn vacate(&mut self, cell: Cell) -> Option<PieceId> {
        let id = self.cells[cell.index()].take()?;
        if let Some(piece) = self.pieces.get_mut(id.index()) {
            piece.cell = None;
        }
        Some(id)
    }

    /// Kind and color per cell, the occupancy view used by FEN and repetition keys.
    pub fn occupancy(&self) -> [Option<(Color, PieceKind)>; 64] {
        let mut out = [None; 64];
        for (index, slot) in self.cells.iter().enumerate() {
            if let Some(piece) = slot.and_then(|id| self.piece(id)) {
                out[index] = Some((piece.color, piece.kind));
            }
        }
        out
    }

    /// Verifies cell occupants and piece back-references agree.
    pub fn check_consistency(&self) -> ChessResult<()> {
        for cell in Cell::all() {
            if let Some(id) = self.cells[cell.index()] {
                let piece = self.piece(id).ok_or_else(|| {
                    ChessError::CorruptState(format!("cell {cell} references missing piece"))
                })?;
                if piece.cell != Some(cell) {
                    return Err(ChessError::CorruptState(format!(
                        "cell {cell} holds piece {} whose own cell is {:?}",
                        id.index(),
                        piece.cell
                    )));
                }
            }
        }
        for piece in &self.pieces {
            if let Some(cell) = piece.cell {
                if self.cells[cell.index()] != Some(piece.id) {
                    return Err(ChessError::CorruptState(format!(
                        "piece {} claims {cell} but the cell disagrees",
                        piece.id.index()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PositionGrid;
    use crate::game_state::chess_types::{Cell, Color, PieceKind};

    #[test]
    fn place_and_vacate_keep_back_references_in_sync() {
        let mut grid = PositionGrid::new_empty();
        let e2 = Cell::new(4, 1).expect("e2");
        let e4 = Cell::new(4, 3).expect("e4");
        let id = grid
            .spawn(PieceKind::Pawn, Color::Light, e2, false)
            .expect("spawn on empty cell");

        assert_eq!(grid.vacate(e2), Some(id));
        assert!(grid.piece(id).expect("arena keeps piece").is_captured());
        grid.place(id, e4);

        assert_eq!(grid.occupant_at(e4), Some(id));
        assert_eq!(grid.occupant_at(e2), None);
        grid.check_consistency().expect("grid stays consistent");
    }

    #[test]
    fn cell_at_reports_out_of_range() {
        let grid = PositionGrid::new_empty();
        assert!(grid.cell_at(3, 8).is_err());
        assert!(grid.cell_at(0, 0).is_ok());
    }

    #[test]
    fn spawn_refuses_occupied_cell() {
        let mut grid = PositionGrid::new_empty();
        let d1 = Cell::new(3, 0).expect("d1");
        grid.spawn(PieceKind::Queen, Color::Light, d1, false)
            .expect("first spawn");
        assert!(grid.spawn(PieceKind::King, Color::Light, d1, false).is_err());
    }
}
