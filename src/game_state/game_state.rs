//! Core position model.
//!
//! `GameState` owns the position grid, turn and rule flags, clocks, the
//! repetition keys of every position reached, and the committed move history.
//! Raw execute/undo lives in `move_generation::legal_move_apply`; this module
//! layers the committing operations (`commit_move`, `step_back`,
//! `step_forward`) on top, each of which validates before it mutates.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::history::{History, HistoryEntry};
use crate::game_state::position_grid::PositionGrid;
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::move_generation::terminal::{evaluate_status, GameStatus};
use crate::moves::move_descriptions::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::san::{move_to_san, san_to_move};

/// Exact position identity used for repetition counting: occupancy, side to
/// move, castling rights and en-passant target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub occupancy: [Option<(Color, PieceKind)>; 64],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub grid: PositionGrid,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Cell>,
    pub status: GameStatus,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // --- Search / repetition support ---
    pub ply: u16,
    pub repetition_history: Vec<PositionKey>,

    pub history: History,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            grid: PositionGrid::new_empty(),

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_target: None,
            status: GameStatus::Ongoing,

            halfmove_clock: 0,
            fullmove_number: 1,

            ply: 0,
            repetition_history: Vec::new(),

            history: History::new(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    pub fn position_key(&self) -> PositionKey {
        PositionKey {
            occupancy: self.grid.occupancy(),
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
        }
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&mut self) -> ChessResult<Vec<Move>> {
        let side = self.side_to_move;
        legal_moves(self, side)
    }

    /// Private copy for look-ahead; history is dropped since search never needs it.
    pub fn snapshot_for_search(&self) -> GameState {
        GameState {
            grid: self.grid.clone(),
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
            status: self.status,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            ply: self.ply,
            repetition_history: self.repetition_history.clone(),
            history: History::new(),
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Recomputes `status` from the current position.
    pub fn refresh_status(&mut self) -> ChessResult<GameStatus> {
        self.status = evaluate_status(self)?;
        Ok(self.status)
    }

    /// Overrides the status with an outcome the position cannot express
    /// (resignation, disconnection).
    pub fn mark_ended(&mut self, status: GameStatus) {
        self.status = status;
    }

    /// Validates `mv` against the legal moves of the side to move, executes it,
    /// records it in history (truncating any redo-able future) and refreshes
    /// the status.
    pub fn commit_move(&mut self, mv: &Move) -> ChessResult<&HistoryEntry> {
        if self.is_game_over() {
            return Err(ChessError::IllegalMove(format!(
                "{mv}: game already ended ({})",
                self.status
            )));
        }
        let mover = self
            .grid
            .piece_at(mv.from)
            .ok_or(ChessError::EmptyOrigin(mv.from))?;
        if mover.color() != self.side_to_move {
            return Err(ChessError::NotYourTurn(mover.color()));
        }
        let mover_color = mover.color();

        let legal = self.legal_moves()?;
        if !legal.contains(mv) {
            return Err(ChessError::IllegalMove(format!(
                "{mv} is not legal in {}",
                self.get_fen()
            )));
        }

        let san = move_to_san(self, mv)?;
        let fullmove_number = self.fullmove_number;
        let undo = apply_move(self, mv)?;
        self.history.record(HistoryEntry {
            mv: *mv,
            san,
            mover: mover_color,
            fullmove_number,
            undo,
        });
        self.refresh_status()?;

        self.history
            .last_applied()
            .ok_or_else(|| ChessError::CorruptState("recorded entry missing".to_owned()))
    }

    /// Resolves a SAN token against the legal moves and commits it.
    pub fn commit_san(&mut self, san: &str) -> ChessResult<Move> {
        let mv = san_to_move(self, san)?;
        self.commit_move(&mv)?;
        Ok(mv)
    }

    /// Undoes the entry before the history cursor. `Ok(None)` at the start.
    pub fn step_back(&mut self) -> ChessResult<Option<Move>> {
        let Some(entry) = self.history.entry_before_cursor() else {
            return Ok(None);
        };
        let undo = entry.undo.clone();
        undo_move(self, &undo)?;
        self.history.retreat();
        self.refresh_status()?;
        Ok(Some(undo.mv))
    }

    /// Re-executes the recorded entry at the history cursor. `Ok(None)` at the end.
    pub fn step_forward(&mut self) -> ChessResult<Option<Move>> {
        let Some(mv) = self.history.entry_at_cursor_mut().map(|entry| entry.mv) else {
            return Ok(None);
        };
        let undo = apply_move(self, &mv)?;
        if let Some(entry) = self.history.entry_at_cursor_mut() {
            entry.undo = undo;
        }
        self.history.advance();
        self.refresh_status()?;
        Ok(Some(mv))
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Cell, Color};
    use crate::move_generation::terminal::GameStatus;

    #[test]
    fn new_game_matches_starting_fen() {
        let game = GameState::new_game();
        assert_eq!(game.get_fen(), STARTING_POSITION_FEN);
        assert_eq!(game.side_to_move, Color::Light);
        assert_eq!(game.grid.active_pieces().count(), 32);
        assert_eq!(game.repetition_history.len(), 1);
        game.grid.check_consistency().expect("fresh grid is consistent");
    }

    #[test]
    fn commit_records_san_and_flips_turn() {
        let mut game = GameState::new_game();
        game.commit_san("Nc3").expect("Nc3 is legal");
        let entry = game.history.last_applied().expect("entry recorded");
        assert_eq!(entry.san, "Nc3");
        assert_eq!(entry.mover, Color::Light);
        assert_eq!(game.side_to_move, Color::Dark);
        assert_eq!(game.status, GameStatus::Ongoing);
    }

    #[test]
    fn commit_rejects_wrong_side_and_illegal_moves_without_mutation() {
        let mut game = GameState::new_game();
        let black_reply = {
            let mut probe = GameState::new_game();
            probe.commit_san("e4").expect("e4");
            probe.commit_san("e5").expect("e5");
            probe.history.last_applied().expect("e5 entry").mv
        };
        let before = game.clone();
        assert!(matches!(
            game.commit_move(&black_reply),
            Err(ChessError::NotYourTurn(Color::Dark))
        ));
        assert_eq!(game, before);

        let mut bogus = game.legal_moves().expect("legal moves")[0];
        bogus.to = Cell::new(4, 4).expect("e5");
        assert!(matches!(game.commit_move(&bogus), Err(ChessError::IllegalMove(_))));
        assert_eq!(game, before);
    }

    #[test]
    fn new_move_after_step_back_truncates_future() {
        let mut game = GameState::new_game();
        for san in ["e4", "e5", "Nf3"] {
            game.commit_san(san).expect("opening move");
        }
        game.step_back().expect("step back");
        assert_eq!(game.history.len(), 3);
        assert!(game.history.can_step_forward());

        game.commit_san("Nc3").expect("alternative move");
        assert_eq!(game.history.len(), 3);
        assert!(!game.history.can_step_forward());
        assert_eq!(game.history.san_moves(), vec!["e4", "e5", "Nc3"]);
    }

    #[test]
    fn stepping_to_start_and_back_is_idempotent() {
        let mut game = GameState::new_game();
        for san in ["e4", "d5", "exd5", "Qxd5", "Nc3", "Qa5", "d4", "c6"] {
            game.commit_san(san).expect("scandinavian line");
        }
        let end_fen = game.get_fen();
        let end_grid = game.grid.clone();

        while game.step_back().expect("step back").is_some() {}
        assert_eq!(game.get_fen(), STARTING_POSITION_FEN);
        assert_eq!(game.history.cursor(), 0);

        game.step_forward().expect("forward");
        game.step_forward().expect("forward");
        game.step_back().expect("back");
        while game.step_forward().expect("step forward").is_some() {}

        assert_eq!(game.get_fen(), end_fen);
        assert_eq!(game.grid, end_grid);
    }
}
