//! Errors used throughout the engine.
//!
//! `ChessError` is the single error type returned by the grid, the execution
//! engine, notation utilities and the session state machine. Rule-level
//! failures (`OutOfRange`, `EmptyOrigin`, `IllegalMove`) are always raised
//! before any mutation, so a caller that receives one can assume the board,
//! game state and history are untouched.

use thiserror::Error;

use crate::game_state::chess_types::{Cell, Color};

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// Cell coordinates outside `[0,7]`.
    #[error("cell ({column}, {row}) is outside the board")]
    OutOfRange { column: i32, row: i32 },

    /// No piece at a move's declared origin.
    #[error("no piece on origin cell {0}")]
    EmptyOrigin(Cell),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// A transport descriptor that cannot be mapped to a legal move.
    #[error("remote move cannot be resolved: {0}")]
    UnresolvableRemoteMove(String),

    #[error("search worker for {side} failed: {message}")]
    WorkerFault { side: Color, message: String },

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    /// Operation not permitted in the session's current phase.
    #[error("operation not valid now: {0}")]
    InvalidPhase(String),

    #[error("it is not {0}'s turn to move")]
    NotYourTurn(Color),

    #[error("transport failure: {0}")]
    Transport(String),

    /// Internal bookkeeping disagreement (grid back-references, undo records).
    #[error("corrupt game state: {0}")]
    CorruptState(String),
}
