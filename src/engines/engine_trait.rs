//! Engine abstraction layer used by the search worker.
//!
//! Defines common input parameters and output payloads so different engine
//! strategies can be selected at runtime behind a single trait interface.

use thiserror::Error;

use crate::errors::ChessError;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;
use crate::search::threading::{SearchControl, SearchInterrupt};

#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub depth: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// `None` when the side to move has no legal move.
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Stopped, cancelled or superseded; the search produced no result.
    #[error("search interrupted")]
    Interrupted,
    #[error(transparent)]
    Rules(#[from] ChessError),
    #[error("{0}")]
    Failed(String),
}

impl From<SearchInterrupt> for EngineError {
    fn from(_: SearchInterrupt) -> Self {
        EngineError::Interrupted
    }
}

/// Cooperative cancellation handle threaded through a search.
///
/// Without a control the search runs unthrottled and uninterruptible, which is
/// what direct callers and tests want.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    control: Option<&'a SearchControl>,
    generation: u64,
}

impl<'a> SearchContext<'a> {
    pub fn unbounded() -> Self {
        Self {
            control: None,
            generation: 0,
        }
    }

    pub fn controlled(control: &'a SearchControl, generation: u64) -> Self {
        Self {
            control: Some(control),
            generation,
        }
    }

    /// Between-node check: parks while paused, fails once cancelled.
    #[inline]
    pub fn checkpoint(&self) -> Result<(), EngineError> {
        match self.control {
            Some(control) => Ok(control.checkpoint(self.generation)?),
            None => Ok(()),
        }
    }

    /// Between-root-move step: applies the configured step delay.
    #[inline]
    pub fn pace(&self) -> Result<(), EngineError> {
        match self.control {
            Some(control) => Ok(control.pace(self.generation)?),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn add_nodes(&self, n: u64) {
        if let Some(control) = self.control {
            control.add_nodes(n);
        }
    }
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
        context: &SearchContext<'_>,
    ) -> Result<EngineOutput, EngineError>;
}
