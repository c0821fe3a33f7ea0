//! Fixed-depth alpha-beta engine used for the Easy, Medium and Hard levels.
//!
//! Equal-scoring root moves are broken at random so repeated games vary.

use rand::prelude::IndexedRandom;

use crate::engines::engine_trait::{Engine, EngineError, EngineOutput, GoParams, SearchContext};
use crate::game_state::game_state::GameState;
use crate::search::alpha_beta::search_root;
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer};

pub struct AlphaBetaEngine {
    default_depth: u8,
    scorer: Box<dyn BoardScorer>,
}

impl AlphaBetaEngine {
    pub fn new(default_depth: u8) -> Self {
        Self::with_scorer(default_depth, Box::new(PieceSquareScorer))
    }

    pub fn with_scorer(default_depth: u8, scorer: Box<dyn BoardScorer>) -> Self {
        Self {
            default_depth: default_depth.max(1),
            scorer,
        }
    }
}

impl Engine for AlphaBetaEngine {
    fn name(&self) -> &str {
        "Sparring AlphaBeta"
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
        context: &SearchContext<'_>,
    ) -> Result<EngineOutput, EngineError> {
        let depth = params.depth.unwrap_or(self.default_depth).max(1);
        let mut probe = game_state.snapshot_for_search();
        let result = search_root(&mut probe, depth, self.scorer.as_ref(), context)?;

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string alpha_beta_engine depth {} score {} nodes {} candidates {}",
            depth,
            result.score,
            result.nodes,
            result.best_moves.len()
        ));

        let mut rng = rand::rng();
        out.best_move = result.best_moves.as_slice().choose(&mut rng).copied();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::AlphaBetaEngine;
    use crate::engines::engine_trait::{Engine, EngineError, GoParams, SearchContext};
    use crate::game_state::game_state::GameState;
    use crate::search::threading::SearchControl;

    #[test]
    fn reports_info_and_a_move() {
        let mut engine = AlphaBetaEngine::new(2);
        let game = GameState::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").expect("FEN");
        let out = engine
            .choose_move(&game, &GoParams::default(), &SearchContext::unbounded())
            .expect("engine runs");
        assert_eq!(out.best_move.map(|m| m.long_algebraic()), Some("d1d5".to_owned()));
        assert!(out.info_lines[0].starts_with("info string alpha_beta_engine depth 2"));
    }

    #[test]
    fn cancelled_context_interrupts() {
        let control = SearchControl::new();
        let generation = control.start_search();
        control.cancel_search();
        let mut engine = AlphaBetaEngine::new(3);
        let err = engine
            .choose_move(
                &GameState::new_game(),
                &GoParams::default(),
                &SearchContext::controlled(&control, generation),
            )
            .expect_err("cancelled search fails");
        assert_eq!(err, EngineError::Interrupted);
    }
}
