//! Random-move engine.
//!
//! Selects uniformly from legal moves and is used for the lowest difficulty,
//! diagnostics and integration testing.

use rand::prelude::IndexedRandom;

use crate::engines::engine_trait::{Engine, EngineError, EngineOutput, GoParams, SearchContext};
use crate::game_state::game_state::GameState;

#[derive(Debug, Default)]
pub struct RandomEngine;

impl RandomEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Sparring Random"
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
        context: &SearchContext<'_>,
    ) -> Result<EngineOutput, EngineError> {
        context.pace()?;
        let mut probe = game_state.snapshot_for_search();
        let legal_moves = probe.legal_moves()?;
        context.add_nodes(legal_moves.len() as u64);

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));

        if let Some(depth) = params.depth {
            out.info_lines.push(format!(
                "info string random_engine requested_depth {}",
                depth
            ));
        }

        if legal_moves.is_empty() {
            out.best_move = None;
            return Ok(out);
        }

        let mut rng = rand::rng();
        let picked = legal_moves
            .as_slice()
            .choose(&mut rng)
            .ok_or_else(|| EngineError::Failed("failed to choose a random move".to_owned()))?;

        context.checkpoint()?;
        out.best_move = Some(*picked);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::RandomEngine;
    use crate::engines::engine_trait::{Engine, GoParams, SearchContext};
    use crate::game_state::game_state::GameState;

    #[test]
    fn picks_a_legal_move_or_none() {
        let mut engine = RandomEngine::new();
        let mut game = GameState::new_game();
        let out = engine
            .choose_move(&game, &GoParams::default(), &SearchContext::unbounded())
            .expect("engine runs");
        let picked = out.best_move.expect("start position has moves");
        assert!(game.legal_moves().expect("moves").contains(&picked));

        let mated = GameState::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").expect("FEN");
        let out = engine
            .choose_move(&mated, &GoParams::default(), &SearchContext::unbounded())
            .expect("engine runs");
        assert_eq!(out.best_move, None);
    }
}
