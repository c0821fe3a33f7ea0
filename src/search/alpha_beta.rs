//! Fixed-depth negamax with alpha-beta pruning.
//!
//! Runs entirely on a private position using simulation-mode execute/undo.
//! Every node passes a checkpoint, and every root move passes the pacing
//! step, so a pause parks the search and a cancel unwinds it promptly.
//! Captures are tried first, most valuable victim by least valuable attacker.

use crate::engines::engine_trait::{EngineError, SearchContext};
use crate::game_state::chess_rules::FIFTY_MOVE_RULE_HALFMOVES;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::move_generation::terminal::{is_insufficient_material, repetition_count};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{BoardScorer, MATE_SCORE};
use crate::tables::piece_square_tables::static_value;

#[derive(Debug, Clone, Default)]
pub struct RootResult {
    /// Every root move that reached the best score.
    pub best_moves: Vec<Move>,
    pub score: i32,
    pub nodes: u64,
}

pub fn search_root(
    game_state: &mut GameState,
    depth: u8,
    scorer: &dyn BoardScorer,
    context: &SearchContext<'_>,
) -> Result<RootResult, EngineError> {
    let side = game_state.side_to_move;
    let mut moves = legal_moves(game_state, side)?;
    order_moves(game_state, &mut moves);

    let mut result = RootResult {
        score: -MATE_SCORE - 1,
        ..RootResult::default()
    };
    let depth = depth.max(1);

    for mv in moves {
        context.pace()?;
        // One below the best so far keeps equal scores exact for tie-breaking.
        let alpha = result.score.saturating_sub(1).max(-MATE_SCORE - 1);
        let undo = apply_move(game_state, &mv)?;
        let searched = negamax(
            game_state,
            depth - 1,
            -MATE_SCORE - 1,
            -alpha,
            1,
            scorer,
            context,
            &mut result.nodes,
        );
        undo_move(game_state, &undo)?;
        let score = -searched?;

        if score > result.score {
            result.score = score;
            result.best_moves.clear();
            result.best_moves.push(mv);
        } else if score == result.score {
            result.best_moves.push(mv);
        }
    }

    context.add_nodes(result.nodes);
    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    game_state: &mut GameState,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: i32,
    scorer: &dyn BoardScorer,
    context: &SearchContext<'_>,
    nodes: &mut u64,
) -> Result<i32, EngineError> {
    context.checkpoint()?;
    *nodes += 1;

    if game_state.halfmove_clock >= FIFTY_MOVE_RULE_HALFMOVES
        || repetition_count(game_state) >= 2
        || is_insufficient_material(&game_state.grid)
    {
        return Ok(0);
    }

    let side = game_state.side_to_move;
    let mut moves = legal_moves(game_state, side)?;
    if moves.is_empty() {
        return Ok(if is_king_in_check(game_state, side) {
            -MATE_SCORE + ply
        } else {
            0
        });
    }
    if depth == 0 {
        return Ok(scorer.score(game_state));
    }

    order_moves(game_state, &mut moves);
    for mv in moves {
        let undo = apply_move(game_state, &mv)?;
        let searched = negamax(
            game_state,
            depth - 1,
            -beta,
            -alpha,
            ply + 1,
            scorer,
            context,
            nodes,
        );
        undo_move(game_state, &undo)?;
        let score = -searched?;

        if score >= beta {
            return Ok(beta);
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(alpha)
}

fn order_moves(game_state: &GameState, moves: &mut [Move]) {
    let grid = &game_state.grid;
    moves.sort_by_cached_key(|mv| {
        let promotion = mv.promotion().map_or(0, static_value);
        let capture = mv.captured.and_then(|c| grid.piece(c.piece)).map_or(0, |victim| {
            let attacker = grid.piece(mv.piece).map_or(0, |p| static_value(p.kind()));
            10 * static_value(victim.kind()) - attacker / 100
        });
        -(capture + promotion)
    });
}

#[cfg(test)]
mod tests {
    use super::search_root;
    use crate::engines::engine_trait::SearchContext;
    use crate::game_state::game_state::GameState;
    use crate::search::board_scoring::{MaterialScorer, PieceSquareScorer, MATE_THRESHOLD};

    #[test]
    fn finds_mate_in_one() {
        let mut game = GameState::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").expect("FEN");
        let before = game.clone();
        let result = search_root(&mut game, 2, &PieceSquareScorer, &SearchContext::unbounded())
            .expect("search runs");
        assert_eq!(result.best_moves.len(), 1);
        assert_eq!(result.best_moves[0].long_algebraic(), "a1a8");
        assert!(result.score > MATE_THRESHOLD);
        assert_eq!(game, before);
    }

    #[test]
    fn takes_a_hanging_queen() {
        let mut game = GameState::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").expect("FEN");
        let result = search_root(&mut game, 1, &MaterialScorer, &SearchContext::unbounded())
            .expect("search runs");
        assert_eq!(result.best_moves[0].long_algebraic(), "d1d5");
        assert_eq!(result.score, 500);
    }

    #[test]
    fn avoids_losing_the_queen_at_depth_two() {
        let mut game = GameState::from_fen("4k3/8/8/3p4/8/8/8/3QK3 w - - 0 1").expect("FEN");
        let result = search_root(&mut game, 2, &MaterialScorer, &SearchContext::unbounded())
            .expect("search runs");
        assert!(result.score >= 900);
    }
}
