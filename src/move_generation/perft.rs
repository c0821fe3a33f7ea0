//! Perft node counting over execute/undo.
//!
//! Walks the legal-move tree in place, so any asymmetry between execute and
//! undo shows up as a wrong count. Leaf statistics follow the usual perft
//! tables (captures, en passant, castles, promotions, checks, mates).

use std::thread;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{has_legal_move, legal_moves};
use crate::moves::move_descriptions::{Move, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(game_state: &mut GameState, depth: u8) -> ChessResult<PerftCounts> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(game_state, depth, &mut total)?;
    Ok(total)
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> ChessResult<Vec<(Move, usize)>> {
    let side = game_state.side_to_move;
    let mut out = Vec::new();
    for mv in legal_moves(game_state, side)? {
        let undo = apply_move(game_state, &mv)?;
        let counts = perft(game_state, depth.saturating_sub(1))?;
        undo_move(game_state, &undo)?;
        out.push((mv, counts.nodes));
    }
    Ok(out)
}

/// Splits the root moves across scoped threads, one private snapshot each.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> ChessResult<PerftCounts> {
    if depth <= 1 {
        return perft(&mut game_state.snapshot_for_search(), depth);
    }

    let mut root = game_state.snapshot_for_search();
    let side = root.side_to_move;
    let root_moves = legal_moves(&mut root, side)?;

    let results: Vec<ChessResult<PerftCounts>> = thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .iter()
            .map(|mv| {
                let mut local = root.clone();
                scope.spawn(move || {
                    apply_move(&mut local, mv)?;
                    perft(&mut local, depth - 1)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(ChessError::CorruptState("perft worker thread panicked".to_owned()))
                })
            })
            .collect()
    });

    let mut total = PerftCounts::default();
    for result in results {
        total.merge(result?);
    }
    Ok(total)
}

fn perft_recurse(game_state: &mut GameState, depth: u8, counts: &mut PerftCounts) -> ChessResult<()> {
    let side = game_state.side_to_move;
    for mv in legal_moves(game_state, side)? {
        let undo = apply_move(game_state, &mv)?;
        if depth == 1 {
            tally_leaf(game_state, &mv, side.opposite(), counts)?;
        } else {
            perft_recurse(game_state, depth - 1, counts)?;
        }
        undo_move(game_state, &undo)?;
    }
    Ok(())
}

fn tally_leaf(
    game_state: &mut GameState,
    mv: &Move,
    defender: Color,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    counts.nodes += 1;
    if mv.is_capture() {
        counts.captures += 1;
    }
    match mv.kind {
        MoveKind::EnPassant => counts.en_passant += 1,
        MoveKind::CastleKingside(_) | MoveKind::CastleQueenside(_) => counts.castles += 1,
        MoveKind::Promotion(_) => counts.promotions += 1,
        _ => {}
    }
    if is_king_in_check(game_state, defender) {
        counts.checks += 1;
        if !has_legal_move(game_state, defender)? {
            counts.checkmates += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_divide, perft_multi_threaded, PerftCounts};
    use crate::game_state::game_state::GameState;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let mut game = GameState::new_game();
        let counts = perft(&mut game, 0).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn kiwipete_depth_one_leaf_metrics() {
        let mut game = GameState::from_fen(KIWIPETE).expect("kiwipete should parse");
        let before = game.clone();
        let counts = perft(&mut game, 1).expect("perft should run");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 48,
                captures: 8,
                en_passant: 0,
                castles: 2,
                promotions: 0,
                checks: 0,
                checkmates: 0,
            }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn divide_sums_to_total_and_threads_agree() {
        let mut game = GameState::new_game();
        let divided = perft_divide(&mut game, 2).expect("divide should run");
        assert_eq!(divided.len(), 20);
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<usize>(), 400);
        let threaded = perft_multi_threaded(&game, 2).expect("threaded perft should run");
        assert_eq!(threaded.nodes, 400);
    }
}
