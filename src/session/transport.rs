//! Remote-play transport interface and move re-resolution.
//!
//! Peers exchange moves as coordinate descriptors rather than piece
//! references, so the receiving side re-resolves each descriptor against its
//! own legal moves. The host always plays White and the client Black.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Cell, Color, PieceKind};
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::{Move, MoveKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkRole {
    Host,
    Client,
}

impl NetworkRole {
    #[inline]
    pub fn local_color(self) -> Color {
        match self {
            NetworkRole::Host => Color::Light,
            NetworkRole::Client => Color::Dark,
        }
    }
}

/// Move kind as declared on the wire; castling partners travel implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteMoveKind {
    Simple,
    Capture,
    DoubleAdvance,
    EnPassant,
    CastleKingside,
    CastleQueenside,
    Promotion(PieceKind),
}

impl From<MoveKind> for RemoteMoveKind {
    fn from(kind: MoveKind) -> Self {
        match kind {
            MoveKind::Simple => RemoteMoveKind::Simple,
            MoveKind::Capture => RemoteMoveKind::Capture,
            MoveKind::DoubleAdvance => RemoteMoveKind::DoubleAdvance,
            MoveKind::EnPassant => RemoteMoveKind::EnPassant,
            MoveKind::CastleKingside(_) => RemoteMoveKind::CastleKingside,
            MoveKind::CastleQueenside(_) => RemoteMoveKind::CastleQueenside,
            MoveKind::Promotion(target) => RemoteMoveKind::Promotion(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteMoveDescriptor {
    pub from: Cell,
    pub to: Cell,
    pub kind: RemoteMoveKind,
}

impl RemoteMoveDescriptor {
    pub fn from_move(mv: &Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            kind: mv.kind.into(),
        }
    }

    #[inline]
    fn describes(&self, mv: &Move) -> bool {
        mv.to == self.to && RemoteMoveKind::from(mv.kind) == self.kind
    }
}

impl fmt::Display for RemoteMoveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {:?}", self.from, self.to, self.kind)
    }
}

pub trait MoveTransport: Send {
    /// Sends a locally committed move to the peer.
    fn send_move(&mut self, descriptor: &RemoteMoveDescriptor) -> ChessResult<()>;

    /// Arms the listener for `side`'s next move. Called exactly once per
    /// transition into the remote side's turn.
    fn await_remote_move(&mut self, side: Color) -> ChessResult<()>;

    /// A received descriptor did not map to a legal move; the transport may
    /// request a resync or drop the peer.
    fn report_unresolvable(&mut self, descriptor: &RemoteMoveDescriptor, error: &ChessError);
}

/// Maps a descriptor to a legal move of the side to move.
///
/// The piece on the declared origin is tried first. If that fails (stale
/// origin), every same-color piece whose legal moves reach the destination
/// with the declared kind is considered, and exactly one must match.
pub fn resolve_remote_move(
    game_state: &mut GameState,
    descriptor: &RemoteMoveDescriptor,
) -> ChessResult<Move> {
    let side = game_state.side_to_move;
    let legal = game_state.legal_moves()?;

    let origin_is_ours = game_state
        .grid
        .piece_at(descriptor.from)
        .is_some_and(|p| p.color() == side);
    if origin_is_ours {
        if let Some(mv) = legal
            .iter()
            .find(|mv| mv.from == descriptor.from && descriptor.describes(mv))
        {
            return Ok(*mv);
        }
    }

    let fallback: Vec<&Move> = legal.iter().filter(|mv| descriptor.describes(mv)).collect();
    match fallback.as_slice() {
        [mv] => Ok(**mv),
        [] => Err(ChessError::UnresolvableRemoteMove(format!(
            "{descriptor}: no legal {side} move matches"
        ))),
        many => Err(ChessError::UnresolvableRemoteMove(format!(
            "{descriptor}: {} {side} moves match the destination",
            many.len()
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Sent(RemoteMoveDescriptor),
    Awaiting(Color),
    Unresolvable(RemoteMoveDescriptor),
}

/// In-process transport that records calls; clones share one log. Sending
/// fails once `disconnect` has been called.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<TransportCall>>>,
    disconnected: Arc<Mutex<bool>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn disconnect(&self) {
        *self
            .disconnected
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }

    fn is_disconnected(&self) -> bool {
        *self
            .disconnected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self, call: TransportCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl MoveTransport for RecordingTransport {
    fn send_move(&mut self, descriptor: &RemoteMoveDescriptor) -> ChessResult<()> {
        if self.is_disconnected() {
            return Err(ChessError::Transport("peer disconnected".to_owned()));
        }
        self.log(TransportCall::Sent(*descriptor));
        Ok(())
    }

    fn await_remote_move(&mut self, side: Color) -> ChessResult<()> {
        if self.is_disconnected() {
            return Err(ChessError::Transport("peer disconnected".to_owned()));
        }
        self.log(TransportCall::Awaiting(side));
        Ok(())
    }

    fn report_unresolvable(&mut self, descriptor: &RemoteMoveDescriptor, _error: &ChessError) {
        self.log(TransportCall::Unresolvable(*descriptor));
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_remote_move, NetworkRole, RemoteMoveDescriptor, RemoteMoveKind};
    use crate::errors::ChessError;
    use crate::game_state::chess_types::{Cell, Color};
    use crate::game_state::game_state::GameState;

    fn cell(name: &str) -> Cell {
        crate::utils::algebraic::algebraic_to_cell(name).expect("cell")
    }

    #[test]
    fn host_is_white_client_is_black() {
        assert_eq!(NetworkRole::Host.local_color(), Color::Light);
        assert_eq!(NetworkRole::Client.local_color(), Color::Dark);
    }

    #[test]
    fn resolves_by_origin_then_by_destination() {
        let mut game = GameState::new_game();
        let direct = RemoteMoveDescriptor {
            from: cell("g1"),
            to: cell("f3"),
            kind: RemoteMoveKind::Simple,
        };
        assert_eq!(
            resolve_remote_move(&mut game, &direct).expect("resolves").long_algebraic(),
            "g1f3"
        );

        let stale_origin = RemoteMoveDescriptor {
            from: cell("h3"),
            to: cell("e4"),
            kind: RemoteMoveKind::DoubleAdvance,
        };
        assert_eq!(
            resolve_remote_move(&mut game, &stale_origin)
                .expect("falls back to the e-pawn")
                .long_algebraic(),
            "e2e4"
        );
    }

    #[test]
    fn ambiguous_or_impossible_descriptors_fail_explicitly() {
        let mut game = GameState::new_game();
        let onto_own_pawn = RemoteMoveDescriptor {
            from: cell("h5"),
            to: cell("d2"),
            kind: RemoteMoveKind::Simple,
        };
        assert!(matches!(
            resolve_remote_move(&mut game, &onto_own_pawn),
            Err(ChessError::UnresolvableRemoteMove(_))
        ));

        game.commit_san("d4").expect("d4");
        game.commit_san("Nf6").expect("Nf6");
        let ambiguous = RemoteMoveDescriptor {
            from: cell("h5"),
            to: cell("d2"),
            kind: RemoteMoveKind::Simple,
        };
        assert!(matches!(
            resolve_remote_move(&mut game, &ambiguous),
            Err(ChessError::UnresolvableRemoteMove(_))
        ));

        let wrong_kind = RemoteMoveDescriptor {
            from: cell("e2"),
            to: cell("e4"),
            kind: RemoteMoveKind::Simple,
        };
        assert!(resolve_remote_move(&mut game, &wrong_kind).is_err());
    }
}
