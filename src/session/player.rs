//! Who controls each side, and how difficulty maps to engines.

use std::fmt;

use crate::engines::engine_alpha_beta::AlphaBetaEngine;
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::Engine;
use crate::game_state::chess_types::Color;
use crate::search::search_worker::SearchHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// One human side against one AI side.
    ManualVsAi,
    /// Two humans sharing the board.
    ManualOnly,
    /// Local human against a remote peer.
    OnlineMultiplayer,
    /// Two AI workers.
    AiOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Random,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Search depth in plies; zero for the random mover.
    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Random => 0,
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn build_engine(self) -> Box<dyn Engine> {
        match self {
            Difficulty::Random => Box::new(RandomEngine::new()),
            level => Box::new(AlphaBetaEngine::new(level.depth())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Difficulty::Random => "Random",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(text)
    }
}

/// Controller of a side without the worker handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerKind {
    Human,
    Ai,
    Remote,
}

#[derive(Debug)]
pub enum Player {
    Human,
    /// Owns the side's search worker; replaced when the worker terminates.
    Ai(SearchHandle),
    Remote,
}

impl Player {
    #[inline]
    pub fn kind(&self) -> PlayerKind {
        match self {
            Player::Human => PlayerKind::Human,
            Player::Ai(_) => PlayerKind::Ai,
            Player::Remote => PlayerKind::Remote,
        }
    }

    #[inline]
    pub fn is_ai(&self) -> bool {
        matches!(self, Player::Ai(_))
    }

    pub fn search_handle(&self) -> Option<&SearchHandle> {
        match self {
            Player::Ai(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn label(&self, side: Color, difficulty: Difficulty) -> String {
        match self {
            Player::Human => format!("{side} (human)"),
            Player::Ai(_) => format!("{side} (computer, {difficulty})"),
            Player::Remote => format!("{side} (remote)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Difficulty;

    #[test]
    fn difficulty_maps_to_engine_and_depth() {
        assert_eq!(Difficulty::Random.build_engine().name(), "Sparring Random");
        assert_eq!(Difficulty::Hard.build_engine().name(), "Sparring AlphaBeta");
        assert_eq!(Difficulty::Medium.depth(), 2);
    }
}
