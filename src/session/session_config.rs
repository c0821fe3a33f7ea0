//! Session configuration, constructed in code.

use std::time::Duration;

use crate::game_state::chess_types::Color;
use crate::search::search_worker::SearchConfig;
use crate::session::game_record::GameRecord;
use crate::session::player::{Difficulty, GameMode};
use crate::session::transport::NetworkRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: GameMode,
    /// Human side in `ManualVsAi`; ignored by the other modes.
    pub human_color: Color,
    pub difficulty: Difficulty,
    pub step_delay: Duration,
    /// Starting position; the standard one when `None`.
    pub start_fen: Option<String>,
    /// SAN moves replayed from the starting position before play begins.
    pub replay_san: Vec<String>,
    pub record: GameRecord,
    /// Required for `OnlineMultiplayer`.
    pub network_role: Option<NetworkRole>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::ManualVsAi,
            human_color: Color::Light,
            difficulty: Difficulty::Medium,
            step_delay: Duration::ZERO,
            start_fen: None,
            replay_san: Vec::new(),
            record: GameRecord::default(),
            network_role: None,
        }
    }
}

impl SessionConfig {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.difficulty.depth().max(1),
            step_delay: self.step_delay,
        }
    }
}
