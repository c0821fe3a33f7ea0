//! Game-record metadata and the session-scoped round counter.

use chrono::Local;

use crate::move_generation::terminal::GameStatus;
use crate::session::player::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub event: String,
    pub site: String,
    /// `YYYY.MM.DD`.
    pub date: String,
    /// Assigned from `SessionContext` when left empty.
    pub round: Option<String>,
    pub white: String,
    pub black: String,
    /// `1-0`, `0-1`, `1/2-1/2` or `*` while the game runs.
    pub result: String,
    pub difficulty: Option<Difficulty>,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_owned(),
            site: "Local".to_owned(),
            date: Local::now().format("%Y.%m.%d").to_string(),
            round: None,
            white: "White".to_owned(),
            black: "Black".to_owned(),
            result: "*".to_owned(),
            difficulty: None,
        }
    }
}

impl GameRecord {
    pub fn set_result(&mut self, status: GameStatus) {
        self.result = status.result_token().to_owned();
    }

    /// Seven-tag roster in canonical order, plus difficulty when set.
    pub fn tag_pairs(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("Event", self.event.clone()),
            ("Site", self.site.clone()),
            ("Date", self.date.clone()),
            ("Round", self.round.clone().unwrap_or_else(|| "-".to_owned())),
            ("White", self.white.clone()),
            ("Black", self.black.clone()),
            ("Result", self.result.clone()),
        ];
        if let Some(difficulty) = self.difficulty {
            tags.push(("Difficulty", difficulty.to_string()));
        }
        tags
    }
}

/// Round numbering shared by every game played in one session context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    round_counter: u32,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn round_counter(&self) -> u32 {
        self.round_counter
    }

    /// Fills in or adopts `record.round`. An empty round takes the next
    /// number, a numeric round resets the counter to it, and any other text is
    /// kept while the counter still advances.
    pub fn assign_round(&mut self, record: &mut GameRecord) {
        match record.round.as_deref().map(str::trim) {
            None | Some("") => {
                self.round_counter = self.round_counter.saturating_add(1);
                record.round = Some(self.round_counter.to_string());
            }
            Some(text) => match text.parse::<u32>() {
                Ok(number) => self.round_counter = number,
                Err(_) => self.round_counter = self.round_counter.saturating_add(1),
            },
        }
    }
}
