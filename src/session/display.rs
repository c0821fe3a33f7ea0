//! Display collaborator interface.
//!
//! The session calls these hooks only for committed transitions; legality
//! trials and search look-ahead never reach a display. Every hook has a no-op
//! default so a display implements only what it renders.

use std::sync::{Arc, Mutex, PoisonError};

use crate::game_state::chess_types::Color;
use crate::move_generation::terminal::GameStatus;
use crate::moves::move_descriptions::Move;

pub trait GameDisplay: Send {
    fn move_executed(&mut self, _mv: &Move, _san: &str, _mover: Color) {}
    fn move_undone(&mut self, _mv: &Move) {}
    fn side_to_move_changed(&mut self, _side: Color) {}
    fn game_ended(&mut self, _status: GameStatus, _winner: Option<Color>) {}
    fn move_counter_updated(&mut self, _fullmove_number: u16, _ply: u16) {}
    fn navigation_changed(&mut self, _can_step_back: bool, _can_step_forward: bool) {}
    /// Diagnostic `info string ...` lines.
    fn info_line(&mut self, _line: &str) {}
}

#[derive(Debug, Default)]
pub struct NullDisplay;

impl GameDisplay for NullDisplay {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    MoveExecuted { mv: Move, san: String, mover: Color },
    MoveUndone(Move),
    SideToMove(Color),
    GameEnded { status: GameStatus, winner: Option<Color> },
    MoveCounter { fullmove_number: u16, ply: u16 },
    Navigation { can_step_back: bool, can_step_forward: bool },
    Info(String),
}

/// Records every callback; clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    events: Arc<Mutex<Vec<DisplayEvent>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, event: DisplayEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl GameDisplay for RecordingDisplay {
    fn move_executed(&mut self, mv: &Move, san: &str, mover: Color) {
        self.push(DisplayEvent::MoveExecuted {
            mv: *mv,
            san: san.to_owned(),
            mover,
        });
    }

    fn move_undone(&mut self, mv: &Move) {
        self.push(DisplayEvent::MoveUndone(*mv));
    }

    fn side_to_move_changed(&mut self, side: Color) {
        self.push(DisplayEvent::SideToMove(side));
    }

    fn game_ended(&mut self, status: GameStatus, winner: Option<Color>) {
        self.push(DisplayEvent::GameEnded { status, winner });
    }

    fn move_counter_updated(&mut self, fullmove_number: u16, ply: u16) {
        self.push(DisplayEvent::MoveCounter {
            fullmove_number,
            ply,
        });
    }

    fn navigation_changed(&mut self, can_step_back: bool, can_step_forward: bool) {
        self.push(DisplayEvent::Navigation {
            can_step_back,
            can_step_forward,
        });
    }

    fn info_line(&mut self, line: &str) {
        self.push(DisplayEvent::Info(line.to_owned()));
    }
}
