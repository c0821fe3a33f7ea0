//! Linear move log with a navigation cursor.
//!
//! Entries before the cursor are applied to the position; entries at or after
//! it are the redo-able future. Recording a brand-new move truncates that
//! future, pausing or stepping never does.

use crate::game_state::chess_types::{Color, UndoState};
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    /// Notation computed when the move was first committed.
    pub san: String,
    pub mover: Color,
    /// Full-move number the move was played on.
    pub fullmove_number: u16,
    pub(crate) undo: UndoState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn can_step_back(&self) -> bool {
        self.cursor > 0
    }

    #[inline]
    pub fn can_step_forward(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Every entry, including the redo-able future.
    #[inline]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries currently applied to the position.
    #[inline]
    pub fn applied(&self) -> &[HistoryEntry] {
        &self.entries[..self.cursor]
    }

    pub fn last_applied(&self) -> Option<&HistoryEntry> {
        self.applied().last()
    }

    /// SAN of the applied moves, in order.
    pub fn san_moves(&self) -> Vec<String> {
        self.applied().iter().map(|entry| entry.san.clone()).collect()
    }

    /// Appends a new entry at the cursor, discarding any future entries.
    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor = self.entries.len();
    }

    /// Entry that a step back would undo.
    pub(crate) fn entry_before_cursor(&self) -> Option<&HistoryEntry> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Entry that a step forward would redo.
    pub(crate) fn entry_at_cursor_mut(&mut self) -> Option<&mut HistoryEntry> {
        self.entries.get_mut(self.cursor)
    }

    pub(crate) fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn advance(&mut self) {
        self.cursor = (self.cursor + 1).min(self.entries.len());
    }
}
