use extract::Table;
use serde::{Deserialize, Serialize};

/// One loaded per-record table, tagged with the file it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTable {
    pub file_name: String,
    pub table: Table,
}

/// A user-triggered transition.
#[derive(Debug, Clone)]
pub enum ReviewAction {
    /// Move back one record; no-op at the first record.
    Previous,
    /// Move forward one record; permitted only once the current record has
    /// been saved, and never past the last record.
    Next,
    /// Replace the current table with an edited version. Leaves completion
    /// flags untouched; nothing persists until a save.
    Edit(Table),
    /// Record that the current table was appended to the cumulative output,
    /// then advance unless already at the last record. The append itself is
    /// the caller's side effect, performed before this transition.
    MarkSaved,
}

/// The entire mutable state of one review session: the loaded tables, a
/// cursor, and a parallel completion flag per table.
///
/// `completed` always has the same length as `tables`, and a flag never
/// reverts to `false` within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewState {
    pub tables: Vec<RecordTable>,
    pub cursor: usize,
    pub completed: Vec<bool>,
}

impl ReviewState {
    pub fn new(tables: Vec<RecordTable>) -> Self {
        let completed = vec![false; tables.len()];
        Self {
            tables,
            cursor: 0,
            completed,
        }
    }

    /// Apply one action and return the next state. Disallowed navigation is
    /// a silent no-op, not an error.
    pub fn apply(mut self, action: ReviewAction) -> ReviewState {
        match action {
            ReviewAction::Previous => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            ReviewAction::Next => {
                if self.completed[self.cursor] && !self.is_last() {
                    self.cursor += 1;
                }
            }
            ReviewAction::Edit(table) => {
                self.tables[self.cursor].table = table;
            }
            ReviewAction::MarkSaved => {
                self.completed[self.cursor] = true;
                if !self.is_last() {
                    self.cursor += 1;
                }
            }
        }

        self
    }

    pub fn current(&self) -> &RecordTable {
        &self.tables[self.cursor]
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 == self.tables.len()
    }

    pub fn is_current_completed(&self) -> bool {
        self.completed[self.cursor]
    }

    /// The header goes out with the very first append of the session, i.e.
    /// while no table has been saved yet.
    pub fn header_pending(&self) -> bool {
        !self.completed.iter().any(|&done| done)
    }

    pub fn all_completed(&self) -> bool {
        self.completed.iter().all(|&done| done)
    }

    /// Finished: cursor on the last record and that record saved. Not a
    /// lock; the session stays navigable and editable past this point.
    pub fn is_finished(&self) -> bool {
        self.is_last() && self.is_current_completed()
    }

    /// Display label for the unified save action.
    pub fn save_label(&self) -> &'static str {
        match (self.is_last(), self.is_current_completed()) {
            (true, false) => "Save & Finish",
            (true, true) => "Update & Finish",
            (false, false) => "Save & Next",
            (false, true) => "Update & Next",
        }
    }

    pub fn total_rows(&self) -> usize {
        self.tables
            .iter()
            .map(|record| record.table.row_count())
            .sum()
    }
}
