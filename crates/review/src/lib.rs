pub mod session;
pub mod store;

pub use session::{RecordTable, ReviewAction, ReviewState};
pub use store::{load_tables, CumulativeWriter};

use anyhow::Result;
use extract::Table;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary surfaced once the last record has been saved.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub tables: usize,
    pub output_file: String,
    pub total_rows: usize,
}

/// What one save did.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub saved_index: usize,
    pub rows_appended: usize,
    pub header_written: bool,
    pub advanced: bool,
    pub summary: Option<SessionSummary>,
}

/// One reviewer's walk over the generated tables.
///
/// Owns the whole mutable session state; every transition goes through this
/// object, and the only thing that outlives it is the cumulative output
/// file it appends to.
pub struct ReviewSession {
    state: ReviewState,
    writer: CumulativeWriter,
}

impl ReviewSession {
    /// Load all generated frames and start at the first one.
    pub async fn open(frames_dir: &Path, output_file: PathBuf) -> Result<Self> {
        let tables = store::load_tables(frames_dir).await?;

        info!(
            tables = tables.len(),
            output = %output_file.display(),
            "Review session loaded"
        );

        Ok(Self {
            state: ReviewState::new(tables),
            writer: CumulativeWriter::new(output_file),
        })
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn previous(&mut self) {
        self.state = self.state.clone().apply(ReviewAction::Previous);
    }

    pub fn next(&mut self) {
        self.state = self.state.clone().apply(ReviewAction::Next);
    }

    /// Overwrite the current table with an edited version. Nothing persists
    /// until the next save.
    pub fn edit(&mut self, table: Table) {
        self.state = self.state.clone().apply(ReviewAction::Edit(table));
    }

    /// The unified save action: append the current table to the cumulative
    /// output (header only on the session's first append), mark it
    /// completed, and advance unless already at the last record.
    ///
    /// Re-saving an already-completed record appends its current edited
    /// state again; the output is append-only and deliberately not
    /// deduplicated.
    pub async fn save(&mut self) -> Result<SaveOutcome> {
        let header_written = self.state.header_pending();
        let saved_index = self.state.cursor;
        let was_last = self.state.is_last();
        let rows_appended = self.state.current().table.row_count();

        let current = self.state.current().table.clone();
        self.writer.append(&current, header_written).await?;

        self.state = self.state.clone().apply(ReviewAction::MarkSaved);

        info!(
            index = saved_index,
            rows = rows_appended,
            header = header_written,
            "Table appended to cumulative output"
        );

        let summary = was_last.then(|| SessionSummary {
            tables: self.state.tables.len(),
            output_file: self.writer.path().display().to_string(),
            total_rows: self.state.total_rows(),
        });

        Ok(SaveOutcome {
            saved_index,
            rows_appended,
            header_written,
            advanced: !was_last,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_frames(dir: &Path) {
        std::fs::write(
            dir.join("ada_1.csv"),
            "attribute,value,URI,name\nborn,1815,person_0,Ada\ndied,1852,person_0,Ada\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("turing_2.csv"),
            "attribute,value,URI,name\nborn,1912,person_1,Alan\n",
        )
        .unwrap();
    }

    async fn open_session(dir: &Path) -> (ReviewSession, PathBuf) {
        let output = dir.join("output.csv");
        let session = ReviewSession::open(dir, output.clone()).await.unwrap();
        (session, output)
    }

    #[tokio::test]
    async fn test_full_walk_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path());
        let (mut session, output) = open_session(dir.path()).await;

        let first = session.save().await.unwrap();
        assert!(first.header_written);
        assert!(first.advanced);
        assert!(first.summary.is_none());
        assert_eq!(session.state().completed, vec![true, false]);
        assert_eq!(session.state().cursor, 1);

        let second = session.save().await.unwrap();
        assert!(!second.header_written);
        assert!(!second.advanced);
        assert_eq!(session.state().completed, vec![true, true]);
        assert_eq!(session.state().cursor, 1);

        let summary = second.summary.unwrap();
        assert_eq!(summary.tables, 2);
        assert_eq!(summary.total_rows, 3);
        assert!(summary.output_file.ends_with("output.csv"));

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "attribute,value,URI,name",
                "born,1815,person_0,Ada",
                "died,1852,person_0,Ada",
                "born,1912,person_1,Alan",
            ]
        );
    }

    #[tokio::test]
    async fn test_resave_after_edit_appends_again() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path());
        let (mut session, output) = open_session(dir.path()).await;

        session.save().await.unwrap();
        session.save().await.unwrap();

        // Back to the first record, edit a cell, save again.
        session.previous();
        let mut edited = session.state().current().table.clone();
        edited.rows[0][1] = "1816".to_string();
        session.edit(edited);

        let resave = session.save().await.unwrap();
        assert!(!resave.header_written);
        assert_eq!(resave.saved_index, 0);
        assert!(resave.advanced);

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        // Two append blocks for the first record, the second one edited.
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[4], "born,1816,person_0,Ada");
        assert_eq!(
            content.matches("attribute,value,URI,name").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_open_fails_on_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReviewSession::open(dir.path(), dir.path().join("output.csv")).await;
        assert!(result.is_err());
    }
}
