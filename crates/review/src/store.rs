use anyhow::{Context, Result};
use extract::Table;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::session::RecordTable;

/// Load every per-record table from the generated-frames directory.
///
/// File names are sorted so a session walks records in a stable order.
/// Zero loadable files is fatal: there is nothing to review.
pub async fn load_tables(dir: &Path) -> Result<Vec<RecordTable>> {
    let mut entries = fs::read_dir(dir)
        .await
        .context(format!("Failed to read generated frames directory: {:?}", dir))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("csv") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut tables = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path)
            .await
            .context(format!("Failed to read generated frame: {:?}", path))?;
        let table =
            Table::from_csv(&content).context(format!("Malformed generated frame: {:?}", path))?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        tables.push(RecordTable { file_name, table });
    }

    if tables.is_empty() {
        anyhow::bail!("No reviewable CSV files found in {:?}", dir);
    }

    Ok(tables)
}

/// Append-only writer for the cumulative output file.
///
/// Whether to emit the header is the caller's decision; the file is never
/// read back, and nothing guards against duplicate appends.
pub struct CumulativeWriter {
    path: PathBuf,
}

impl CumulativeWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the table's rows, preceded by its header row when
    /// `write_header` is set.
    pub async fn append(&self, table: &Table, write_header: bool) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        if write_header {
            writer
                .write_record(&table.columns)
                .context("Failed to write cumulative header")?;
        }
        for row in &table.rows {
            writer
                .write_record(row)
                .context("Failed to write cumulative row")?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush cumulative rows: {}", e))?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .context(format!("Failed to open cumulative output: {:?}", self.path))?;

        file.write_all(&bytes)
            .await
            .context(format!("Failed to append to cumulative output: {:?}", self.path))?;
        file.flush()
            .await
            .context(format!("Failed to flush cumulative output: {:?}", self.path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            columns: vec!["attribute".to_string(), "value".to_string()],
            rows: vec![
                vec!["born".to_string(), "1815".to_string()],
                vec!["died".to_string(), "1852".to_string()],
            ],
        }
    }

    #[tokio::test]
    async fn test_load_tables_sorted_csv_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_2.csv"), "attribute,value\ndied,1852\n").unwrap();
        std::fs::write(dir.path().join("a_1.csv"), "attribute,value\nborn,1815\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

        let tables = load_tables(dir.path()).await.unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].file_name, "a_1.csv");
        assert_eq!(tables[1].file_name, "b_2.csv");
        assert_eq!(tables[0].table.rows[0][0], "born");
    }

    #[tokio::test]
    async fn test_load_tables_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_tables(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_append_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output.csv");
        let writer = CumulativeWriter::new(output.clone());

        writer.append(&table(), true).await.unwrap();
        writer.append(&table(), false).await.unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let header_lines = content
            .lines()
            .filter(|line| *line == "attribute,value")
            .count();

        assert_eq!(header_lines, 1);
        assert_eq!(content.lines().count(), 5);
    }
}
