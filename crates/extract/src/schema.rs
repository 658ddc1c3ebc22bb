use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The canonical, ordered set of recognized output column names.
///
/// Validation is membership-only: any cell content is accepted under a
/// recognized column name, and a table may use fewer columns than the
/// schema defines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Columns present in the table but absent from the schema.
    ///
    /// An empty result means the table passes validation. A non-empty
    /// result rejects the whole table; there is no partial acceptance of
    /// the recognized subset.
    pub fn invalid_columns(&self, table: &Table) -> Vec<String> {
        table
            .columns
            .iter()
            .filter(|column| !self.columns.contains(column))
            .cloned()
            .collect()
    }
}

/// A row-structured table: ordered column names plus string rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// A table with no rows carries no extractable data, whatever its header.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Parse delimited text, first line as the header row.
    ///
    /// Empty input yields the empty table; structurally broken input
    /// (ragged rows) is an error.
    pub fn from_csv(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::empty());
        }

        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .context("Failed to read table header")?
            .iter()
            .map(|field| field.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("Failed to read table row")?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Serialize as CSV, header first.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(&self.columns)
            .context("Failed to write table header")?;
        for row in &self.rows {
            writer.write_record(row).context("Failed to write table row")?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush table: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Append the four provenance columns, each holding one constant value
    /// for every row, in creation order: URI, name, source_name, source_page.
    pub fn append_provenance(&mut self, uri: &str, name: &str, source_name: &str, source_page: &str) {
        for (column, value) in [
            ("URI", uri),
            ("name", name),
            ("source_name", source_name),
            ("source_page", source_page),
        ] {
            self.columns.push(column.to_string());
            for row in &mut self.rows {
                row.push(value.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            "attribute".to_string(),
            "value".to_string(),
            "date".to_string(),
        ])
    }

    #[test]
    fn test_subset_columns_pass() {
        let table = Table {
            columns: vec!["attribute".to_string(), "value".to_string()],
            rows: vec![vec!["born".to_string(), "1815".to_string()]],
        };

        assert!(schema().invalid_columns(&table).is_empty());
    }

    #[test]
    fn test_unrecognized_columns_named_exactly() {
        let table = Table {
            columns: vec![
                "attribute".to_string(),
                "confidence".to_string(),
                "notes".to_string(),
            ],
            rows: vec![vec![
                "born".to_string(),
                "0.9".to_string(),
                "guessed".to_string(),
            ]],
        };

        let invalid = schema().invalid_columns(&table);
        assert_eq!(invalid, vec!["confidence".to_string(), "notes".to_string()]);
    }

    #[test]
    fn test_from_csv_empty_input() {
        let table = Table::from_csv("").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_from_csv_header_only_has_no_rows() {
        let table = Table::from_csv("attribute,value\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["attribute", "value"]);
    }

    #[test]
    fn test_from_csv_ragged_rows_fail() {
        let result = Table::from_csv("attribute,value\nborn,1815,extra\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_append_provenance_order_and_values() {
        let mut table = Table {
            columns: vec!["attribute".to_string()],
            rows: vec![vec!["born".to_string()], vec!["died".to_string()]],
        };

        table.append_provenance("person_0", "Ada Lovelace", "DNB", "12");

        assert_eq!(
            table.columns,
            vec!["attribute", "URI", "name", "source_name", "source_page"]
        );
        assert_eq!(
            table.rows[0],
            vec!["born", "person_0", "Ada Lovelace", "DNB", "12"]
        );
        assert_eq!(
            table.rows[1],
            vec!["died", "person_0", "Ada Lovelace", "DNB", "12"]
        );
    }

    #[test]
    fn test_csv_roundtrip_with_quoted_cells() {
        let original = Table {
            columns: vec!["attribute".to_string(), "value".to_string()],
            rows: vec![vec!["residence".to_string(), "London, England".to_string()]],
        };

        let text = original.to_csv_string().unwrap();
        let parsed = Table::from_csv(&text).unwrap();

        assert_eq!(parsed, original);
    }
}
