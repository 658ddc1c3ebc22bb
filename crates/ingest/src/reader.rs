use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::record::BiographyRecord;

pub struct RecordReader;

impl RecordReader {
    /// Read all biography records from the input CSV.
    ///
    /// A missing or unreadable file is fatal for the whole run; a file with
    /// only a header simply yields zero records.
    pub async fn read_records(path: &Path) -> Result<Vec<BiographyRecord>> {
        let content = fs::read_to_string(path)
            .await
            .context(format!("Failed to read input records: {:?}", path))?;

        parse_records(&content).context(format!("Malformed input records: {:?}", path))
    }

    /// Read the caller-supplied prompt template body.
    pub async fn read_prompt_template(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .await
            .context(format!("Failed to read prompt template: {:?}", path))?;
        Ok(content)
    }
}

pub fn parse_records(content: &str) -> Result<Vec<BiographyRecord>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();

    for row in reader.deserialize() {
        let record: BiographyRecord = row?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let input = "Name,Biography,Source,SourcePage\n\
                     Ada Lovelace,\"Born in 1815, London.\",Dictionary of National Biography,12\n\
                     Alan Turing,Born in 1912.,Who Was Who,330\n";

        let records = parse_records(input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Ada Lovelace");
        assert_eq!(records[0].biography, "Born in 1815, London.");
        assert_eq!(records[0].source_name, "Dictionary of National Biography");
        assert_eq!(records[1].source_page, "330");
    }

    #[test]
    fn test_parse_records_header_only() {
        let records = parse_records("Name,Biography,Source,SourcePage\n").unwrap();
        assert!(records.is_empty());
    }
}
