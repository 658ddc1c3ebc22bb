pub mod config;
pub mod llm;
pub mod prompt;
pub mod response;
pub mod schema;
pub mod tokens;

pub use config::ExtractionConfig;
pub use llm::OpenAiClient;
pub use schema::{Schema, Table};

use anyhow::{Context, Result};
use ingest::BiographyRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of one record's reply after cleaning, parsing and validation.
/// The three variants are mutually exclusive per record and cycle.
#[derive(Debug)]
pub enum RecordOutcome {
    /// No extractable rows survived cleaning.
    Empty,
    /// The reply used columns outside the canonical schema.
    InvalidColumns(Vec<String>),
    /// The reply parsed and every column is recognized.
    Valid(Table),
}

pub struct Extractor {
    client: OpenAiClient,
    schema: Schema,
    output_dir: PathBuf,
    max_tokens: Option<u32>,
    logit_bias: Option<HashMap<String, i32>>,
}

impl Extractor {
    pub fn new(client: OpenAiClient, schema: Schema, output_dir: PathBuf) -> Self {
        Self {
            client,
            schema,
            output_dir,
            max_tokens: None,
            logit_bias: None,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let client = OpenAiClient::from_env(config.base_url.clone(), config.model.clone())?;

        let logit_bias = match &config.logit_bias_labels {
            Some(labels) => Some(tokens::logit_bias_for_labels(
                &config.model,
                labels,
                config.logit_bias_weight,
            )?),
            None => None,
        };

        Ok(Self {
            client,
            schema: config.schema(),
            output_dir: config.output_dir.clone(),
            max_tokens: config.max_tokens,
            logit_bias,
        })
    }

    /// Drive one pass over all records, strictly sequentially.
    ///
    /// Record-level problems (empty reply, schema violation, unparseable
    /// reply) are logged and skipped; an unreachable provider or an
    /// unwritable output directory aborts the run. Returns the decorated
    /// tables that were persisted; the per-record files are the
    /// authoritative result.
    pub async fn run(
        &self,
        records: &[BiographyRecord],
        template: &str,
    ) -> Result<Vec<Table>> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .context(format!(
                "Failed to create output directory: {:?}",
                self.output_dir
            ))?;

        let column_list = prompt::format_column_list(&self.schema);
        let mut extracted = Vec::new();

        for (index, record) in records.iter().enumerate() {
            info!(
                subject = %record.name,
                index = index + 1,
                total = records.len(),
                "Processing biography"
            );

            let prompt_text = prompt::build_extraction_prompt(
                template,
                &record.name,
                &record.biography,
                &column_list,
            );

            let reply = self
                .client
                .complete(&prompt_text, self.max_tokens, self.logit_bias.as_ref())
                .await?;

            if let Some(table) = self.process_reply(record, index, &reply).await? {
                extracted.push(table);
            }
        }

        Ok(extracted)
    }

    /// Evaluate one raw reply and, when valid, decorate and persist it.
    ///
    /// Returns the decorated table on success, `None` for the record-level
    /// outcomes that skip persistence. Only write failures propagate.
    pub async fn process_reply(
        &self,
        record: &BiographyRecord,
        index: usize,
        reply: &str,
    ) -> Result<Option<Table>> {
        match self.evaluate_reply(reply) {
            Err(e) => {
                warn!(
                    subject = %record.name,
                    error = %e,
                    "Reply was not parseable as CSV"
                );
                Ok(None)
            }
            Ok(RecordOutcome::Empty) => {
                warn!(subject = %record.name, "No data extracted");
                Ok(None)
            }
            Ok(RecordOutcome::InvalidColumns(invalid)) => {
                warn!(
                    subject = %record.name,
                    invalid_columns = ?invalid,
                    expected_schema = ?self.schema.columns(),
                    "Column validation failed"
                );
                Ok(None)
            }
            Ok(RecordOutcome::Valid(mut table)) => {
                table.append_provenance(
                    &format!("person_{}", index),
                    &record.name,
                    &record.source_name,
                    &record.source_page,
                );

                let path = self.record_file_path(&record.name, index);
                self.write_table(&table, &path).await?;

                info!(
                    subject = %record.name,
                    rows = table.row_count(),
                    path = %path.display(),
                    "Extracted table saved"
                );
                Ok(Some(table))
            }
        }
    }

    /// Clean, parse and validate one raw reply. Pure; no side effects.
    pub fn evaluate_reply(&self, reply: &str) -> Result<RecordOutcome> {
        let table = response::parse_reply(reply)?;

        if table.is_empty() {
            return Ok(RecordOutcome::Empty);
        }

        let invalid = self.schema.invalid_columns(&table);
        if !invalid.is_empty() {
            return Ok(RecordOutcome::InvalidColumns(invalid));
        }

        Ok(RecordOutcome::Valid(table))
    }

    fn record_file_path(&self, subject: &str, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.csv", sanitize_subject_name(subject), index + 1))
    }

    async fn write_table(&self, table: &Table, path: &Path) -> Result<()> {
        let csv_text = table.to_csv_string()?;
        tokio::fs::write(path, csv_text)
            .await
            .context(format!("Failed to write extracted table: {:?}", path))
    }
}

/// Derive a filesystem-safe file stem from a subject name: keep
/// alphanumerics, spaces, hyphens and underscores, drop trailing
/// whitespace, then map each space to an underscore.
pub fn sanitize_subject_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    kept.trim_end().replace(' ', "_")
}
