use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::schema::Schema;

/// Settings for one extraction run. Loadable from a JSON file; fields left
/// out of the file keep their defaults. The API key is never configured
/// here, only through the `OPENAI_API_KEY` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub model: String,
    pub base_url: String,
    pub input_file: PathBuf,
    pub prompt_file: PathBuf,
    pub output_dir: PathBuf,
    /// Canonical output columns, in order.
    pub schema_columns: Vec<String>,
    pub max_tokens: Option<u32>,
    /// Labels whose tokens get a logit bias on every request.
    pub logit_bias_labels: Option<Vec<String>>,
    pub logit_bias_weight: i32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            input_file: PathBuf::from("samples/input.csv"),
            prompt_file: PathBuf::from("prompt.txt"),
            output_dir: PathBuf::from("generated_frames"),
            schema_columns: vec![
                "attribute".to_string(),
                "value".to_string(),
                "date".to_string(),
                "place".to_string(),
            ],
            max_tokens: None,
            logit_bias_labels: None,
            logit_bias_weight: 100,
        }
    }
}

impl ExtractionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read extraction config: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .context(format!("Malformed extraction config: {:?}", path))?;

        Ok(config)
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.schema_columns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"model": "gpt-4o-mini", "schema_columns": ["attribute"]}"#)
                .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.schema_columns, vec!["attribute"]);
        assert_eq!(config.output_dir, PathBuf::from("generated_frames"));
        assert_eq!(config.logit_bias_weight, 100);
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn test_schema_preserves_column_order() {
        let config = ExtractionConfig::default();
        let schema = config.schema();

        assert_eq!(schema.columns(), config.schema_columns.as_slice());
    }
}
