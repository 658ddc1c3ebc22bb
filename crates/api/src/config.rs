use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the review service. Loadable from a JSON file; fields left
/// out of the file keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Directory of per-record CSV files produced by the extraction run.
    pub frames_dir: PathBuf,
    /// Cumulative output file approved rows are appended to.
    pub output_file: PathBuf,
    pub bind_addr: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            frames_dir: PathBuf::from("generated_frames"),
            output_file: PathBuf::from("output.csv"),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl ReviewConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read review config: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .context(format!("Malformed review config: {:?}", path))?;

        Ok(config)
    }
}
