use anyhow::Result;
use extract::{ExtractionConfig, Extractor};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Optional first argument: path to a JSON config file.
    let config = match std::env::args().nth(1) {
        Some(path) => ExtractionConfig::from_file(&PathBuf::from(path))?,
        None => ExtractionConfig::default(),
    };

    let (records, template) =
        ingest::load_inputs(&config.input_file, &config.prompt_file).await?;

    tracing::info!(
        records = records.len(),
        model = %config.model,
        output_dir = %config.output_dir.display(),
        "Starting extraction run"
    );

    let extractor = Extractor::from_config(&config)?;
    let tables = extractor.run(&records, &template).await?;

    tracing::info!(
        extracted = tables.len(),
        skipped = records.len() - tables.len(),
        "Extraction run complete"
    );

    Ok(())
}
