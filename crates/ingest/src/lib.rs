pub mod reader;
pub mod record;

pub use reader::RecordReader;
pub use record::BiographyRecord;

use anyhow::Result;
use std::path::Path;

/// Load everything the extraction run needs from disk: the biography
/// records and the prompt template body.
pub async fn load_inputs(
    records_path: &Path,
    prompt_path: &Path,
) -> Result<(Vec<BiographyRecord>, String)> {
    let records = RecordReader::read_records(records_path).await?;
    let template = RecordReader::read_prompt_template(prompt_path).await?;

    Ok((records, template))
}
