use serde::{Deserialize, Serialize};

/// One biography input unit, as read from the input CSV.
///
/// The input file uses capitalized headers (`Name`, `Biography`, `Source`,
/// `SourcePage`); field names follow the rest of the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiographyRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Biography")]
    pub biography: String,
    #[serde(rename = "Source")]
    pub source_name: String,
    #[serde(rename = "SourcePage")]
    pub source_page: String,
}
