use crate::models::domain::{ExportFormat, MatchStrategy, RawRow};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

/// Request to generate (or export) a round of pairings
///
/// The roster arrives either as spreadsheet rows already keyed by column
/// header, or as the raw CSV text of the sheet. At most one may be given;
/// neither means an empty roster.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_roster_source"))]
pub struct GenerateMatchesRequest {
    #[serde(default)]
    pub rows: Vec<HashMap<String, serde_json::Value>>,
    #[serde(default, alias = "roster_csv", rename = "rosterCsv")]
    pub roster_csv: Option<String>,
    #[serde(default, alias = "forced_pairs", rename = "forcedPairs")]
    #[validate(length(max = 65536))]
    pub forced_pairs: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub strategy: Option<MatchStrategy>,
}

impl GenerateMatchesRequest {
    pub fn has_csv(&self) -> bool {
        self.roster_csv
            .as_deref()
            .is_some_and(|csv| !csv.trim().is_empty())
    }

    /// JSON rows flattened to text cells
    pub fn raw_rows(&self) -> Vec<RawRow> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(column, value)| (column.trim().to_string(), cell_text(value)))
                    .collect()
            })
            .collect()
    }
}

/// Spreadsheet exports turn numeric cells (e.g. `Team #`) into JSON numbers
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Query string of `/matches/export`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<ExportFormat>,
}

/// Query string of `/matches/upload`, whose body is the roster sheet itself
///
/// Without `format` the run is answered as JSON; with it, as a download.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UploadQuery {
    #[serde(default, alias = "forced_pairs", rename = "forcedPairs")]
    #[validate(length(max = 65536))]
    pub forced_pairs: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub strategy: Option<MatchStrategy>,
    #[serde(default)]
    pub format: Option<ExportFormat>,
}

fn validate_roster_source(req: &GenerateMatchesRequest) -> Result<(), ValidationError> {
    if !req.rows.is_empty() && req.has_csv() {
        let mut err = ValidationError::new("ambiguous_roster");
        err.message = Some(Cow::from("Provide either rows or rosterCsv, not both"));
        return Err(err);
    }
    Ok(())
}
