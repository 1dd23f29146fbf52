use crate::models::domain::{Assignment, MatchStrategy};
use serde::{Deserialize, Serialize};

/// One exported row; an unmatched person has an empty `Person 2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    #[serde(rename = "Person 1")]
    pub person1: String,
    #[serde(rename = "Person 2")]
    pub person2: String,
}

impl From<&Assignment> for AssignmentRow {
    fn from(assignment: &Assignment) -> Self {
        Self {
            person1: assignment.first.clone(),
            person2: assignment.second.clone().unwrap_or_default(),
        }
    }
}

/// Response for the generate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMatchesResponse {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub strategy: MatchStrategy,
    pub assignments: Vec<AssignmentRow>,
    pub preview: Vec<String>,
    #[serde(rename = "totalPeople")]
    pub total_people: usize,
    #[serde(rename = "forcedCount")]
    pub forced_count: usize,
    #[serde(rename = "matchedCount")]
    pub matched_count: usize,
    #[serde(rename = "unmatchedCount")]
    pub unmatched_count: usize,
    #[serde(rename = "skippedRows")]
    pub skipped_rows: Vec<usize>,
    #[serde(rename = "duplicateNames")]
    pub duplicate_names: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
