// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_name, previous_match_column, Assignment, AssignmentResult, ExportFormat, ForcedPair,
    MatchStrategy, Person, RawRow, PREVIOUS_MATCH_COLUMNS, SITE_COLUMN, STAFF_NAME_COLUMN, TEAM_COLUMN,
};
pub use requests::{ExportQuery, GenerateMatchesRequest, UploadQuery};
pub use responses::{AssignmentRow, ErrorResponse, GenerateMatchesResponse, HealthResponse};
