use actix_web::{error::ResponseError, http::header, http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::config::{ExportSettings, MatchingSettings};
use crate::core::{parse_forced_pairs, Matcher, RosterError, RosterModel, SeededShuffle};
use crate::models::{
    AssignmentResult, AssignmentRow, ErrorResponse, ExportFormat, ExportQuery,
    GenerateMatchesRequest, GenerateMatchesResponse, HealthResponse, MatchStrategy, RawRow,
    UploadQuery,
};
use crate::services::{
    assignments_to_csv, assignments_to_xlsx, read_roster_csv, read_roster_xlsx, render_preview,
    SpreadsheetError,
};
use std::sync::Arc;
use thiserror::Error;

/// Largest roster workbook accepted by `/matches/upload`
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub matching: Arc<MatchingSettings>,
    pub export: Arc<ExportSettings>,
}

impl AppState {
    pub fn new(matching: MatchingSettings, export: ExportSettings) -> Self {
        Self {
            matcher: Matcher::new(matching.strategy),
            matching: Arc::new(matching),
            export: Arc::new(export),
        }
    }
}

/// Errors surfaced by the matching endpoints
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Validation(String),

    #[error("Could not read roster sheet: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Roster has {size} rows, the limit is {max}")]
    RosterTooLarge { size: usize, max: usize },

    #[error("Could not render export sheet: {0}")]
    Export(SpreadsheetError),

    #[error("Matching task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl GenerateError {
    fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation failed",
            Self::Spreadsheet(_) => "Invalid roster sheet",
            Self::Roster(_) => "Malformed roster row",
            Self::RosterTooLarge { .. } => "Roster too large",
            Self::Export(_) | Self::Worker(_) => "Internal error",
        }
    }
}

impl ResponseError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Spreadsheet(_) => StatusCode::BAD_REQUEST,
            Self::Roster(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RosterTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Export(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.label().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Roster rows and per-run options, whichever endpoint they came in on
struct MatchJob {
    rows: Vec<RawRow>,
    forced_pairs: String,
    seed: Option<u64>,
    strategy: Option<MatchStrategy>,
}

impl MatchJob {
    fn from_request(req: &GenerateMatchesRequest) -> Result<Self, GenerateError> {
        req.validate()
            .map_err(|errors| GenerateError::Validation(errors.to_string()))?;

        let rows = match req.roster_csv.as_deref() {
            Some(csv) if req.has_csv() => read_roster_csv(csv.as_bytes())?,
            _ => req.raw_rows(),
        };

        Ok(Self {
            rows,
            forced_pairs: req.forced_pairs.clone(),
            seed: req.seed,
            strategy: req.strategy,
        })
    }

    /// `text/csv` bodies are read as CSV, anything else as a workbook
    fn from_upload(body: &[u8], is_csv: bool, query: &UploadQuery) -> Result<Self, GenerateError> {
        query
            .validate()
            .map_err(|errors| GenerateError::Validation(errors.to_string()))?;

        let rows = if is_csv {
            read_roster_csv(body)?
        } else {
            read_roster_xlsx(body)?
        };

        Ok(Self {
            rows,
            forced_pairs: query.forced_pairs.clone(),
            seed: query.seed,
            strategy: query.strategy,
        })
    }
}

/// Outcome of one matching run plus roster bookkeeping for the response
struct MatchRun {
    result: AssignmentResult,
    total_people: usize,
    skipped_rows: Vec<usize>,
    duplicate_names: Vec<String>,
    matcher: Matcher,
}

impl MatchRun {
    fn into_response(self) -> GenerateMatchesResponse {
        GenerateMatchesResponse {
            run_id: uuid::Uuid::new_v4().to_string(),
            strategy: self.matcher.strategy(),
            assignments: self.result.assignments().iter().map(AssignmentRow::from).collect(),
            preview: render_preview(&self.result),
            total_people: self.total_people,
            forced_count: self.result.forced().len(),
            matched_count: self.result.matched().len(),
            unmatched_count: self.result.unmatched().len(),
            skipped_rows: self.skipped_rows,
            duplicate_names: self.duplicate_names,
        }
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/generate", web::post().to(generate_matches))
        .route("/matches/export", web::post().to(export_matches))
        .service(
            web::resource("/matches/upload")
                .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
                .route(web::post().to(upload_matches)),
        );
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Build the roster and pair it. The pairing itself runs on tokio's
/// blocking pool: the maximum strategy is cubic in the pool size.
async fn run_matching(state: &AppState, job: MatchJob) -> Result<MatchRun, GenerateError> {
    let max = state.matching.max_roster_size;
    if job.rows.len() > max {
        return Err(GenerateError::RosterTooLarge { size: job.rows.len(), max });
    }

    let (roster, skipped_rows) = if state.matching.skip_malformed_rows {
        RosterModel::build_lenient(&job.rows)
    } else {
        (RosterModel::build(&job.rows)?, Vec::new())
    };

    let forced = parse_forced_pairs(&job.forced_pairs);
    let matcher = job.strategy.map(Matcher::new).unwrap_or(state.matcher);
    let seed = job.seed.or(state.matching.seed);

    let (roster, result) = tokio::task::spawn_blocking(move || {
        let mut order = SeededShuffle::from_optional_seed(seed);
        let result = matcher.generate(&roster, &forced, &mut order);
        (roster, result)
    })
    .await
    .inspect_err(|e| tracing::error!("Matching task did not complete: {}", e))?;

    tracing::info!(
        "Generated {} assignments for {} people ({} forced, {} matched, {} unmatched, strategy {})",
        result.len(),
        roster.len(),
        result.forced().len(),
        result.matched().len(),
        result.unmatched().len(),
        matcher.strategy()
    );

    Ok(MatchRun {
        result,
        total_people: roster.len(),
        skipped_rows,
        duplicate_names: roster.duplicates().to_vec(),
        matcher,
    })
}

/// Answer with the pairing sheet as a download in `format`
fn export_response(
    export: &ExportSettings,
    result: &AssignmentResult,
    format: ExportFormat,
) -> Result<HttpResponse, GenerateError> {
    let body = match format {
        ExportFormat::Xlsx => assignments_to_xlsx(result),
        ExportFormat::Csv => assignments_to_csv(result).map(String::into_bytes),
    }
    .map_err(|e| {
        tracing::error!("Failed to render export sheet: {}", e);
        GenerateError::Export(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name(format)),
        ))
        .body(body))
}

/// Generate matches endpoint
///
/// POST /api/v1/matches/generate
///
/// Request body:
/// ```json
/// {
///   "rows": [{ "Staff Name": "string", "Team #": "string", "Site": "string" }],
///   "rosterCsv": "string",
///   "forcedPairs": "Name A, Name B\nName C, Name D",
///   "seed": 42,
///   "strategy": "greedy|maximum"
/// }
/// ```
async fn generate_matches(
    state: web::Data<AppState>,
    req: web::Json<GenerateMatchesRequest>,
) -> Result<HttpResponse, GenerateError> {
    let job = MatchJob::from_request(&req)?;
    let run = run_matching(&state, job).await.inspect_err(|e| {
        tracing::info!("Rejected generate request: {}", e);
    })?;

    Ok(HttpResponse::Ok().json(run.into_response()))
}

/// Export matches endpoint
///
/// POST /api/v1/matches/export?format=xlsx|csv
///
/// Takes the same body as `/matches/generate` and answers with the
/// `Person 1`/`Person 2` sheet as an attachment. Without `format` the
/// configured export format is used.
async fn export_matches(
    state: web::Data<AppState>,
    query: web::Query<ExportQuery>,
    req: web::Json<GenerateMatchesRequest>,
) -> Result<HttpResponse, GenerateError> {
    let job = MatchJob::from_request(&req)?;
    let run = run_matching(&state, job).await?;
    let format = query.format.unwrap_or(state.export.format);

    export_response(&state.export, &run.result, format)
}

/// Upload roster endpoint
///
/// POST /api/v1/matches/upload?forcedPairs=...&seed=42&strategy=maximum&format=xlsx
///
/// The body is the roster sheet itself: an `.xlsx`/`.xls` workbook (first
/// worksheet is read) or, with `Content-Type: text/csv`, CSV text. Answers
/// like `/matches/generate`, or with a download when `format` is given.
async fn upload_matches(
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
    http_req: HttpRequest,
) -> Result<HttpResponse, GenerateError> {
    let is_csv = http_req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/csv"));

    tracing::debug!("Roster upload of {} bytes (csv: {})", body.len(), is_csv);

    let job = MatchJob::from_upload(&body, is_csv, &query)?;
    let run = run_matching(&state, job).await.inspect_err(|e| {
        tracing::info!("Rejected roster upload: {}", e);
    })?;

    match query.format {
        Some(format) => export_response(&state.export, &run.result, format),
        None => Ok(HttpResponse::Ok().json(run.into_response())),
    }
}
