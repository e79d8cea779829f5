use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Distance must be greater than zero")]
    NonPositiveDistance,
    #[error("Duration must be greater than zero")]
    ZeroDuration,
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("Missing column in activities file: {0}")]
    MissingColumn(String),
    #[error("Unparseable date on row {row}: {value:?}")]
    DateParse { row: usize, value: String },
    #[error("Invalid number on row {row} in column {column}: {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("Malformed activities file: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Invalid FIT: {0}")]
    InvalidFit(String),
    #[error("Decompression failed: {0}")]
    Gzip(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid activities archive: {0}")]
    InvalidArchive(String),
    #[error("Temporary workspace failure: {0}")]
    Workspace(#[from] std::io::Error),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid period: {0}. Use 'day', 'week', 'month', 'quarter', or 'year'")]
pub struct InvalidPeriod(pub String);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("page {0}")]
pub struct UnknownPage(pub String);

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("Unknown training category: {0}")]
    UnknownCategory(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error("Missing input: {0}")]
    MissingInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<InvalidPeriod> for AppError {
    fn from(err: InvalidPeriod) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<UnknownPage> for AppError {
    fn from(err: UnknownPage) -> Self {
        AppError::NotFound(err.to_string())
    }
}

// Extractor rejections use the same `{"error": ...}` body as every other failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Calc(_)
            | AppError::Aggregate(_)
            | AppError::MissingInput(_)
            | AppError::BadRequest(_)
            | AppError::Extract(ExtractError::InvalidArchive(_)) => StatusCode::BAD_REQUEST,
            AppError::Training(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Extract(ExtractError::Workspace(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
