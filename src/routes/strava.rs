use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};

use crate::error::AppError;
use crate::pipeline::{self, Analysis, AnalysisOptions};
use crate::state::AppState;
use crate::types::activity::Period;

const UPLOAD_HINT: &str =
    "Upload the CSV file of your activities and the ZIP archive with your activity files";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/strava/analyze", post(analyze))
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Analysis>, AppError> {
    let mut multipart = multipart?;
    let mut uploads = Vec::new();
    let mut period = state.config().default_period;
    let mut min_total_km = state.config().min_total_distance_km;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if let Some(filename) = field.file_name().map(|s| s.to_string()) {
            let bytes = field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file bytes: {}", e))
            })?;
            tracing::info!("Received {} ({} bytes)", filename, bytes.len());
            uploads.push(Upload {
                filename,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field {}: {}", name, e))
        })?;
        match name.as_str() {
            "period" => {
                period = text.parse::<Period>()?;
            }
            "min_total_km" => {
                min_total_km = text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|km| km.is_finite())
                    .ok_or_else(|| {
                        AppError::BadRequest(format!("Invalid min_total_km: {}", text))
                    })?;
            }
            _ => {}
        }
    }

    let (csv, archive) = split_uploads(uploads)?;
    let options = AnalysisOptions {
        period,
        min_total_km,
        max_stream_bytes: state.config().max_file_size,
    };

    tracing::info!(
        "Analyzing {} with {} (period: {}, threshold: {} km)",
        csv.filename,
        archive.filename,
        period.as_str(),
        min_total_km
    );

    let analysis = tokio::task::spawn_blocking(move || {
        pipeline::analyze(&csv.bytes, &archive.bytes, options)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))??;

    tracing::info!(
        "Analyzed {} activities: {} km total, {} located",
        analysis.activity_count,
        analysis.distance.total_km,
        analysis.locations.mapped.len()
    );

    Ok(Json(analysis))
}

/// Exactly one CSV and one ZIP, in any order.
fn split_uploads(uploads: Vec<Upload>) -> Result<(Upload, Upload), AppError> {
    if uploads.len() != 2 {
        return Err(AppError::MissingInput(format!(
            "expected 2 files, got {}. {}",
            uploads.len(),
            UPLOAD_HINT
        )));
    }

    let mut csv = None;
    let mut archive = None;
    for upload in uploads {
        let ext = upload
            .filename
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" => csv = Some(upload),
            "zip" => archive = Some(upload),
            _ => {
                return Err(AppError::BadRequest(format!(
                    "Unsupported file: {}. {}",
                    upload.filename, UPLOAD_HINT
                )))
            }
        }
    }

    match (csv, archive) {
        (Some(csv), Some(archive)) => Ok((csv, archive)),
        _ => Err(AppError::MissingInput(UPLOAD_HINT.to_string())),
    }
}
