use axum::extract::rejection::JsonRejection;
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pace::{self, SplitRow};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calculator/pace", post(calculate_pace))
        .route("/api/calculator/splits", post(calculate_splits))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PaceRequest {
    distance_km: f64,
    time: String,
}

#[derive(Serialize)]
struct PaceResponse {
    pace_min_per_km: f64,
    pace: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SplitsRequest {
    #[serde(default = "default_distance_m")]
    distance_m: u32,
    #[serde(default = "default_split_length_m")]
    split_length_m: u32,
    #[serde(default = "default_pace")]
    pace: String,
}

fn default_distance_m() -> u32 {
    10_000
}

fn default_split_length_m() -> u32 {
    1_000
}

fn default_pace() -> String {
    "4:11".to_string()
}

#[derive(Serialize)]
struct SplitsResponse {
    pace: String,
    splits: Vec<SplitRow>,
}

async fn calculate_pace(
    payload: Result<Json<PaceRequest>, JsonRejection>,
) -> Result<Json<PaceResponse>, AppError> {
    let Json(req) = payload?;
    let minutes_per_km = pace::pace(req.distance_km, &req.time)?;
    let formatted = pace::format_pace(minutes_per_km);

    tracing::info!(
        "Pace for {:.2} km in {}: {} min/km",
        req.distance_km,
        req.time,
        formatted
    );

    Ok(Json(PaceResponse {
        pace_min_per_km: minutes_per_km,
        pace: formatted,
    }))
}

async fn calculate_splits(
    payload: Result<Json<SplitsRequest>, JsonRejection>,
) -> Result<Json<SplitsResponse>, AppError> {
    let Json(req) = payload?;
    let splits = pace::splits(req.distance_m, req.split_length_m, &req.pace)?;

    tracing::info!(
        "{} splits of {} m over {} m at {}",
        splits.len(),
        req.split_length_m,
        req.distance_m,
        req.pace
    );

    Ok(Json(SplitsResponse {
        pace: req.pace,
        splits,
    }))
}
