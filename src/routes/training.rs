use axum::extract::rejection::QueryRejection;
use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::training;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/training/categories", get(list_categories))
        .route("/api/training/suggest", get(suggest))
}

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<&'static str>,
}

#[derive(Deserialize)]
struct SuggestQuery {
    category: String,
}

#[derive(Serialize)]
struct SuggestResponse {
    category: String,
    workout: &'static str,
}

async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: training::categories(),
    })
}

async fn suggest(
    query: Result<Query<SuggestQuery>, QueryRejection>,
) -> Result<Json<SuggestResponse>, AppError> {
    let Query(query) = query?;
    let workout = training::suggest(&query.category, &mut rand::thread_rng())?;
    tracing::debug!("Suggested {:?} for {}", workout, query.category);

    Ok(Json(SuggestResponse {
        category: query.category,
        workout,
    }))
}
