use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::routes::Page;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pages", get(list_pages))
        .route("/api/pages/:page", get(page_info))
}

#[derive(Serialize)]
struct PageInfo {
    page: Page,
    title: &'static str,
    description: &'static str,
    endpoints: &'static [&'static str],
}

fn info(page: Page) -> PageInfo {
    match page {
        Page::Home => PageInfo {
            page,
            title: "Home",
            description: "Running-helper space: tools to support your training process.",
            endpoints: &["GET /api/pages", "GET /api/pages/:page"],
        },
        Page::Strava => PageInfo {
            page,
            title: "Strava activities exploration",
            description: "Upload the activities CSV and the ZIP of activity files from your Strava data export to see distance covered per sport, hours spent per sport and where your sessions took place.",
            endpoints: &["POST /api/strava/analyze"],
        },
        Page::Training => PageInfo {
            page,
            title: "Running training generator",
            description: "Pick a kind of session and get a random workout to break the routine.",
            endpoints: &[
                "GET /api/training/categories",
                "GET /api/training/suggest?category=...",
            ],
        },
        Page::Calculator => PageInfo {
            page,
            title: "Running calculator",
            description: "Compute your pace from distance and time, or the split times for a target pace.",
            endpoints: &["POST /api/calculator/pace", "POST /api/calculator/splits"],
        },
    }
}

async fn list_pages() -> Json<Vec<PageInfo>> {
    Json(Page::ALL.into_iter().map(info).collect())
}

async fn page_info(Path(page): Path<String>) -> Result<Json<PageInfo>, AppError> {
    let page: Page = page.parse()?;
    Ok(Json(info(page)))
}
