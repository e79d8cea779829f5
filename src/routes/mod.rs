pub mod calculator;
pub mod health;
pub mod pages;
pub mod strava;
pub mod training;

use std::str::FromStr;

use axum::Router;
use serde::Serialize;

use crate::error::UnknownPage;
use crate::state::AppState;

/// The dashboard's pages. Each one owns its routes; there is no "current page" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Strava,
    Training,
    Calculator,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Strava, Page::Training, Page::Calculator];

    pub fn router(self) -> Router<AppState> {
        match self {
            Page::Home => pages::router(),
            Page::Strava => strava::router(),
            Page::Training => training::router(),
            Page::Calculator => calculator::router(),
        }
    }
}

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Page::Home),
            "strava" => Ok(Page::Strava),
            "training" => Ok(Page::Training),
            "calculator" => Ok(Page::Calculator),
            _ => Err(UnknownPage(s.to_string())),
        }
    }
}

/// Health check plus every page's routes.
pub fn app(state: AppState) -> Router {
    Page::ALL
        .into_iter()
        .fold(Router::new().merge(health::router()), |router, page| {
            router.merge(page.router())
        })
        .with_state(state)
}
