use runhelper_rs::{config, routes, state};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runhelper_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let addr = format!("0.0.0.0:{}", config.port);
    let max_file_size = config.max_file_size;
    let state = state::AppState::new(config);

    let app = routes::app(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Running helper listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Pages: GET http://{}/api/pages", addr);
    tracing::info!("Strava analysis: POST http://{}/api/strava/analyze", addr);

    axum::serve(listener, app).await
}
