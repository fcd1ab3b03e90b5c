//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - assessment API under `/api/assessment/...`
/// - sentence translation at `/api/translate`
/// - static SPA from the configured directory with index fallback
/// - CORS (allow any origin/method/headers); tighten for production
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.settings.static_dir.clone();
    let static_service = ServeDir::new(&static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(format!("{}/index.html", static_dir)));

    Router::new()
        .route("/api/health", get(http::http_health))
        .route(
            "/api/assessment/profile",
            get(http::http_get_profile).post(http::http_post_profile),
        )
        .route(
            "/api/assessment/results",
            get(http::http_get_results).post(http::http_post_result),
        )
        .route("/api/assessment/results/:id", delete(http::http_delete_result))
        .route("/api/assessment/statistics", get(http::http_get_statistics))
        .route("/api/assessment/recommendations", get(http::http_get_recommendations))
        .route("/api/assessment/weaknesses", get(http::http_get_weaknesses))
        .route("/api/translate", post(http::http_post_translate))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
