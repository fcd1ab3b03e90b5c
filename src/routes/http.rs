//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use crate::domain::LearnerProfile;
use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;
use crate::trends::Statistics;
use crate::util::now_millis;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
    Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_profile(State(state): State<Arc<AppState>>) -> Json<Option<LearnerProfile>> {
    Json(state.store.latest_profile().await)
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_profile(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LearnerProfile>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    info!(target: "assessment", listening_level = body.listening_level, "HTTP profile received");
    let id = state.store.save_profile(body, now_millis()).await;
    Ok((StatusCode::CREATED, Json(SavedOut { status: "success", id })))
}

#[instrument(level = "info", skip(state), fields(limit = ?q.limit, offset = q.offset))]
pub async fn http_get_results(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ResultsQuery>,
) -> impl IntoResponse {
    // Without an explicit limit only the default page is served, from the start.
    let (limit, offset) = match q.limit {
        Some(limit) => (limit, q.offset),
        None => (state.settings.default_results_limit, 0),
    };
    Json(state.store.list_results(limit, offset).await)
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_result(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResultIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    info!(target: "assessment", n = body.responses.len(), has_analysis = body.analysis.is_some(), "HTTP result received");
    let id = state
        .store
        .save_result(body.responses, body.analysis, body.kind, now_millis())
        .await?;
    state.stats_cache.invalidate().await;
    Ok((StatusCode::CREATED, Json(SavedOut { status: "success", id })))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedOut>, ApiError> {
    state.store.delete_result(&id).await?;
    state.stats_cache.invalidate().await;
    Ok(Json(DeletedOut { status: "deleted" }))
}

#[instrument(level = "info", skip(state), fields(window = ?q.window))]
pub async fn http_get_statistics(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<Statistics>, ApiError> {
    let window = parse_window(q.window.as_deref())?;
    let stats = statistics_for(&state, window).await;
    info!(target: "assessment", %window, total = stats.summary.total_tests, "HTTP statistics served");
    Ok(Json(stats))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_recommendations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RecommendationsOut>, ApiError> {
    let recommendations = recommendations_for_latest(&state).await?;
    Ok(Json(RecommendationsOut { recommendations }))
}

#[instrument(level = "info", skip(state), fields(window = ?q.window))]
pub async fn http_get_weaknesses(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<WeaknessesOut>, ApiError> {
    let window = parse_window(q.window.as_deref())?;
    let (total_tests, categories) = weaknesses_for(&state, window).await;
    Ok(Json(WeaknessesOut { window: window.to_string(), total_tests, categories }))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateIn>, JsonRejection>,
) -> Result<Json<TranslateOut>, ApiError> {
    let Json(body) = payload?;
    let (translation, cached) = translate_cached(&state, &body.text).await?;
    Ok(Json(TranslateOut { translation, cached }))
}
