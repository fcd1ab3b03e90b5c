use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use listening_coach::routes::build_router;
use listening_coach::state::AppState;

fn create_test_app() -> Router {
    build_router(Arc::new(AppState::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

fn responses(understood: &[bool]) -> Value {
    Value::Array(
        understood
            .iter()
            .map(|u| json!({ "sentence": "On se voit demain ?", "understood": u, "replays": 1, "reactionTimeMs": 1200 }))
            .collect(),
    )
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_profile_roundtrip_and_defaults() {
    let app = create_test_app();

    let (status, body) = send(&app, "GET", "/api/assessment/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, saved) = send(
        &app,
        "POST",
        "/api/assessment/profile",
        Some(json!({ "targetLanguage": "fr", "targetContent": "podcasts", "difficulties": ["speed"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["status"], "success");

    let (_, profile) = send(&app, "GET", "/api/assessment/profile", None).await;
    assert_eq!(profile["id"], saved["id"]);
    assert_eq!(profile["targetLanguage"], "fr");
    assert_eq!(profile["listeningLevel"], 2);
    assert_eq!(profile["subtitleDependence"], 1);
    assert!(profile["completedAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_results_are_scored_listed_and_deleted() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/api/assessment/results", Some(json!({ "responses": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No responses provided");

    let (status, saved) = send(
        &app,
        "POST",
        "/api/assessment/results",
        Some(json!({ "responses": responses(&[true, true, false]), "analysis": { "summary": "ok", "weaknesses": ["too fast"] } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = saved["id"].as_str().unwrap().to_string();

    let (_, list) = send(&app, "GET", "/api/assessment/results", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["score"], 2);
    assert_eq!(list[0]["totalQuestions"], 3);
    assert_eq!(list[0]["responses"][1]["sentenceId"], 1);

    let (status, _) = send(&app, "DELETE", "/api/assessment/results/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/assessment/results/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&app, "GET", "/api/assessment/results", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_results_default_limit_and_pagination() {
    let app = create_test_app();
    for _ in 0..7 {
        send(&app, "POST", "/api/assessment/results", Some(json!({ "responses": responses(&[true]) }))).await;
    }
    let (_, default_page) = send(&app, "GET", "/api/assessment/results", None).await;
    assert_eq!(default_page.as_array().unwrap().len(), 5);

    let (_, page) = send(&app, "GET", "/api/assessment/results?limit=4&offset=5", None).await;
    assert_eq!(page.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_statistics_window_validation_and_empty_history() {
    let app = create_test_app();

    let (status, _) = send(&app, "GET", "/api/assessment/statistics?window=last_week", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stats) = send(&app, "GET", "/api/assessment/statistics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["summary"]["totalTests"], 0);
    assert_eq!(stats["summary"]["improvementRate"], "+0%");
    assert!(stats["scoreTrend"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_statistics_refresh_after_new_result() {
    let app = create_test_app();
    let (_, before) = send(&app, "GET", "/api/assessment/statistics?window=all_time", None).await;
    assert_eq!(before["summary"]["totalTests"], 0);

    send(
        &app,
        "POST",
        "/api/assessment/results",
        Some(json!({ "responses": responses(&[true, false]), "analysis": { "weaknesses": ["strong accent", "background noise"] } })),
    )
    .await;

    let (_, after) = send(&app, "GET", "/api/assessment/statistics?window=all_time", None).await;
    assert_eq!(after["summary"]["totalTests"], 1);
    assert_eq!(after["summary"]["avgScore"], 50.0);
    assert_eq!(after["scoreTrend"][0]["testNumber"], 1);
    assert_eq!(after["scoreTrend"][0]["replays"], 2);
    assert_eq!(after["weaknessEvolution"]["accent"], json!([1]));
    assert_eq!(after["weaknessEvolution"]["noise"], json!([1]));
    assert!(after["weaknessEvolution"].get("speed").is_none());
}

#[tokio::test]
async fn test_recommendations_follow_latest_profile_and_result() {
    let app = create_test_app();

    let (status, _) = send(&app, "GET", "/api/assessment/recommendations", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        "POST",
        "/api/assessment/profile",
        Some(json!({ "listeningLevel": 0, "subtitleDependence": 1, "difficulties": ["speed"] })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/assessment/results",
        Some(json!({ "responses": responses(&[true, true, true, true, true, false, false, false, false, false]) })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/assessment/recommendations", None).await;
    assert_eq!(status, StatusCode::OK);
    let recs: Vec<String> = serde_json::from_value(body["recommendations"].clone()).unwrap();
    assert_eq!(recs.len(), 3);
    assert!(recs[0].contains("ready for level 1"));
    assert!(recs[1].contains("Slow playback down"));
    assert!(recs[2].contains("at level 0"));
}

#[tokio::test]
async fn test_weakness_breakdown() {
    let app = create_test_app();
    send(
        &app,
        "POST",
        "/api/assessment/results",
        Some(json!({ "responses": responses(&[true]), "analysis": { "weaknesses": ["too fast", "regional accent"] } })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/assessment/weaknesses?window=all_time", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], "all_time");
    assert_eq!(body["totalTests"], 1);
    let cats = body["categories"].as_array().unwrap();
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[0]["category"], "Speed");
    assert_eq!(cats[0]["percentage"], 50.0);
    assert_eq!(cats[1]["category"], "Accent");
}

#[tokio::test]
async fn test_translate_without_openai_is_unavailable() {
    let app = create_test_app();
    let (status, body) = send(&app, "POST", "/api/translate", Some(json!({ "text": "Bonjour" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_missing_or_null_body_returns_json_error() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/api/assessment/results", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");

    let (status, body) = send(&app, "POST", "/api/assessment/profile", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");

    let (status, body) = send(&app, "POST", "/api/assessment/profile", Some(Value::Null)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    let (status, body) = send(&app, "POST", "/api/assessment/results", Some(Value::Null)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_statistics_survive_huge_replay_counts() {
    let app = create_test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/assessment/results",
        Some(json!({ "responses": [
            { "understood": true, "replays": u32::MAX },
            { "replays": u32::MAX }
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = send(&app, "GET", "/api/assessment/statistics?window=all_time", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["summary"]["totalTests"], 1);
    assert_eq!(stats["scoreTrend"][0]["replays"], 2 * u32::MAX as u64);
}

#[tokio::test]
async fn test_weakness_evolution_keys_in_taxonomy_order() {
    let app = create_test_app();
    send(
        &app,
        "POST",
        "/api/assessment/results",
        Some(json!({ "responses": responses(&[true]), "analysis": { "weaknesses": ["background noise", "too fast", "new words"] } })),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/assessment/statistics?window=all_time")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#""weaknessEvolution":{"vocabulary":[1],"speed":[1],"noise":[1]}"#));
}
