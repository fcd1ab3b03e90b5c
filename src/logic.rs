//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Statistics for a window (cached)
//!   - Recommendations for the latest profile and result
//!   - Weakness breakdown for a window
//!   - Cached sentence translation

use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;
use crate::recommend::{latest_result, recommend};
use crate::state::AppState;
use crate::trends::{compute_statistics, select_window, Statistics, TimeWindow};
use crate::util::{now_millis, trunc_for_log};
use crate::weakness::{classify_weaknesses, WeaknessShare};

/// Parse an optional `window` query value; absent means `last_10`.
pub fn parse_window(raw: Option<&str>) -> Result<TimeWindow, ApiError> {
  match raw {
    None => Ok(TimeWindow::default()),
    Some(s) => s.parse::<TimeWindow>().map_err(ApiError::BadRequest),
  }
}

#[instrument(level = "info", skip(state), fields(%window))]
pub async fn statistics_for(state: &AppState, window: TimeWindow) -> Statistics {
  let now = now_millis();
  if let Some(cached) = state.stats_cache.get_fresh(window, now).await {
    return cached;
  }
  // Taken before loading results so a write landing in between cannot leave stale stats cached.
  let generation = state.stats_cache.generation().await;
  let results = state.store.all_results().await;
  let selected = select_window(&results, window, now);
  let stats = compute_statistics(&selected, now);
  let stored = state.stats_cache.put(window, stats.clone(), generation).await;
  info!(target: "assessment", %window, total = stats.summary.total_tests, stored, "Statistics recomputed");
  stats
}

#[instrument(level = "info", skip(state))]
pub async fn recommendations_for_latest(state: &AppState) -> Result<Vec<String>, ApiError> {
  let profile = state
    .store
    .latest_profile()
    .await
    .ok_or_else(|| ApiError::not_found("No assessment profile yet"))?;
  let results = state.store.all_results().await;
  let recs = recommend(&profile, latest_result(&results));
  debug!(target: "assessment", count = recs.len(), "Recommendations served");
  Ok(recs)
}

/// Weakness shares over every analysed result of the window, with the window size.
#[instrument(level = "info", skip(state), fields(%window))]
pub async fn weaknesses_for(state: &AppState, window: TimeWindow) -> (usize, Vec<WeaknessShare>) {
  let results = state.store.all_results().await;
  let selected = select_window(&results, window, now_millis());
  let texts: Vec<&str> = selected
    .iter()
    .flat_map(|r| r.weaknesses().iter().map(String::as_str))
    .collect();
  (selected.len(), classify_weaknesses(&texts))
}

/// Translate a sentence, consulting the cache first. Returns the translation and whether it was cached.
#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn translate_cached(state: &AppState, text: &str) -> Result<(String, bool), ApiError> {
  if let Some(hit) = state.translations.get(text).await {
    debug!(target: "assessment", text = %trunc_for_log(text, 40), "Translation cache hit");
    return Ok((hit, true));
  }
  let oa = state
    .openai
    .as_ref()
    .ok_or_else(|| ApiError::Unavailable("Translation requires OPENAI_API_KEY".into()))?;
  let translation = oa.translate(&state.prompts, text).await.map_err(|e| {
    warn!(target: "assessment", error = %e, "Translation failed");
    ApiError::Upstream(e)
  })?;
  state.translations.insert(text, translation.clone()).await;
  Ok((translation, false))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::domain::{LearnerProfile, TestAnalysis, TestKind, TestResponse};

  #[tokio::test]
  async fn statistics_are_cached_until_a_write() {
    let state = AppState::default();
    let first = statistics_for(&state, TimeWindow::Last10).await;
    assert_eq!(first.summary.total_tests, 0);

    state
      .store
      .save_result(vec![TestResponse { understood: true, ..Default::default() }], None, TestKind::Listening, now_millis())
      .await
      .unwrap();
    // Store writes alone do not touch the cache; the HTTP layer invalidates it.
    assert_eq!(statistics_for(&state, TimeWindow::Last10).await.summary.total_tests, 0);
    state.stats_cache.invalidate().await;
    assert_eq!(statistics_for(&state, TimeWindow::Last10).await.summary.total_tests, 1);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn completed_write_is_always_visible_to_next_statistics_call() {
    for _ in 0..200 {
      let state = Arc::new(AppState::default());
      let reader = {
        let state = state.clone();
        tokio::spawn(async move { statistics_for(&state, TimeWindow::AllTime).await })
      };
      let writer = {
        let state = state.clone();
        tokio::spawn(async move {
          state
            .store
            .save_result(vec![TestResponse { understood: true, ..Default::default() }], None, TestKind::Listening, now_millis())
            .await
            .unwrap();
          state.stats_cache.invalidate().await;
        })
      };
      reader.await.unwrap();
      writer.await.unwrap();
      assert_eq!(statistics_for(&state, TimeWindow::AllTime).await.summary.total_tests, 1);
    }
  }

  #[tokio::test]
  async fn recommendations_need_a_profile() {
    let state = AppState::default();
    assert!(matches!(recommendations_for_latest(&state).await, Err(ApiError::NotFound(_))));
    state.store.save_profile(LearnerProfile::default(), 1).await;
    assert!(!recommendations_for_latest(&state).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn weaknesses_pool_all_results_of_window() {
    let state = AppState::default();
    for w in ["too fast", "unknown words"] {
      let analysis = TestAnalysis { weaknesses: vec![w.to_string()], ..Default::default() };
      state
        .store
        .save_result(vec![TestResponse::default()], Some(analysis), TestKind::Listening, now_millis())
        .await
        .unwrap();
    }
    let (n, shares) = weaknesses_for(&state, TimeWindow::AllTime).await;
    assert_eq!(n, 2);
    assert_eq!(shares.len(), 2);
  }

  #[tokio::test]
  async fn translation_without_client_is_unavailable_unless_cached() {
    let state = AppState::default();
    assert!(matches!(translate_cached(&state, "Hola").await, Err(ApiError::Unavailable(_))));
    state.translations.insert("Hola", "Hello").await;
    assert_eq!(translate_cached(&state, "Hola").await.unwrap(), ("Hello".to_string(), true));
  }

  #[test]
  fn window_parsing() {
    assert_eq!(parse_window(None).unwrap(), TimeWindow::Last10);
    assert_eq!(parse_window(Some("all_time")).unwrap(), TimeWindow::AllTime);
    assert!(matches!(parse_window(Some("week")), Err(ApiError::BadRequest(_))));
  }
}
