//! In-memory persistence for learner profiles and mini-test results.
//!
//! Profiles are append-only snapshots; the latest one by `completed_at` is authoritative.
//! Results are append-only and deletable by id. Listing is always newest first.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{LearnerProfile, TestAnalysis, TestKind, TestResponse, TestResult};
use crate::error::ApiError;

#[derive(Clone, Default)]
pub struct AssessmentStore {
    profiles: Arc<RwLock<Vec<LearnerProfile>>>,
    results: Arc<RwLock<Vec<TestResult>>>,
}

impl AssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new profile snapshot. A zero `completed_at` is replaced by `now_ms`.
    #[instrument(level = "info", skip(self, profile))]
    pub async fn save_profile(&self, mut profile: LearnerProfile, now_ms: i64) -> String {
        profile.id = Uuid::new_v4().to_string();
        if profile.completed_at == 0 {
            profile.completed_at = now_ms;
        }
        let id = profile.id.clone();
        info!(target: "assessment", %id, listening_level = profile.listening_level, "Profile saved");
        self.profiles.write().await.push(profile);
        id
    }

    /// Latest profile; later insertions win ties on `completed_at`.
    pub async fn latest_profile(&self) -> Option<LearnerProfile> {
        let profiles = self.profiles.read().await;
        profiles
            .iter()
            .enumerate()
            .max_by_key(|(i, p)| (p.completed_at, *i))
            .map(|(_, p)| p.clone())
    }

    /// Score a finished test and append it.
    #[instrument(level = "info", skip(self, responses, analysis), fields(n = responses.len()))]
    pub async fn save_result(
        &self,
        responses: Vec<TestResponse>,
        analysis: Option<TestAnalysis>,
        kind: TestKind,
        now_ms: i64,
    ) -> Result<String, ApiError> {
        if responses.is_empty() {
            warn!(target: "assessment", "Rejected result without responses");
            return Err(ApiError::bad_request("No responses provided"));
        }

        let responses: Vec<TestResponse> = responses
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.sentence_id = i;
                r
            })
            .collect();
        let score = responses.iter().filter(|r| r.understood).count() as u32;
        let result = TestResult {
            id: Uuid::new_v4().to_string(),
            taken_at: now_ms,
            kind,
            score,
            total_questions: responses.len() as u32,
            responses,
            analysis,
        };
        let id = result.id.clone();
        info!(target: "assessment", %id, score, total = result.total_questions, "Result saved");
        self.results.write().await.push(result);
        Ok(id)
    }

    /// Page of results, newest first.
    pub async fn list_results(&self, limit: usize, offset: usize) -> Vec<TestResult> {
        self.all_results()
            .await
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect()
    }

    /// Every result, newest first.
    pub async fn all_results(&self) -> Vec<TestResult> {
        let mut all = self.results.read().await.clone();
        all.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        all
    }

    #[instrument(level = "info", skip(self))]
    pub async fn delete_result(&self, id: &str) -> Result<(), ApiError> {
        let mut results = self.results.write().await;
        let before = results.len();
        results.retain(|r| r.id != id);
        if results.len() == before {
            return Err(ApiError::not_found(format!("Unknown result id: {}", id)));
        }
        info!(target: "assessment", %id, "Result deleted");
        Ok(())
    }
}
