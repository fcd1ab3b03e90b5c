//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{TestAnalysis, TestKind, TestResponse};
use crate::weakness::WeaknessShare;

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub window: Option<String>,
}

#[derive(Deserialize)]
pub struct ResultIn {
    #[serde(default)]
    pub responses: Vec<TestResponse>,
    #[serde(default)]
    pub analysis: Option<TestAnalysis>,
    #[serde(default)]
    pub kind: TestKind,
}

#[derive(Serialize)]
pub struct SavedOut {
    pub status: &'static str,
    pub id: String,
}

#[derive(Serialize)]
pub struct DeletedOut {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct RecommendationsOut {
    pub recommendations: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessesOut {
    pub window: String,
    pub total_tests: usize,
    pub categories: Vec<WeaknessShare>,
}

#[derive(Deserialize)]
pub struct TranslateIn {
    pub text: String,
}
#[derive(Serialize)]
pub struct TranslateOut {
    pub translation: String,
    pub cached: bool,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
