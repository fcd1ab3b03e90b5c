//! Trend aggregation over the test history: windowing, chart series and summary statistics.
//!
//! All functions are pure. "Now" is passed in by the caller so windows are reproducible.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::domain::TestResult;
use crate::weakness::{count_matches, WeaknessCategory};

const LAST_N_TESTS: usize = 10;
const LAST_DAYS_MS: i64 = 30 * 24 * 3600 * 1000;
/// Below this many tests the improvement rate is reported as flat.
const MIN_TESTS_FOR_TREND: usize = 4;

/// Subset of history used for charts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TimeWindow {
  /// Most recent ten tests.
  #[default]
  Last10,
  /// Tests taken during the last thirty days.
  Last30,
  AllTime,
}

impl TimeWindow {
  pub fn as_str(&self) -> &'static str {
    match self {
      TimeWindow::Last10 => "last_10",
      TimeWindow::Last30 => "last_30",
      TimeWindow::AllTime => "all_time",
    }
  }
}

impl fmt::Display for TimeWindow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TimeWindow {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "last_10" => Ok(TimeWindow::Last10),
      "last_30" => Ok(TimeWindow::Last30),
      "all_time" => Ok(TimeWindow::AllTime),
      other => Err(format!("Invalid window parameter: {}", other)),
    }
  }
}

/// One chart point per test.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
  pub test_number: usize,
  pub date: i64,
  pub score: u32,
  pub replays: u64,
  pub reaction_time: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub total_tests: usize,
  pub avg_score: f64,
  pub best_score: u32,
  pub improvement_rate: String,
}

impl Summary {
  fn empty() -> Self {
    Self { total_tests: 0, avg_score: 0.0, best_score: 0, improvement_rate: "+0%".into() }
  }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
  pub summary: Summary,
  pub score_trend: Vec<ScorePoint>,
  pub weakness_evolution: WeaknessEvolution,
  pub computed_at: i64,
}

/// Match count per test (oldest first) for each category, in taxonomy order.
/// Categories never seen are left out. Serializes as a JSON object keyed by category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeaknessEvolution(Vec<(WeaknessCategory, Vec<u32>)>);

impl WeaknessEvolution {
  pub fn get(&self, category: WeaknessCategory) -> Option<&[u32]> {
    self.0.iter().find(|(c, _)| *c == category).map(|(_, s)| s.as_slice())
  }

  pub fn categories(&self) -> impl Iterator<Item = WeaknessCategory> + '_ {
    self.0.iter().map(|(c, _)| *c)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl Serialize for WeaknessEvolution {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (cat, series) in &self.0 {
      map.serialize_entry(cat.key(), series)?;
    }
    map.end()
  }
}

/// Results of `window`, newest first, whatever order `results` arrive in.
pub fn select_window(results: &[TestResult], window: TimeWindow, now_ms: i64) -> Vec<&TestResult> {
  let mut sorted: Vec<&TestResult> = results.iter().collect();
  sorted.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
  match window {
    TimeWindow::Last10 => {
      sorted.truncate(LAST_N_TESTS);
      sorted
    }
    TimeWindow::Last30 => {
      let cutoff = now_ms - LAST_DAYS_MS;
      sorted.into_iter().filter(|r| r.taken_at >= cutoff).collect()
    }
    TimeWindow::AllTime => sorted,
  }
}

fn mean(xs: &[u32]) -> f64 {
  if xs.is_empty() { 0.0 } else { xs.iter().map(|&x| x as f64).sum::<f64>() / xs.len() as f64 }
}

/// Signed percentage change between the earlier and the later half of `scores` (oldest first).
pub fn improvement_rate(scores: &[u32]) -> String {
  if scores.len() < MIN_TESTS_FOR_TREND {
    return "+0%".into();
  }
  let mid = scores.len() / 2;
  let earlier = mean(&scores[..mid]);
  let later = mean(&scores[mid..]);
  let pct = if earlier > 0.0 {
    (later - earlier) / earlier * 100.0
  } else if later > 0.0 {
    100.0
  } else {
    0.0
  };
  let pct = pct.round() as i64;
  if pct >= 0 { format!("+{}%", pct) } else { format!("{}%", pct) }
}

fn score_point(test_number: usize, r: &TestResult) -> ScorePoint {
  // Client-supplied counters; saturate instead of overflowing.
  let replays = r.responses.iter().fold(0u64, |acc, x| acc.saturating_add(x.replays as u64));
  let reaction_sum = r.responses.iter().fold(0u64, |acc, x| acc.saturating_add(x.reaction_time_ms));
  let divisor = if r.total_questions > 0 { r.total_questions as usize } else { r.responses.len() };
  let reaction_time = if divisor > 0 { reaction_sum as f64 / divisor as f64 } else { 0.0 };
  ScorePoint { test_number, date: r.taken_at, score: r.score, replays, reaction_time }
}

/// Per-category weakness counts for each test of `oldest_first`.
pub fn weakness_evolution(oldest_first: &[&TestResult]) -> WeaknessEvolution {
  let per_test: Vec<[u32; 6]> = oldest_first.iter().map(|r| count_matches(r.weaknesses())).collect();
  let mut out = Vec::new();
  for (i, cat) in WeaknessCategory::ALL.iter().enumerate() {
    let series: Vec<u32> = per_test.iter().map(|c| c[i]).collect();
    if series.iter().any(|&n| n > 0) {
      out.push((*cat, series));
    }
  }
  WeaknessEvolution(out)
}

/// Summary, score trend and weakness evolution for the results of a window.
///
/// `window` must be newest first, as returned by `select_window`.
#[instrument(level = "debug", skip(window), fields(n = window.len()))]
pub fn compute_statistics(window: &[&TestResult], now_ms: i64) -> Statistics {
  if window.is_empty() {
    return Statistics {
      summary: Summary::empty(),
      score_trend: Vec::new(),
      weakness_evolution: WeaknessEvolution::default(),
      computed_at: now_ms,
    };
  }

  let oldest_first: Vec<&TestResult> = window.iter().rev().copied().collect();
  let scores: Vec<u32> = oldest_first.iter().map(|r| r.score).collect();

  let score_sum: u64 = scores.iter().map(|&s| s as u64).sum();
  let question_sum: u64 = oldest_first.iter().map(|r| r.total_questions as u64).sum();
  let avg_score = if question_sum > 0 {
    (score_sum as f64 / question_sum as f64 * 1000.0).round() / 10.0
  } else {
    0.0
  };

  let summary = Summary {
    total_tests: window.len(),
    avg_score,
    best_score: scores.iter().copied().max().unwrap_or(0),
    improvement_rate: improvement_rate(&scores),
  };

  let score_trend = oldest_first
    .iter()
    .enumerate()
    .map(|(i, r)| score_point(i + 1, r))
    .collect();

  debug!(target: "assessment", total = summary.total_tests, avg = summary.avg_score, rate = %summary.improvement_rate, "Statistics computed");

  Statistics {
    summary,
    score_trend,
    weakness_evolution: weakness_evolution(&oldest_first),
    computed_at: now_ms,
  }
}
