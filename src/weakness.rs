//! Weakness classifier: buckets free-text weakness descriptions into a fixed taxonomy.
//!
//! Matching is plain case-insensitive substring containment. A single string may count
//! toward several categories; downstream percentage displays rely on that double counting.

use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaknessCategory {
  Vocabulary,
  Speed,
  Linking,
  Accent,
  Noise,
  Comprehension,
}

impl WeaknessCategory {
  /// Taxonomy in table order.
  pub const ALL: [WeaknessCategory; 6] = [
    WeaknessCategory::Vocabulary,
    WeaknessCategory::Speed,
    WeaknessCategory::Linking,
    WeaknessCategory::Accent,
    WeaknessCategory::Noise,
    WeaknessCategory::Comprehension,
  ];

  /// Lower-case substrings that put a weakness into this category.
  pub fn keywords(&self) -> &'static [&'static str] {
    match self {
      WeaknessCategory::Vocabulary => &["vocabulary", "vocab", "word", "words", "unfamiliar"],
      WeaknessCategory::Speed => &["speed", "fast", "quick", "pace", "rapid"],
      WeaknessCategory::Linking => &["linking", "connected", "blending", "weak form", "reduction"],
      WeaknessCategory::Accent => &["accent", "pronunciation", "dialect", "native speaker"],
      WeaknessCategory::Noise => &["noise", "background", "clarity", "audio quality"],
      WeaknessCategory::Comprehension => &["understand", "comprehension", "meaning", "context"],
    }
  }

  /// Key used in chart series (`weaknessEvolution`).
  pub fn key(&self) -> &'static str {
    match self {
      WeaknessCategory::Vocabulary => "vocabulary",
      WeaknessCategory::Speed => "speed",
      WeaknessCategory::Linking => "linking",
      WeaknessCategory::Accent => "accent",
      WeaknessCategory::Noise => "noise",
      WeaknessCategory::Comprehension => "comprehension",
    }
  }

  fn index(&self) -> usize {
    match self {
      WeaknessCategory::Vocabulary => 0,
      WeaknessCategory::Speed => 1,
      WeaknessCategory::Linking => 2,
      WeaknessCategory::Accent => 3,
      WeaknessCategory::Noise => 4,
      WeaknessCategory::Comprehension => 5,
    }
  }

  fn matches(&self, lowered: &str) -> bool {
    self.keywords().iter().any(|k| lowered.contains(k))
  }
}

/// One row of the ranked breakdown.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeaknessShare {
  pub category: WeaknessCategory,
  pub count: u32,
  pub percentage: f64,
}

/// Per-category match counts for one list of weaknesses, indexed in taxonomy order.
pub fn count_matches<S: AsRef<str>>(weaknesses: &[S]) -> [u32; 6] {
  let mut counts = [0u32; 6];
  for text in weaknesses {
    let lowered = text.as_ref().to_lowercase();
    for cat in WeaknessCategory::ALL {
      if cat.matches(&lowered) {
        counts[cat.index()] += 1;
      }
    }
  }
  counts
}

/// Rank categories by their share of all keyword matches.
///
/// Percentages are `100 * count / total_matches`. No match at all yields an empty list.
/// Ties keep the order in which categories were first matched.
#[instrument(level = "debug", skip(weaknesses), fields(n = weaknesses.len()))]
pub fn classify_weaknesses<S: AsRef<str>>(weaknesses: &[S]) -> Vec<WeaknessShare> {
  let mut counts = [0u32; 6];
  let mut discovered: Vec<WeaknessCategory> = Vec::new();
  let mut total_matches = 0u32;

  for text in weaknesses {
    let lowered = text.as_ref().to_lowercase();
    for cat in WeaknessCategory::ALL {
      if cat.matches(&lowered) {
        if counts[cat.index()] == 0 {
          discovered.push(cat);
        }
        counts[cat.index()] += 1;
        total_matches += 1;
      }
    }
  }

  if total_matches == 0 {
    debug!(target: "assessment", "No weakness matched the taxonomy");
    return Vec::new();
  }

  let mut shares: Vec<WeaknessShare> = discovered
    .into_iter()
    .map(|category| {
      let count = counts[category.index()];
      WeaknessShare { category, count, percentage: 100.0 * count as f64 / total_matches as f64 }
    })
    .collect();
  // sort_by is stable, so equal percentages keep discovery order.
  shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
  shares
}
