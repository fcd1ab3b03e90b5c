//! Domain models: learner profiles, mini-test results and their per-question responses.
//!
//! Every optional field has a documented default so consumers never need ad hoc
//! null-coalescing. Unknown tag values deserialize into an `Other` variant instead of failing.

use serde::{Deserialize, Serialize};

/// Language the learner is training for.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
  #[default]
  En,
  Fr,
  Es,
  De,
  It,
  Ja,
  Zh,
  #[serde(other)]
  Other,
}

/// Genre of content the learner wants to understand.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentGenre {
  Movies,
  Series,
  Podcasts,
  News,
  Music,
  Youtube,
  Academic,
  #[default]
  General,
  #[serde(other)]
  Other,
}

impl ContentGenre {
  pub fn label(&self) -> &'static str {
    match self {
      ContentGenre::Movies => "movies",
      ContentGenre::Series => "TV series",
      ContentGenre::Podcasts => "podcasts",
      ContentGenre::News => "news",
      ContentGenre::Music => "songs",
      ContentGenre::Youtube => "YouTube videos",
      ContentGenre::Academic => "lectures",
      ContentGenre::General | ContentGenre::Other => "everyday content",
    }
  }
}

/// Self-reported listening difficulty.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Speed,
  Linking,
  Vocabulary,
  Accent,
  Noise,
  #[serde(other)]
  Other,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LearningGoal {
  Travel,
  Work,
  Exam,
  Entertainment,
  Conversation,
  #[serde(other)]
  Other,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SkillFocus {
  Listening,
  Reading,
  Speaking,
  Writing,
  Vocabulary,
  Grammar,
  #[serde(other)]
  Other,
}

/// Which kind of mini-test produced a result.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
  #[default]
  Listening,
  Reading,
}

fn default_level() -> i32 { 2 }
fn default_subtitle_dependence() -> i32 { 1 }

/// Snapshot of a learner's self-assessment. Superseded wholesale on retake, never mutated.
///
/// Defaults: language `en`, content `general`, both levels 2, subtitle dependence 1,
/// empty tag sets, no speaking speed, no goal, `completedAt` 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
  #[serde(default)] pub id: String,
  #[serde(default)] pub target_language: TargetLanguage,
  #[serde(default)] pub target_content: ContentGenre,
  // Levels are signed so that corrupt values from storage survive deserialization.
  #[serde(default = "default_level")] pub listening_level: i32,
  #[serde(default = "default_level")] pub reading_level: i32,
  #[serde(default = "default_subtitle_dependence")] pub subtitle_dependence: i32,
  #[serde(default)] pub difficulties: Vec<Difficulty>,
  #[serde(default)] pub speaking_speed: Option<i32>,
  #[serde(default)] pub learning_goal: Option<LearningGoal>,
  #[serde(default)] pub skills_focus: Vec<SkillFocus>,
  #[serde(default)] pub completed_at: i64,
}

impl Default for LearnerProfile {
  fn default() -> Self {
    Self {
      id: String::new(),
      target_language: TargetLanguage::default(),
      target_content: ContentGenre::default(),
      listening_level: default_level(),
      reading_level: default_level(),
      subtitle_dependence: default_subtitle_dependence(),
      difficulties: Vec::new(),
      speaking_speed: None,
      learning_goal: None,
      skills_focus: Vec::new(),
      completed_at: 0,
    }
  }
}

/// One answered question of a mini-test.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
  #[serde(default)] pub sentence_id: usize,
  #[serde(default)] pub sentence: String,
  #[serde(default)] pub understood: bool,
  #[serde(default)] pub replays: u32,
  #[serde(default)] pub reaction_time_ms: u64,
  #[serde(default)] pub marked_indices: Vec<usize>,
}

/// Feedback produced by the AI text service. Treated as opaque text here.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct TestAnalysis {
  #[serde(default)] pub summary: String,
  #[serde(default)] pub strengths: Vec<String>,
  #[serde(default)] pub weaknesses: Vec<String>,
}

/// One completed mini-test attempt. Append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
  pub id: String,
  pub taken_at: i64,
  #[serde(default)] pub kind: TestKind,
  #[serde(default)] pub score: u32,
  #[serde(default)] pub total_questions: u32,
  #[serde(default)] pub responses: Vec<TestResponse>,
  #[serde(default)] pub analysis: Option<TestAnalysis>,
}

impl TestResult {
  /// Weakness strings of the analysis, empty when the analysis is absent.
  pub fn weaknesses(&self) -> &[String] {
    self.analysis.as_ref().map(|a| a.weaknesses.as_slice()).unwrap_or(&[])
  }
}
