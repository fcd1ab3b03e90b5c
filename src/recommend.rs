//! Recommendation engine: turns a learner profile and the latest mini-test into a short,
//! ordered list of advice.
//!
//! Rules run in a fixed priority order and each appends at most one line. The list is
//! deduplicated and cut to `MAX_RECOMMENDATIONS`, so earlier rules win when truncating.

use tracing::{debug, instrument};

use crate::domain::{Difficulty, LearnerProfile, LearningGoal, SkillFocus, TestKind, TestResult};

pub const MAX_RECOMMENDATIONS: usize = 6;

/// Highest self-rated level.
pub const MAX_LEVEL: i32 = 5;

/// Expected `[min, max]` score on a 10-question mini-test, per self-rated level.
const EXPECTED_SCORES: [(u32, u32); 6] = [(0, 2), (2, 4), (3, 6), (5, 7), (6, 9), (8, 10)];

/// Row used when the level is outside the table.
const DEFAULT_LEVEL: i32 = 2;

/// Expected score range for a level, with the level the range belongs to.
/// Out-of-range levels fall back to the middle row.
pub fn expected_score_range(level: i32) -> (i32, u32, u32) {
  let level = if (0..=MAX_LEVEL).contains(&level) { level } else { DEFAULT_LEVEL };
  let (min, max) = EXPECTED_SCORES[level as usize];
  (level, min, max)
}

fn difficulty_advice(d: Difficulty) -> Option<&'static str> {
  match d {
    Difficulty::Speed => Some("Slow playback down to 0.75x and raise it step by step as sentences become clear."),
    Difficulty::Linking => Some("Focus on connected speech: practise how words blend and shrink in natural sentences."),
    Difficulty::Vocabulary => Some("Build vocabulary first: review the words you marked before listening again."),
    Difficulty::Accent => Some("Expose yourself to varied speakers and accents instead of a single voice."),
    Difficulty::Noise => Some("Start with clean studio audio, then move to recordings with background noise."),
    Difficulty::Other => None,
  }
}

fn goal_advice(g: LearningGoal) -> Option<&'static str> {
  match g {
    LearningGoal::Travel => Some("Practise with short everyday dialogues: directions, ordering food, transport announcements."),
    LearningGoal::Work => Some("Listen to meetings, interviews and presentations to get used to professional vocabulary."),
    LearningGoal::Exam => Some("Train with timed exercises that mirror the exam format and only one replay."),
    LearningGoal::Entertainment => Some("Watch the shows you enjoy and replay the scenes you missed without subtitles."),
    LearningGoal::Conversation => Some("Shadow short dialogues aloud to connect listening with natural responses."),
    LearningGoal::Other => None,
  }
}

fn skill_advice(s: SkillFocus) -> Option<&'static str> {
  match s {
    SkillFocus::Listening => Some("Do a short daily dictation to sharpen sound-to-word recognition."),
    SkillFocus::Reading => Some("Read the transcript after each listening session to reinforce new words."),
    SkillFocus::Speaking => Some("Repeat each sentence after the speaker to train rhythm and intonation."),
    SkillFocus::Writing => Some("Write a short summary of what you heard to consolidate it."),
    SkillFocus::Vocabulary => Some("Turn unknown words from each test into flashcards and review them daily."),
    SkillFocus::Grammar => Some("Note recurring sentence patterns in what you hear and look them up."),
    SkillFocus::Other => None,
  }
}

/// Latest result by `taken_at`, independent of storage order.
pub fn latest_result(results: &[TestResult]) -> Option<&TestResult> {
  results.iter().max_by_key(|r| r.taken_at)
}

fn score_vs_expectation(profile: &LearnerProfile, latest: &TestResult) -> Option<String> {
  let self_rating = match latest.kind {
    TestKind::Listening => profile.listening_level,
    TestKind::Reading => profile.reading_level,
  };
  let (level, min, max) = expected_score_range(self_rating);

  if latest.score < min {
    if level == 0 {
      Some("Your last score was below the expected range. Start with easier material: slow, clearly articulated speech on familiar topics.".to_string())
    } else {
      Some(format!(
        "Your last score ({}/{}) was below the range expected at level {}. Step down to level {} material for a while.",
        latest.score, latest.total_questions, level, level - 1
      ))
    }
  } else if latest.score > max && level < MAX_LEVEL {
    Some(format!(
      "Your last score ({}/{}) exceeded the range expected at level {}. You are ready for level {} material.",
      latest.score, latest.total_questions, level, level + 1
    ))
  } else {
    None
  }
}

/// Ordered advice for a learner, at most `MAX_RECOMMENDATIONS` lines and never empty.
#[instrument(level = "debug", skip(profile, latest), fields(has_latest = latest.is_some()))]
pub fn recommend(profile: &LearnerProfile, latest: Option<&TestResult>) -> Vec<String> {
  let mut out: Vec<String> = Vec::new();

  if let Some(r) = latest {
    out.extend(score_vs_expectation(profile, r));
  }

  for d in &profile.difficulties {
    out.extend(difficulty_advice(*d).map(str::to_string));
  }

  if profile.subtitle_dependence >= 2 {
    out.push("Wean yourself off subtitles: switch to target-language subtitles, then turn them off for short scenes.".to_string());
  } else if profile.subtitle_dependence == 0 {
    out.push("You already cope without subtitles. Increase difficulty with faster or less scripted content.".to_string());
  }

  if let Some(speed) = profile.speaking_speed {
    if speed <= 1 && profile.listening_level >= 3 {
      out.push("Your level allows more: increase playback speed toward natural pace.".to_string());
    }
    if speed >= 3 && profile.listening_level <= 2 {
      out.push("Start with slower speech before tackling fast native speakers.".to_string());
    }
  }

  if let Some(goal) = profile.learning_goal {
    out.extend(goal_advice(goal).map(str::to_string));
  }

  for s in &profile.skills_focus {
    out.extend(skill_advice(*s).map(str::to_string));
  }

  out.push(format!(
    "Keep practising with {} at level {}.",
    profile.target_content.label(),
    profile.listening_level
  ));

  let mut unique: Vec<String> = Vec::with_capacity(out.len());
  for line in out {
    if !unique.contains(&line) {
      unique.push(line);
    }
  }
  unique.truncate(MAX_RECOMMENDATIONS);
  debug!(target: "assessment", count = unique.len(), "Recommendations computed");
  unique
}
