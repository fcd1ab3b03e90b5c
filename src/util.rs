//! Small utility helpers used across modules.

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
  chrono::Utc::now().timestamp_millis()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole sentences or model replies.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    format!("{}… ({} bytes total)", s.chars().take(max).collect::<String>(), s.len())
  }
}
