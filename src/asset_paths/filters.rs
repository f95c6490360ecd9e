use regex::Regex;

fn remote_reference_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"))
}

/// Determine whether a manifest reference points at a remote URL.
///
/// Remote references are never copied or bundled; they are carried through to the deployed
/// manifest unchanged. Only `http://` and `https://` count, compared case-insensitively.
pub fn is_remote_reference(value: &str) -> bool {
  remote_reference_pattern().is_match(value)
}
