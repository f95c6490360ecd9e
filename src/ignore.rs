//! `.deployignore` rules deciding which source files never reach the target directory.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};

use crate::asset_paths::normalize_slashes;
use crate::error::{DeployError, DeployResult};

/// Default ignore file name searched for in the source root.
pub const DEFAULT_IGNORE_FILE: &str = ".deployignore";

/// Trait describing ignore filters consulted before every copy and bundle.
pub trait IgnoreFilter {
  /// Returns `true` when the file must be left out of the deployment.
  fn is_ignored(&self, path: &Path) -> bool;
}

/// Ignore rules loaded from the source root.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
  base_dir: PathBuf,
  patterns: Vec<Pattern>,
  directories: Vec<String>,
}

impl IgnoreRules {
  /// Rules that ignore nothing except the ignore file itself.
  pub fn empty(base_dir: impl Into<PathBuf>, ignore_file: &str) -> Self {
    let mut rules = Self {
      base_dir: base_dir.into(),
      patterns: Vec::new(),
      directories: Vec::new(),
    };
    rules.push_rule(ignore_file);
    rules
  }

  /// Load rules from `<base_dir>/<ignore_file>`. A missing file yields [`IgnoreRules::empty`].
  pub fn load(base_dir: impl Into<PathBuf>, ignore_file: &str) -> DeployResult<Self> {
    let base_dir = base_dir.into();
    let path = base_dir.join(ignore_file);
    let contents = match fs::read_to_string(&path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        return Ok(Self::empty(base_dir, ignore_file));
      }
      Err(err) => return Err(DeployError::io(&path, err)),
    };

    let mut rules = Self::empty(base_dir, ignore_file);
    for line in contents.lines() {
      let rule = line.trim();
      if rule.is_empty() || rule.starts_with('#') {
        continue;
      }
      rules.push_rule(&rule.replace('\\', "/"));
    }
    debug!(
      path = %path.display(),
      patterns = rules.patterns.len(),
      directories = rules.directories.len(),
      "loaded ignore rules"
    );
    Ok(rules)
  }

  fn push_rule(&mut self, rule: &str) {
    if rule.ends_with('/') && !rule.contains(['*', '?']) {
      self.directories.push(rule.trim_end_matches('/').to_string());
      return;
    }
    match Pattern::new(rule) {
      Ok(pattern) => self.patterns.push(pattern),
      Err(err) => warn!(rule, error = %err, "skipping invalid ignore pattern"),
    }
  }

  /// Determine whether `path` is excluded from deployment.
  ///
  /// Absolute paths are interpreted relative to the source root; anything outside it is
  /// never ignored.
  pub fn is_ignored(&self, path: &Path) -> bool {
    let relative = if path.is_absolute() {
      match path.strip_prefix(&self.base_dir) {
        Ok(relative) => relative,
        Err(_) => return false,
      }
    } else {
      path
    };
    let relative = normalize_slashes(relative);

    if self.patterns.iter().any(|pattern| pattern.matches(&relative)) {
      return true;
    }
    self.directories.iter().any(|directory| {
      relative == *directory
        || relative
          .strip_prefix(directory.as_str())
          .is_some_and(|rest| rest.starts_with('/'))
    })
  }
}

impl IgnoreFilter for IgnoreRules {
  fn is_ignored(&self, path: &Path) -> bool {
    IgnoreRules::is_ignored(self, path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn rules_from(content: &str) -> (tempfile::TempDir, IgnoreRules) {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join(DEFAULT_IGNORE_FILE), content).expect("failed to write rules");
    let rules = IgnoreRules::load(temp.path(), DEFAULT_IGNORE_FILE).expect("rules should load");
    (temp, rules)
  }

  #[test]
  fn missing_file_only_ignores_itself() {
    let temp = tempdir().unwrap();
    let rules = IgnoreRules::load(temp.path(), DEFAULT_IGNORE_FILE).unwrap();

    assert!(rules.is_ignored(&temp.path().join(".deployignore")));
    assert!(!rules.is_ignored(&temp.path().join("frontend/app/app.js")));
  }

  #[test]
  fn skips_comments_and_blank_lines() {
    let (temp, rules) = rules_from("# comment\n\n   \n*.log\n");
    assert!(rules.is_ignored(&temp.path().join("backend/debug.log")));
    assert!(!rules.is_ignored(&temp.path().join("# comment")));
  }

  #[test]
  fn glob_star_crosses_directories() {
    let (temp, rules) = rules_from("pages/*/dev.js\nfrontend/*.map");
    assert!(rules.is_ignored(&temp.path().join("pages/login/dev.js")));
    assert!(rules.is_ignored(&temp.path().join("frontend/leuce/leuce.js.map")));
    assert!(!rules.is_ignored(&temp.path().join("pages/login/View.js")));
  }

  #[test]
  fn directory_rules_match_whole_components() {
    let (temp, rules) = rules_from("pages/install/\r\nbackend\\cache/\n");
    assert!(rules.is_ignored(&temp.path().join("pages/install")));
    assert!(rules.is_ignored(&temp.path().join("pages/install/Model.js")));
    assert!(rules.is_ignored(&temp.path().join("backend/cache/a.bin")));
    assert!(!rules.is_ignored(&temp.path().join("pages/installer/Model.js")));
  }

  #[test]
  fn relative_paths_are_matched_directly() {
    let (_temp, rules) = rules_from("frontend/leuce-1.0.0/");
    assert!(rules.is_ignored(Path::new("frontend/leuce-1.0.0/leuce.js")));
  }

  #[test]
  fn paths_outside_the_base_are_kept() {
    let (_temp, rules) = rules_from("*.js");
    let outside = tempdir().unwrap();
    assert!(!rules.is_ignored(&outside.path().join("app.js")));
  }
}
