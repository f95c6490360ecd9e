//! Deployment configuration loader describing the project layout and tooling.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::bundle::minifier::DEFAULT_MINIFIER;
use crate::ignore::DEFAULT_IGNORE_FILE;

/// Configuration file looked up in the source directory.
pub const DEFAULT_CONFIG_FILE: &str = "deploy.config.json";

/// Discoverable configuration describing source layout, file names and the minifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
  /// Path to the esbuild executable.
  pub minifier_path: PathBuf,
  /// Manifest file name used by the frontend directory and by each page.
  pub manifest_file: String,
  /// Ignore rule file name in the source root.
  pub ignore_file: String,
  /// Directory holding shared libraries and the library manifest.
  pub frontend_dir: String,
  /// Directory holding one subdirectory per page.
  pub pages_dir: String,
  /// Directories copied verbatim before the frontend is deployed.
  pub plain_dirs_before: Vec<String>,
  /// Directories copied verbatim between the frontend and the pages.
  pub plain_dirs_after_frontend: Vec<String>,
  /// Directories copied verbatim after the pages.
  pub plain_dirs_after_pages: Vec<String>,
  /// Root file deployed in place of the default configuration.
  pub live_config_file: String,
  /// Root configuration file name in the deployed tree.
  pub default_config_file: String,
}

impl Default for DeployConfig {
  fn default() -> Self {
    Self {
      minifier_path: DEFAULT_MINIFIER.into(),
      manifest_file: "manifest.json".into(),
      ignore_file: DEFAULT_IGNORE_FILE.into(),
      frontend_dir: "frontend".into(),
      pages_dir: "pages".into(),
      plain_dirs_before: vec!["assets".into(), "backend".into()],
      plain_dirs_after_frontend: vec!["masterpages".into()],
      plain_dirs_after_pages: vec!["templates".into()],
      live_config_file: "config.live.php".into(),
      default_config_file: "config.php".into(),
    }
  }
}

impl DeployConfig {
  /// Attempt to load configuration from the source directory.
  ///
  /// A missing file yields the defaults; an unparseable file is reported and also falls back
  /// to the defaults so a deployment still follows the framework's standard layout.
  pub fn discover(source_dir: &Path) -> Self {
    let candidate = source_dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
      return Self::default();
    }
    match Self::from_path(&candidate) {
      Ok(config) => config,
      Err(reason) => {
        warn!(path = %candidate.display(), reason = %format!("{reason:#}"), "ignoring unreadable deploy configuration");
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> anyhow::Result<Self> {
    use anyhow::Context;

    let content =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
  }
}
