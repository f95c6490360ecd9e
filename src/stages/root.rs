use std::fs;

use super::{DeployContext, Stage};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::copier::ParentDirs;
use crate::error::{DeployError, DeployResult};

/// Copies top-level files, deploying the live configuration as the default one.
pub struct DeployRoot {
  live_config_file: String,
  default_config_file: String,
}

impl DeployRoot {
  /// `live_config_file` is deployed under the name `default_config_file`; the source's own
  /// `default_config_file` is a developer config and never deployed.
  pub fn new(live_config_file: impl Into<String>, default_config_file: impl Into<String>) -> Self {
    Self {
      live_config_file: live_config_file.into(),
      default_config_file: default_config_file.into(),
    }
  }

  fn target_name<'n>(&'n self, name: &'n str) -> Option<&'n str> {
    if name == self.default_config_file || name == DEFAULT_CONFIG_FILE {
      None
    } else if name == self.live_config_file {
      Some(&self.default_config_file)
    } else {
      Some(name)
    }
  }
}

impl Stage for DeployRoot {
  fn status(&self) -> String {
    "Deploying root files...".into()
  }

  fn run(&self, context: &mut DeployContext<'_>) -> DeployResult<()> {
    let source_dir = &context.source_dir;
    let mut files = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(|err| DeployError::io(source_dir, err))? {
      let entry = entry.map_err(|err| DeployError::io(source_dir, err))?;
      if !entry.path().is_dir() {
        files.push(entry.file_name());
      }
    }
    files.sort();

    let copier = context.copier();
    for file in files {
      let name = file.to_string_lossy();
      let Some(target_name) = self.target_name(&name) else {
        continue;
      };
      copier.copy_file(
        &source_dir.join(&file),
        &context.target_dir.join(target_name),
        ParentDirs::Existing,
      )?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_live_config_and_skips_developer_config() {
    let stage = DeployRoot::new("config.live.php", "config.php");
    assert_eq!(stage.target_name("config.live.php"), Some("config.php"));
    assert_eq!(stage.target_name("config.php"), None);
    assert_eq!(stage.target_name(DEFAULT_CONFIG_FILE), None);
    assert_eq!(stage.target_name("bootstrap.php"), Some("bootstrap.php"));
  }
}
