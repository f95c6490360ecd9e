use std::fs;
use std::io::ErrorKind;

use chrono::Local;
use tracing::info;

use super::{DeployContext, Stage};
use crate::error::{DeployError, DeployResult};

/// Creates the uniquely named output directory and points the context at it.
pub struct CreateTargetDirectory {
  name: Option<String>,
}

impl CreateTargetDirectory {
  /// Name the directory after the current local time, e.g. `20250617_175920`.
  pub fn timestamped() -> Self {
    Self { name: None }
  }

  /// Use a fixed directory name instead of a timestamp.
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
    }
  }
}

impl Stage for CreateTargetDirectory {
  fn status(&self) -> String {
    "Creating target directory...".into()
  }

  fn run(&self, context: &mut DeployContext<'_>) -> DeployResult<()> {
    let name = self
      .name
      .clone()
      .unwrap_or_else(|| Local::now().format("%Y%m%d_%H%M%S").to_string());
    let target = context.target_dir.join(name);

    fs::create_dir_all(&context.target_dir).map_err(|err| DeployError::io(&context.target_dir, err))?;
    match fs::create_dir(&target) {
      Ok(()) => {}
      Err(err) if err.kind() == ErrorKind::AlreadyExists => {
        return Err(DeployError::TargetExists { path: target });
      }
      Err(err) => return Err(DeployError::io(&target, err)),
    }
    info!(path = %target.display(), "created target directory");
    context.target_dir = target;
    Ok(())
  }
}
