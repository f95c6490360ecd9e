use super::{DeployContext, Stage};
use crate::error::DeployResult;

/// Copies one top-level source directory verbatim.
pub struct DeployDirectory {
  name: String,
}

impl DeployDirectory {
  /// Deploy `<source>/<name>` into `<target>/<name>`.
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl Stage for DeployDirectory {
  fn status(&self) -> String {
    format!("Deploying '{}' directory...", self.name)
  }

  fn run(&self, context: &mut DeployContext<'_>) -> DeployResult<()> {
    context.copier().copy_tree(
      &context.source_dir.join(&self.name),
      &context.target_dir.join(&self.name),
      &[],
    )
  }
}
