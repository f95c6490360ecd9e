use tracing::debug;

use super::{DeployContext, Stage};
use crate::copier::exclude_patterns;
use crate::error::DeployResult;
use crate::manifest::{load_library_manifest, save_library_manifest};

/// Deploys shared libraries declared in the frontend manifest.
pub struct DeployFrontend {
  directory: String,
  manifest_file: String,
}

impl DeployFrontend {
  /// Deploy `<directory>` driven by `<directory>/<manifest_file>`.
  pub fn new(directory: impl Into<String>, manifest_file: impl Into<String>) -> Self {
    Self {
      directory: directory.into(),
      manifest_file: manifest_file.into(),
    }
  }
}

impl Stage for DeployFrontend {
  fn status(&self) -> String {
    format!("Deploying '{}' directory...", self.directory)
  }

  fn run(&self, context: &mut DeployContext<'_>) -> DeployResult<()> {
    let source_dir = context.source_dir.join(&self.directory);
    let target_dir = context.target_dir.join(&self.directory);

    let manifest = load_library_manifest(&source_dir.join(&self.manifest_file))?;
    let assets = context.assets();
    for (name, entry) in &manifest {
      debug!(library = %name, "deploying library");
      assets.deploy_library_entry(entry, &source_dir, &target_dir)?;
    }
    save_library_manifest(&manifest, &target_dir.join(&self.manifest_file))?;

    // Scripts and stylesheets only reach the target through the manifest.
    let exclude = exclude_patterns(["*.js", "*.css", self.manifest_file.as_str()]);
    context.copier().copy_tree(&source_dir, &target_dir, &exclude)
  }
}
