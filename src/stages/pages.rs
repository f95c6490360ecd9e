use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::{DeployContext, Stage};
use crate::copier::exclude_patterns;
use crate::error::{DeployError, DeployResult};
use crate::manifest::{load_page_manifest, save_page_manifest};
use crate::transform::transform_page_entry;

/// Deploys every page directory, bundling manifest-declared assets per page.
pub struct DeployPages {
  directory: String,
  manifest_file: String,
}

impl DeployPages {
  /// Deploy each subdirectory of `<directory>`; page manifests are named `manifest_file`.
  pub fn new(directory: impl Into<String>, manifest_file: impl Into<String>) -> Self {
    Self {
      directory: directory.into(),
      manifest_file: manifest_file.into(),
    }
  }

  fn deploy_page(&self, context: &DeployContext<'_>, source: &Path, target: &Path) -> DeployResult<()> {
    let manifest_path = source.join(&self.manifest_file);
    // A page without a manifest has nothing to bundle.
    if manifest_path.is_file() {
      let entry = load_page_manifest(&manifest_path)?;
      context.assets().deploy_page_entry(&entry, source, target)?;
      save_page_manifest(&transform_page_entry(&entry), &target.join(&self.manifest_file))?;
    }

    let exclude = exclude_patterns(["*.js", "*.css", self.manifest_file.as_str()]);
    context.copier().copy_tree(source, target, &exclude)
  }
}

impl Stage for DeployPages {
  fn status(&self) -> String {
    format!("Deploying '{}' directory...", self.directory)
  }

  fn run(&self, context: &mut DeployContext<'_>) -> DeployResult<()> {
    let source_dir = context.source_dir.join(&self.directory);
    let target_dir = context.target_dir.join(&self.directory);
    if !source_dir.is_dir() {
      warn!(path = %source_dir.display(), "pages directory not found");
      return Ok(());
    }

    let mut pages = Vec::new();
    for entry in fs::read_dir(&source_dir).map_err(|err| DeployError::io(&source_dir, err))? {
      let entry = entry.map_err(|err| DeployError::io(&source_dir, err))?;
      if entry.path().is_dir() {
        pages.push(entry.file_name());
      }
    }
    pages.sort();

    for page in pages {
      debug!(page = %page.to_string_lossy(), "deploying page");
      self.deploy_page(context, &source_dir.join(&page), &target_dir.join(&page))?;
    }
    Ok(())
  }
}
