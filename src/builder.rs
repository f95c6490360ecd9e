//! Deployment orchestrator wiring configuration, collaborators and stages together.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::bundle::Minifier;
use crate::config::DeployConfig;
use crate::error::DeployResult;
use crate::ignore::IgnoreRules;
use crate::stages::{
  CreateTargetDirectory, DeployContext, DeployDirectory, DeployFrontend, DeployPages, DeployRoot,
  Pipeline,
};

/// High-level helper running a full deployment of one source tree.
pub struct Deployer<'a> {
  config: &'a DeployConfig,
  minifier: &'a dyn Minifier,
}

impl<'a> Deployer<'a> {
  /// Create a deployer for the provided configuration and minifier.
  pub fn new(config: &'a DeployConfig, minifier: &'a dyn Minifier) -> Self {
    Self { config, minifier }
  }

  /// Stages of a standard deployment, in order.
  pub fn pipeline(&self) -> Pipeline {
    self.pipeline_with_target(CreateTargetDirectory::timestamped())
  }

  fn pipeline_with_target(&self, create_target: CreateTargetDirectory) -> Pipeline {
    let config = self.config;
    let mut pipeline = Pipeline::default();
    pipeline.push(create_target);
    for name in &config.plain_dirs_before {
      pipeline.push(DeployDirectory::new(name.as_str()));
    }
    pipeline.push(DeployFrontend::new(
      config.frontend_dir.as_str(),
      config.manifest_file.as_str(),
    ));
    for name in &config.plain_dirs_after_frontend {
      pipeline.push(DeployDirectory::new(name.as_str()));
    }
    pipeline.push(DeployPages::new(
      config.pages_dir.as_str(),
      config.manifest_file.as_str(),
    ));
    for name in &config.plain_dirs_after_pages {
      pipeline.push(DeployDirectory::new(name.as_str()));
    }
    pipeline.push(DeployRoot::new(
      config.live_config_file.as_str(),
      config.default_config_file.as_str(),
    ));
    pipeline
  }

  /// Deploy `source_dir` into a new timestamped directory below `target_root`.
  ///
  /// Returns the directory that was created.
  pub fn deploy(&self, source_dir: &Path, target_root: &Path) -> DeployResult<PathBuf> {
    self.run(self.pipeline(), source_dir, target_root)
  }

  /// Deploy into `<target_root>/<name>` instead of a timestamped directory.
  pub fn deploy_named(&self, source_dir: &Path, target_root: &Path, name: &str) -> DeployResult<PathBuf> {
    let pipeline = self.pipeline_with_target(CreateTargetDirectory::named(name));
    self.run(pipeline, source_dir, target_root)
  }

  fn run(&self, pipeline: Pipeline, source_dir: &Path, target_root: &Path) -> DeployResult<PathBuf> {
    let ignore = IgnoreRules::load(source_dir, &self.config.ignore_file)?;
    let mut context = DeployContext::new(source_dir, target_root, &ignore, self.minifier);
    pipeline.run(&mut context)?;
    info!(path = %context.target_dir.display(), "deployment complete");
    Ok(context.target_dir)
  }
}
