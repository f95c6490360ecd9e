//! Deployment stages and the pipeline that runs them in order.

mod directory;
mod frontend;
mod pages;
mod root;
mod target;

use std::path::PathBuf;

use tracing::info;

pub use directory::DeployDirectory;
pub use frontend::DeployFrontend;
pub use pages::DeployPages;
pub use root::DeployRoot;
pub use target::CreateTargetDirectory;

use crate::bundle::Minifier;
use crate::copier::Copier;
use crate::error::DeployResult;
use crate::ignore::IgnoreFilter;
use crate::resolver::AssetDeployer;

/// State threaded through the stages of one deployment run.
pub struct DeployContext<'a> {
  /// Root of the project being deployed.
  pub source_dir: PathBuf,
  /// Output directory; replaced by its timestamped child once that has been created.
  pub target_dir: PathBuf,
  ignore: &'a dyn IgnoreFilter,
  minifier: &'a dyn Minifier,
}

impl<'a> DeployContext<'a> {
  /// Create a context with explicitly injected collaborators.
  pub fn new(
    source_dir: impl Into<PathBuf>,
    target_dir: impl Into<PathBuf>,
    ignore: &'a dyn IgnoreFilter,
    minifier: &'a dyn Minifier,
  ) -> Self {
    Self {
      source_dir: source_dir.into(),
      target_dir: target_dir.into(),
      ignore,
      minifier,
    }
  }

  /// File copier honouring the ignore rules.
  pub fn copier(&self) -> Copier<'a> {
    Copier::new(self.ignore)
  }

  /// Manifest asset deployer built from the context's collaborators.
  pub fn assets(&self) -> AssetDeployer<'a> {
    AssetDeployer::new(self.ignore, self.copier(), self.minifier)
  }
}

/// A single step of the deployment.
pub trait Stage {
  /// Progress message logged before the stage runs.
  fn status(&self) -> String;

  /// Execute the stage.
  fn run(&self, context: &mut DeployContext<'_>) -> DeployResult<()>;
}

/// Ordered list of stages; the first failure stops the run.
#[derive(Default)]
pub struct Pipeline {
  stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
  /// Append a stage.
  pub fn push(&mut self, stage: impl Stage + 'static) {
    self.stages.push(Box::new(stage));
  }

  /// Number of stages in the pipeline.
  pub fn len(&self) -> usize {
    self.stages.len()
  }

  /// Whether the pipeline has no stages.
  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  /// Run every stage in order.
  ///
  /// The first error is returned immediately; later stages do not run and whatever was
  /// already written to the target directory stays in place.
  pub fn run(&self, context: &mut DeployContext<'_>) -> DeployResult<()> {
    for stage in &self.stages {
      info!("{}", stage.status());
      stage.run(context)?;
    }
    Ok(())
  }
}
