//! Command line entry point for deploying a Daphne project.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use daphne_deployer::{DeployConfig, Deployer, Esbuild, logging};
use tracing::error;

/// Deployment tool for the Daphne Web Framework.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
  /// Directory containing the source files for deployment. It may include a
  /// `.deployignore` file to exclude specific files and directories.
  #[arg(long = "sourcedir", value_name = "DIR")]
  source_dir: PathBuf,

  /// Directory to store the deployed files. A timestamped subdirectory
  /// (e.g. `20250617_175920`) is created within it for the deployed content.
  #[arg(long = "targetdir", value_name = "DIR")]
  target_dir: PathBuf,

  /// esbuild executable; overrides the configured `minifier_path`.
  #[arg(long, value_name = "PATH")]
  minifier: Option<PathBuf>,

  /// Explicit configuration file instead of `<sourcedir>/deploy.config.json`.
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Log every asset decision.
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  logging::init(cli.verbose);

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("{err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  let source_dir = cli
    .source_dir
    .canonicalize()
    .with_context(|| format!("source directory not found: {}", cli.source_dir.display()))?;
  let target_dir = absolute(&cli.target_dir)?;

  let mut config = match &cli.config {
    Some(path) => DeployConfig::from_path(path)?,
    None => DeployConfig::discover(&source_dir),
  };
  if let Some(minifier) = &cli.minifier {
    config.minifier_path = minifier.clone();
  }

  let minifier = Esbuild::new(&config.minifier_path);
  Deployer::new(&config, &minifier).deploy(&source_dir, &target_dir)?;
  Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
  std::path::absolute(path).with_context(|| format!("invalid target directory: {}", path.display()))
}
