//! Running esbuild over single files or concatenated bundles.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{DeployError, DeployResult};
use crate::models::AssetKind;

/// Default esbuild executable, resolved through `PATH`.
pub const DEFAULT_MINIFIER: &str = "esbuild";

/// External tool turning one input file into one minified output file.
pub trait Minifier {
  /// Minify `input` into `output`. The output's directory already exists.
  fn run(&self, input: &Path, output: &Path) -> DeployResult<()>;
}

/// [`Minifier`] backed by the esbuild command line.
#[derive(Debug, Clone)]
pub struct Esbuild {
  executable: PathBuf,
  minify: bool,
}

impl Esbuild {
  /// Use the esbuild binary at `executable`.
  pub fn new(executable: impl Into<PathBuf>) -> Self {
    Self {
      executable: executable.into(),
      minify: true,
    }
  }

  /// Toggle the `--minify` flag; disabling it only transpiles and copies.
  pub fn with_minify(mut self, minify: bool) -> Self {
    self.minify = minify;
    self
  }

  fn command(&self, input: &Path, output: &Path) -> Command {
    let mut command = Command::new(&self.executable);
    command
      .arg(input)
      .arg(format!("--outfile={}", output.display()))
      .arg("--log-level=warning");
    if self.minify {
      command.arg("--minify");
    }
    command
  }
}

impl Default for Esbuild {
  fn default() -> Self {
    Self::new(DEFAULT_MINIFIER)
  }
}

impl Minifier for Esbuild {
  fn run(&self, input: &Path, output: &Path) -> DeployResult<()> {
    let result = self
      .command(input, output)
      .output()
      .map_err(|err| DeployError::MinificationFailure {
        input: input.to_path_buf(),
        reason: format!("failed to run {}: {err}", self.executable.display()),
      })?;

    let stderr = String::from_utf8_lossy(&result.stderr);
    if !result.status.success() {
      return Err(DeployError::MinificationFailure {
        input: input.to_path_buf(),
        reason: format!("{} exited with {}: {}", self.executable.display(), result.status, stderr.trim()),
      });
    }
    if !stderr.trim().is_empty() {
      warn!(input = %input.display(), "{}", stderr.trim());
    }
    Ok(())
  }
}

/// Minify `sources` of the given kind into a single `output` file.
///
/// One source is handed to the minifier directly. Several sources are concatenated in order,
/// each followed by a newline, into a scratch file next to `output` whose suffix matches the
/// kind, so the tool picks the right grammar. The scratch file is removed on every path; a
/// failed removal is only logged. An empty `sources` slice does nothing.
pub fn minify(
  minifier: &dyn Minifier,
  sources: &[PathBuf],
  output: &Path,
  kind: AssetKind,
) -> DeployResult<()> {
  let Some(first) = sources.first() else {
    return Ok(());
  };

  let output_dir = output.parent().unwrap_or(Path::new("."));
  fs::create_dir_all(output_dir).map_err(|err| DeployError::io(output_dir, err))?;

  if sources.len() == 1 {
    debug!(source = %first.display(), output = %output.display(), "minifying");
    return minifier.run(first, output);
  }

  let scratch = tempfile::Builder::new()
    .prefix("temp-")
    .suffix(&format!(".{}", kind.extension()))
    .tempfile_in(output_dir)
    .map_err(|err| DeployError::io(output_dir, err))?;
  debug!(
    sources = sources.len(),
    scratch = %scratch.path().display(),
    output = %output.display(),
    "bundling"
  );

  let result = concatenate(sources, &scratch).and_then(|()| minifier.run(scratch.path(), output));
  remove_scratch(scratch);
  result
}

fn concatenate(sources: &[PathBuf], scratch: &NamedTempFile) -> DeployResult<()> {
  let mut writer = scratch.as_file();
  for source in sources {
    let content = fs::read_to_string(source).map_err(|err| DeployError::io(source, err))?;
    writer
      .write_all(content.as_bytes())
      .and_then(|()| writer.write_all(b"\n"))
      .map_err(|err| DeployError::io(scratch.path(), err))?;
  }
  writer.flush().map_err(|err| DeployError::io(scratch.path(), err))
}

fn remove_scratch(scratch: NamedTempFile) {
  let path = scratch.path().to_path_buf();
  if let Err(err) = scratch.close() {
    warn!(path = %path.display(), error = %err, "failed to delete temporary file");
  }
}
