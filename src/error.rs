//! Error taxonomy shared by every deployment stage.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used throughout the deployer.
pub type DeployResult<T> = Result<T, DeployError>;

/// Failures that abort a deployment run.
#[derive(Debug, Error)]
pub enum DeployError {
  /// A manifest file expected on disk does not exist.
  #[error("manifest file not found: {}", .path.display())]
  ManifestNotFound {
    /// Location that was checked.
    path: PathBuf,
  },

  /// A referenced asset does not exist under any of its candidate paths.
  #[error("missing file: {}", CandidateList(.candidates))]
  MissingAsset {
    /// Every path that was tried, in the order it was tried.
    candidates: Vec<PathBuf>,
  },

  /// The manifest document does not have the expected overall shape.
  #[error("invalid manifest {}: {reason}", .path.display())]
  InvalidManifestFormat {
    /// Manifest file being read.
    path: PathBuf,
    /// Human readable description of the problem.
    reason: String,
  },

  /// A `css`, `js` or `default` field holds a value the manifest model rejects.
  #[error("field \"{field}\" {reason}")]
  InvalidManifestField {
    /// Name of the offending field.
    field: String,
    /// Human readable description of the problem.
    reason: String,
  },

  /// The external minifier could not be started or reported a failure.
  #[error("failed to minify {}: {reason}", .input.display())]
  MinificationFailure {
    /// File handed to the minifier.
    input: PathBuf,
    /// Exit status or spawn error reported by the tool.
    reason: String,
  },

  /// The timestamped output directory already exists.
  #[error("target directory already exists: {}", .path.display())]
  TargetExists {
    /// Directory that was about to be created.
    path: PathBuf,
  },

  /// A copy would overwrite its own source.
  #[error("refusing to copy a file onto itself: {}", .path.display())]
  SameFile {
    /// File that is both source and target.
    path: PathBuf,
  },

  /// Filesystem failure outside the cases above.
  #[error("I/O error at {}", .path.display())]
  Io {
    /// Path being accessed.
    path: PathBuf,
    /// Underlying error.
    #[source]
    source: std::io::Error,
  },
}

impl DeployError {
  /// Wrap an I/O error together with the path that produced it.
  pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.as_ref().to_path_buf(),
      source,
    }
  }

  /// Build a field-level validation error.
  pub fn field(field: &str, reason: impl Into<String>) -> Self {
    Self::InvalidManifestField {
      field: field.to_string(),
      reason: reason.into(),
    }
  }

  /// Build a document-level validation error.
  pub fn format(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
    Self::InvalidManifestFormat {
      path: path.as_ref().to_path_buf(),
      reason: reason.into(),
    }
  }
}

struct CandidateList<'a>(&'a [PathBuf]);

impl fmt::Display for CandidateList<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (index, path) in self.0.iter().enumerate() {
      if index > 0 {
        f.write_str(" or ")?;
      }
      write!(f, "{}", path.display())?;
    }
    Ok(())
  }
}
