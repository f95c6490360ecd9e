use std::path::{Path, PathBuf};

use crate::models::AssetKind;

/// Location of the bundled output for one asset kind inside a deployed page directory.
pub fn page_bundle_path(page_target_dir: &Path, kind: AssetKind) -> PathBuf {
  page_target_dir.join(kind.bundle_filename())
}

/// Render a relative path with forward slashes so glob rules behave the same on every platform.
pub fn normalize_slashes(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}
