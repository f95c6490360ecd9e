use std::path::{Path, PathBuf};

use crate::models::AssetKind;

/// Append `suffix` to the file name of `path` without touching any existing extension.
///
/// `bootstrap.bundle` becomes `bootstrap.bundle.min.js`; an extension swap would have
/// produced `bootstrap.min.js` instead.
pub fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(suffix);
  PathBuf::from(name)
}

/// `<name>.min.<kind>`
pub fn minified_variant(path: &Path, kind: AssetKind) -> PathBuf {
  append_suffix(path, &format!(".min.{}", kind.extension()))
}

/// `<name>.<kind>`
pub fn unminified_variant(path: &Path, kind: AssetKind) -> PathBuf {
  append_suffix(path, &format!(".{}", kind.extension()))
}

/// Whether the final extension of `path` is exactly the kind's extension.
pub fn has_kind_suffix(path: &Path, kind: AssetKind) -> bool {
  path
    .extension()
    .is_some_and(|extension| extension == kind.extension())
}
