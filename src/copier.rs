//! Verbatim file copies into the deployment target, honouring ignore rules.

use std::fs::{self, FileTimes};
use std::path::Path;

use glob::Pattern;
use same_file::is_same_file;
use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::asset_paths::normalize_slashes;
use crate::error::{DeployError, DeployResult};
use crate::ignore::IgnoreFilter;

/// Whether [`Copier::copy_file`] should create the target's parent directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentDirs {
  /// Create missing parent directories.
  Create,
  /// Expect the parent directory to exist already.
  Existing,
}

/// Copies files while skipping ignored paths and symbolic links.
#[derive(Clone, Copy)]
pub struct Copier<'a> {
  ignore: &'a dyn IgnoreFilter,
}

impl<'a> Copier<'a> {
  /// Create a copier consulting the provided ignore filter.
  pub fn new(ignore: &'a dyn IgnoreFilter) -> Self {
    Self { ignore }
  }

  /// Copy a single file, preserving its access and modification times.
  ///
  /// Ignored sources and symbolic links are skipped. A source that is not a regular file is
  /// reported as [`DeployError::MissingAsset`], and a target that is the source itself as
  /// [`DeployError::SameFile`].
  pub fn copy_file(&self, source: &Path, target: &Path, parents: ParentDirs) -> DeployResult<()> {
    if self.ignore.is_ignored(source) {
      trace!(source = %source.display(), "ignored");
      return Ok(());
    }

    let metadata = match fs::symlink_metadata(source) {
      Ok(metadata) => metadata,
      Err(_) => return Err(missing(source)),
    };
    if metadata.file_type().is_symlink() {
      warn!(path = %source.display(), "skipping symlink");
      return Ok(());
    }
    if !metadata.is_file() {
      return Err(missing(source));
    }

    if target.exists() {
      let same = is_same_file(source, target).map_err(|err| DeployError::io(target, err))?;
      if same {
        return Err(DeployError::SameFile {
          path: source.to_path_buf(),
        });
      }
    }

    if parents == ParentDirs::Create {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| DeployError::io(parent, err))?;
      }
    }
    fs::copy(source, target).map_err(|err| DeployError::io(target, err))?;
    preserve_times(&metadata, target)
  }

  /// Recursively copy `source_dir` into `target_dir`.
  ///
  /// Paths relative to `source_dir` that match any of `exclude` are skipped. A missing source
  /// directory copies nothing.
  pub fn copy_tree(&self, source_dir: &Path, target_dir: &Path, exclude: &[Pattern]) -> DeployResult<()> {
    if !source_dir.is_dir() {
      return Ok(());
    }

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
      let entry = entry.map_err(|err| {
        let path = err.path().unwrap_or(source_dir).to_path_buf();
        DeployError::io(&path, err.into())
      })?;
      if entry.file_type().is_dir() {
        continue;
      }

      let Ok(relative) = entry.path().strip_prefix(source_dir) else {
        continue;
      };
      let relative_str = normalize_slashes(relative);
      if exclude.iter().any(|pattern| pattern.matches(&relative_str)) {
        continue;
      }
      self.copy_file(entry.path(), &target_dir.join(relative), ParentDirs::Create)?;
    }
    Ok(())
  }
}

/// Compile exclusion globs used by [`Copier::copy_tree`]; invalid globs are skipped.
pub fn exclude_patterns<'p>(patterns: impl IntoIterator<Item = &'p str>) -> Vec<Pattern> {
  patterns
    .into_iter()
    .filter_map(|pattern| match Pattern::new(pattern) {
      Ok(compiled) => Some(compiled),
      Err(err) => {
        warn!(pattern, error = %err, "skipping invalid exclude pattern");
        None
      }
    })
    .collect()
}

fn missing(path: &Path) -> DeployError {
  DeployError::MissingAsset {
    candidates: vec![path.to_path_buf()],
  }
}

fn preserve_times(metadata: &fs::Metadata, target: &Path) -> DeployResult<()> {
  let mut times = FileTimes::new();
  if let Ok(modified) = metadata.modified() {
    times = times.set_modified(modified);
  }
  if let Ok(accessed) = metadata.accessed() {
    times = times.set_accessed(accessed);
  }
  // Read-only copies cannot be reopened for writing; a read handle still allows owners to set times.
  fs::OpenOptions::new()
    .write(true)
    .open(target)
    .or_else(|_| fs::File::open(target))
    .and_then(|file| file.set_times(times))
    .map_err(|err| DeployError::io(target, err))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ignore::IgnoreRules;
  use std::time::{Duration, SystemTime};
  use tempfile::tempdir;

  struct IgnoreNothing;
  impl IgnoreFilter for IgnoreNothing {
    fn is_ignored(&self, _path: &Path) -> bool {
      false
    }
  }

  #[test]
  fn copies_file_and_creates_parents() -> DeployResult<()> {
    let temp = tempdir().unwrap();
    let source = temp.path().join("a.txt");
    fs::write(&source, b"content").unwrap();
    let target = temp.path().join("out/nested/a.txt");

    Copier::new(&IgnoreNothing).copy_file(&source, &target, ParentDirs::Create)?;
    assert_eq!(fs::read(&target).unwrap(), b"content");
    Ok(())
  }

  #[test]
  fn preserves_modification_time() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("a.txt");
    fs::write(&source, b"content").unwrap();
    let past = SystemTime::now() - Duration::from_secs(86_400);
    fs::OpenOptions::new()
      .write(true)
      .open(&source)
      .unwrap()
      .set_modified(past)
      .unwrap();
    let target = temp.path().join("b.txt");

    Copier::new(&IgnoreNothing)
      .copy_file(&source, &target, ParentDirs::Existing)
      .unwrap();

    let copied = fs::metadata(&target).unwrap().modified().unwrap();
    assert_eq!(copied, fs::metadata(&source).unwrap().modified().unwrap());
  }

  #[test]
  fn refuses_to_copy_onto_itself() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("vendor.js");
    fs::write(&source, b"precious();").unwrap();

    let err = Copier::new(&IgnoreNothing)
      .copy_file(&source, &source, ParentDirs::Create)
      .unwrap_err();
    assert!(matches!(err, DeployError::SameFile { .. }));
    assert_eq!(fs::read(&source).unwrap(), b"precious();");
  }

  #[test]
  fn missing_source_is_a_missing_asset() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("absent.js");
    let err = Copier::new(&IgnoreNothing)
      .copy_file(&source, &temp.path().join("out.js"), ParentDirs::Create)
      .unwrap_err();
    assert!(matches!(err, DeployError::MissingAsset { ref candidates } if candidates == &vec![source.clone()]));
  }

  #[test]
  fn ignored_source_is_skipped_even_when_missing() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(".deployignore"), "secret.txt\n").unwrap();
    let rules = IgnoreRules::load(temp.path(), ".deployignore").unwrap();
    let target = temp.path().join("out/secret.txt");

    Copier::new(&rules)
      .copy_file(&temp.path().join("secret.txt"), &target, ParentDirs::Create)
      .unwrap();
    assert!(!target.exists());
  }

  #[cfg(unix)]
  #[test]
  fn symlinks_are_skipped() {
    let temp = tempdir().unwrap();
    let real = temp.path().join("real.txt");
    fs::write(&real, b"real").unwrap();
    let link = temp.path().join("link.txt");
    std::os::unix::fs::symlink(&real, &link).unwrap();
    let target = temp.path().join("out/link.txt");

    Copier::new(&IgnoreNothing)
      .copy_file(&link, &target, ParentDirs::Create)
      .unwrap();
    assert!(!target.exists());
  }

  #[test]
  fn copy_tree_applies_exclusions() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("frontend");
    fs::create_dir_all(source.join("leuce/fonts")).unwrap();
    fs::write(source.join("manifest.json"), "{}").unwrap();
    fs::write(source.join("leuce/leuce.js"), "js").unwrap();
    fs::write(source.join("leuce/leuce.css"), "css").unwrap();
    fs::write(source.join("leuce/fonts/icons.woff2"), "font").unwrap();
    let target = temp.path().join("out");

    let exclude = exclude_patterns(["*.js", "*.css", "manifest.json"]);
    Copier::new(&IgnoreNothing)
      .copy_tree(&source, &target, &exclude)
      .unwrap();

    assert!(target.join("leuce/fonts/icons.woff2").exists());
    assert!(!target.join("leuce/leuce.js").exists());
    assert!(!target.join("leuce/leuce.css").exists());
    assert!(!target.join("manifest.json").exists());
  }

  #[test]
  fn copy_tree_tolerates_missing_source() {
    let temp = tempdir().unwrap();
    Copier::new(&IgnoreNothing)
      .copy_tree(&temp.path().join("absent"), &temp.path().join("out"), &[])
      .unwrap();
    assert!(!temp.path().join("out").exists());
  }
}
