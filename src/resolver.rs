//! Resolution of manifest references to concrete files, and their deployment.
//!
//! Libraries deploy each reference on its own, preferring a pre-minified variant over
//! minifying the source. Pages bundle every local reference of a kind into a single
//! `page.min.<kind>` file, in declaration order.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::asset_paths::{has_kind_suffix, minified_variant, page_bundle_path, unminified_variant};
use crate::bundle::{Minifier, minify};
use crate::copier::{Copier, ParentDirs};
use crate::error::{DeployError, DeployResult};
use crate::ignore::IgnoreFilter;
use crate::models::{AssetKind, AssetReference, ManifestEntry, ResolvedAssetGroup};

/// How a single library reference is deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryAssetPlan {
  /// Remote URL; left in the manifest and never copied.
  Remote,
  /// The reference names a `.<kind>` file; copied as-is without checking it first.
  CopyExplicit {
    /// Source file.
    source: PathBuf,
    /// Mirrored target file.
    target: PathBuf,
  },
  /// A `<name>.min.<kind>` file exists and is copied as-is.
  CopyMinified {
    /// Source file.
    source: PathBuf,
    /// Mirrored target file.
    target: PathBuf,
  },
  /// Only `<name>.<kind>` exists; it is minified into `<name>.min.<kind>`.
  Minify {
    /// Unminified source file.
    source: PathBuf,
    /// Minified target file.
    target: PathBuf,
  },
}

/// Decide how a library reference of `kind` is deployed.
///
/// The checks run in strict priority order and stop at the first match: explicit suffix,
/// existing minified variant, existing unminified source. When neither variant exists the
/// error names both candidates. Local references must stay below `source_dir`; absolute
/// paths and `..` components are rejected as [`DeployError::InvalidManifestField`].
pub fn plan_library_asset(
  source_dir: &Path,
  target_dir: &Path,
  reference: &str,
  kind: AssetKind,
) -> DeployResult<LibraryAssetPlan> {
  let AssetReference::Local(reference) = AssetReference::classify(reference) else {
    return Ok(LibraryAssetPlan::Remote);
  };
  let reference = Path::new(reference);
  if !is_contained(reference) {
    return Err(DeployError::field(
      kind.extension(),
      format!("reference \"{}\" must be relative to the library directory.", reference.display()),
    ));
  }

  if has_kind_suffix(reference, kind) {
    return Ok(LibraryAssetPlan::CopyExplicit {
      source: source_dir.join(reference),
      target: target_dir.join(reference),
    });
  }

  let minified = minified_variant(reference, kind);
  let source_minified = source_dir.join(&minified);
  let target_minified = target_dir.join(&minified);
  if source_minified.is_file() {
    return Ok(LibraryAssetPlan::CopyMinified {
      source: source_minified,
      target: target_minified,
    });
  }

  let source_unminified = source_dir.join(unminified_variant(reference, kind));
  if source_unminified.is_file() {
    return Ok(LibraryAssetPlan::Minify {
      source: source_unminified,
      target: target_minified,
    });
  }

  Err(DeployError::MissingAsset {
    candidates: vec![source_minified, source_unminified],
  })
}

fn is_contained(reference: &Path) -> bool {
  reference
    .components()
    .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Page-mode resolution: local source files to bundle plus remote pass-through values.
///
/// Returns `None` when the entry does not declare the kind at all. Suffixless references get
/// `.<kind>` appended; every local file must exist. Existing files matched by the ignore
/// rules are dropped silently.
pub fn resolve_page_assets(
  entry: &ManifestEntry,
  kind: AssetKind,
  source_dir: &Path,
  ignore: &dyn IgnoreFilter,
) -> DeployResult<Option<ResolvedAssetGroup>> {
  let Some(value) = entry.assets(kind) else {
    return Ok(None);
  };

  let mut group = ResolvedAssetGroup::default();
  for raw in value.iter() {
    let reference = match AssetReference::classify(raw) {
      AssetReference::Remote(url) => {
        group.remotes.push(url.to_string());
        continue;
      }
      AssetReference::Local(path) => Path::new(path),
    };

    let reference = if reference.extension().is_none() {
      unminified_variant(reference, kind)
    } else {
      reference.to_path_buf()
    };
    let source = source_dir.join(reference);
    if !source.is_file() {
      return Err(DeployError::MissingAsset {
        candidates: vec![source],
      });
    }
    if ignore.is_ignored(&source) {
      debug!(source = %source.display(), "ignored page asset");
      continue;
    }
    group.sources.push(source);
  }
  Ok(Some(group))
}

/// Deploys manifest entries using injected ignore rules, copier and minifier.
#[derive(Clone, Copy)]
pub struct AssetDeployer<'a> {
  ignore: &'a dyn IgnoreFilter,
  copier: Copier<'a>,
  minifier: &'a dyn Minifier,
}

impl<'a> AssetDeployer<'a> {
  /// Bundle the collaborators used while deploying assets.
  pub fn new(ignore: &'a dyn IgnoreFilter, copier: Copier<'a>, minifier: &'a dyn Minifier) -> Self {
    Self {
      ignore,
      copier,
      minifier,
    }
  }

  /// Deploy every local reference of a library entry, one file per reference.
  pub fn deploy_library_entry(
    &self,
    entry: &ManifestEntry,
    source_dir: &Path,
    target_dir: &Path,
  ) -> DeployResult<()> {
    for kind in AssetKind::ALL {
      let Some(value) = entry.assets(kind) else {
        continue;
      };
      for reference in value.iter() {
        let plan = plan_library_asset(source_dir, target_dir, reference, kind)?;
        debug!(reference, ?plan, "library asset");
        self.apply_library_plan(plan, kind)?;
      }
    }
    Ok(())
  }

  fn apply_library_plan(&self, plan: LibraryAssetPlan, kind: AssetKind) -> DeployResult<()> {
    match plan {
      LibraryAssetPlan::Remote => Ok(()),
      LibraryAssetPlan::CopyExplicit { source, target }
      | LibraryAssetPlan::CopyMinified { source, target } => {
        self.copier.copy_file(&source, &target, ParentDirs::Create)
      }
      LibraryAssetPlan::Minify { source, target } => {
        if self.ignore.is_ignored(&source) {
          return Ok(());
        }
        minify(self.minifier, std::slice::from_ref(&source), &target, kind)
      }
    }
  }

  /// Bundle each declared kind of a page entry into `page.min.<kind>` under `target_dir`.
  ///
  /// Kinds whose references are all remote or all ignored produce no bundle.
  pub fn deploy_page_entry(
    &self,
    entry: &ManifestEntry,
    source_dir: &Path,
    target_dir: &Path,
  ) -> DeployResult<()> {
    for kind in AssetKind::ALL {
      let Some(group) = resolve_page_assets(entry, kind, source_dir, self.ignore)? else {
        continue;
      };
      debug!(%kind, sources = group.sources.len(), remotes = ?group.remotes, "page assets");
      if group.sources.is_empty() {
        continue;
      }
      minify(self.minifier, &group.sources, &page_bundle_path(target_dir, kind), kind)?;
    }
    Ok(())
  }
}
