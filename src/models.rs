//! Data structures describing asset manifests and the references they declare.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::asset_paths::is_remote_reference;

/// The two asset kinds a manifest entry can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
  /// Stylesheets (`.css`).
  Css,
  /// Scripts (`.js`).
  Js,
}

impl AssetKind {
  /// Kinds in the order the deployer processes them.
  pub const ALL: [AssetKind; 2] = [AssetKind::Js, AssetKind::Css];

  /// File extension without the leading dot; also the manifest key.
  pub fn extension(self) -> &'static str {
    match self {
      AssetKind::Css => "css",
      AssetKind::Js => "js",
    }
  }

  /// Fixed filename every local page asset of this kind is bundled into.
  pub fn bundle_filename(self) -> &'static str {
    match self {
      AssetKind::Css => "page.min.css",
      AssetKind::Js => "page.min.js",
    }
  }
}

impl fmt::Display for AssetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.extension())
  }
}

/// A manifest field value: either one reference or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetValue {
  /// `"css": "app"`
  Single(String),
  /// `"css": ["reset", "app"]`
  List(Vec<String>),
}

impl AssetValue {
  /// Iterate over the references in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    let slice = match self {
      AssetValue::Single(value) => std::slice::from_ref(value),
      AssetValue::List(values) => values.as_slice(),
    };
    slice.iter().map(String::as_str)
  }

  /// Collapse a list of references into the most compact value.
  ///
  /// Returns `None` for an empty list and a scalar for a single element.
  pub fn from_references(mut references: Vec<String>) -> Option<Self> {
    match references.len() {
      0 => None,
      1 => references.pop().map(AssetValue::Single),
      _ => Some(AssetValue::List(references)),
    }
  }
}

impl Serialize for AssetValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      AssetValue::Single(value) => serializer.serialize_str(value),
      AssetValue::List(values) => values.serialize(serializer),
    }
  }
}

/// One block of a manifest: the assets a library or page needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
  /// Stylesheet references.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub css: Option<AssetValue>,
  /// Script references.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub js: Option<AssetValue>,
  /// The library manifest's `default` flag. Stored only so it survives a rewrite.
  #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
  pub is_default: Option<bool>,
}

impl ManifestEntry {
  /// Field holding references of the given kind.
  pub fn assets(&self, kind: AssetKind) -> Option<&AssetValue> {
    match kind {
      AssetKind::Css => self.css.as_ref(),
      AssetKind::Js => self.js.as_ref(),
    }
  }

  /// Mutable access to the field holding references of the given kind.
  pub fn assets_mut(&mut self, kind: AssetKind) -> &mut Option<AssetValue> {
    match kind {
      AssetKind::Css => &mut self.css,
      AssetKind::Js => &mut self.js,
    }
  }
}

/// Library name to entry mapping, kept in source order.
pub type LibraryManifest = IndexMap<String, ManifestEntry>;

/// A single reference inside a manifest field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetReference<'a> {
  /// Path relative to the directory owning the manifest.
  Local(&'a str),
  /// Absolute `http://` or `https://` URL, passed through untouched.
  Remote(&'a str),
}

impl<'a> AssetReference<'a> {
  /// Classify a raw manifest value.
  pub fn classify(value: &'a str) -> Self {
    if is_remote_reference(value) {
      AssetReference::Remote(value)
    } else {
      AssetReference::Local(value)
    }
  }
}

/// Local source files and remote pass-through values for one entry and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAssetGroup {
  /// Source files in declaration order.
  pub sources: Vec<PathBuf>,
  /// Remote URLs in declaration order.
  pub remotes: Vec<String>,
}
