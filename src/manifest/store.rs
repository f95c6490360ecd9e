//! Loading manifests from disk and writing their compact deployed copies.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DeployError, DeployResult};
use crate::manifest::parsing::{EntryShape, parse_entry};
use crate::models::{LibraryManifest, ManifestEntry};

/// Top-level JSON object with its members in source order and duplicate keys rejected.
struct UniqueObject(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for UniqueObject {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_map(UniqueObjectVisitor)
  }
}

struct UniqueObjectVisitor;

impl<'de> Visitor<'de> for UniqueObjectVisitor {
  type Value = UniqueObject;

  fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("a JSON object")
  }

  fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();
    while let Some((key, value)) = access.next_entry::<String, Value>()? {
      if !seen.insert(key.clone()) {
        return Err(de::Error::custom(format!("duplicate key \"{key}\"")));
      }
      members.push((key, value));
    }
    Ok(UniqueObject(members))
  }
}

fn load_object(path: &Path) -> DeployResult<Vec<(String, Value)>> {
  if !path.is_file() {
    return Err(DeployError::ManifestNotFound {
      path: path.to_path_buf(),
    });
  }
  let content = fs::read_to_string(path).map_err(|err| DeployError::io(path, err))?;
  let UniqueObject(members) = serde_json::from_str::<UniqueObject>(&content)
    .map_err(|err| DeployError::format(path, format!("manifest must contain a JSON object ({err})")))?;
  Ok(members)
}

/// Load `frontend/manifest.json`: library names mapped to their entries.
pub fn load_library_manifest(path: &Path) -> DeployResult<LibraryManifest> {
  let members = load_object(path)?;
  let mut manifest = LibraryManifest::with_capacity(members.len());
  for (name, block) in members {
    if name.is_empty() {
      return Err(DeployError::format(path, "library name cannot be empty"));
    }
    let Value::Object(object) = block else {
      return Err(DeployError::format(
        path,
        format!("library \"{name}\" must be a JSON object"),
      ));
    };
    let entry = parse_entry(&object, EntryShape::Library)?;
    manifest.insert(name, entry);
  }
  debug!(path = %path.display(), libraries = manifest.len(), "loaded library manifest");
  Ok(manifest)
}

/// Load a page's `manifest.json`, which holds a single entry.
pub fn load_page_manifest(path: &Path) -> DeployResult<ManifestEntry> {
  let object: Map<String, Value> = load_object(path)?.into_iter().collect();
  parse_entry(&object, EntryShape::Page)
}

/// Write a library manifest as compact JSON, replacing any existing file.
pub fn save_library_manifest(manifest: &LibraryManifest, path: &Path) -> DeployResult<()> {
  write_compact(manifest, path)
}

/// Write a page manifest entry as compact JSON, replacing any existing file.
pub fn save_page_manifest(entry: &ManifestEntry, path: &Path) -> DeployResult<()> {
  write_compact(entry, path)
}

fn write_compact<T: Serialize>(value: &T, path: &Path) -> DeployResult<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|err| DeployError::io(parent, err))?;
  }
  let json = serde_json::to_vec(value).map_err(|err| DeployError::format(path, err.to_string()))?;
  fs::write(path, json).map_err(|err| DeployError::io(path, err))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::AssetValue;
  use tempfile::tempdir;

  fn write(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write manifest fixture");
  }

  #[test]
  fn missing_manifest_is_reported() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    let err = load_library_manifest(&path).unwrap_err();
    assert!(matches!(err, DeployError::ManifestNotFound { .. }));
    let err = load_page_manifest(&path).unwrap_err();
    assert!(matches!(err, DeployError::ManifestNotFound { .. }));
  }

  #[test]
  fn library_manifest_keeps_source_order() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    write(
      &path,
      r#"{ "zeta": { "js": "zeta/zeta" }, "alpha": { "css": ["a", "b"], "default": false } }"#,
    );

    let manifest = load_library_manifest(&path).unwrap();
    let names: Vec<&str> = manifest.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
    assert_eq!(manifest["alpha"].is_default, Some(false));
  }

  #[test]
  fn library_manifest_rejects_bad_shapes() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");

    for content in [
      r#"["leuce"]"#,
      r#"{ "": { "js": "x" } }"#,
      r#"{ "leuce": "leuce.js" }"#,
      r#"{ "leuce": { "js": "a" }, "leuce": { "js": "b" } }"#,
      r#"{ "leuce": "#,
    ] {
      write(&path, content);
      let err = load_library_manifest(&path).unwrap_err();
      assert!(
        matches!(err, DeployError::InvalidManifestFormat { .. }),
        "{content} produced {err:?}"
      );
    }
  }

  #[test]
  fn field_errors_surface_from_library_blocks() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    write(&path, r#"{ "leuce": { "css": [] } }"#);

    let err = load_library_manifest(&path).unwrap_err();
    assert!(matches!(err, DeployError::InvalidManifestField { ref field, .. } if field == "css"));
  }

  #[test]
  fn page_manifest_rejects_non_objects() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    write(&path, r#""index""#);

    let err = load_page_manifest(&path).unwrap_err();
    assert!(matches!(err, DeployError::InvalidManifestFormat { .. }));
  }

  #[test]
  fn saved_library_manifest_is_compact_and_reloads() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("manifest.json");
    write(
      &source,
      r#"{
        "leuce": { "js": [ "leuce/leuce" ], "css": "leuce/leuce", "default": true },
        "cdn": { "js": "https://cdn.example.com/x.js", "extra": 1 }
      }"#,
    );

    let manifest = load_library_manifest(&source).unwrap();
    let target = temp.path().join("out").join("manifest.json");
    save_library_manifest(&manifest, &target).unwrap();

    let written = fs::read_to_string(&target).unwrap();
    assert_eq!(
      written,
      r#"{"leuce":{"css":"leuce/leuce","js":["leuce/leuce"],"default":true},"cdn":{"js":"https://cdn.example.com/x.js"}}"#
    );
    assert_eq!(load_library_manifest(&target).unwrap(), manifest);
  }

  #[test]
  fn saving_overwrites_existing_file() {
    let temp = tempdir().unwrap();
    let target = temp.path().join("manifest.json");
    write(&target, "stale content that is much longer than the new one");

    let entry = ManifestEntry {
      js: Some(AssetValue::Single("page.min.js".into())),
      ..ManifestEntry::default()
    };
    save_page_manifest(&entry, &target).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"js":"page.min.js"}"#);
  }
}
