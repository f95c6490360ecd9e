//! Rewriting page manifests to point at the deployed bundles.

use crate::models::{AssetKind, AssetReference, AssetValue, ManifestEntry};

/// Produce the deployed form of a page manifest entry.
///
/// For each kind, local references collapse into the kind's bundle filename, placed first,
/// followed by the remote URLs in their original order. A single resulting reference is
/// stored as a scalar, so `["a.js"]` comes back as `"page.min.js"`; this normalisation is
/// intentional and not reversible. Kinds with no references at all are left unset.
/// The `default` flag is a library concept and is not carried over.
pub fn transform_page_entry(entry: &ManifestEntry) -> ManifestEntry {
  let mut transformed = ManifestEntry::default();
  for kind in AssetKind::ALL {
    *transformed.assets_mut(kind) = entry
      .assets(kind)
      .and_then(|value| transform_value(value, kind));
  }
  transformed
}

fn transform_value(value: &AssetValue, kind: AssetKind) -> Option<AssetValue> {
  let mut has_local = false;
  let mut remotes = Vec::new();
  for reference in value.iter().map(AssetReference::classify) {
    match reference {
      AssetReference::Local(_) => has_local = true,
      AssetReference::Remote(url) => remotes.push(url.to_string()),
    }
  }

  let mut references = Vec::with_capacity(remotes.len() + 1);
  if has_local {
    references.push(kind.bundle_filename().to_string());
  }
  references.extend(remotes);
  AssetValue::from_references(references)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::manifest::{EntryShape, parse_entry};
  use serde_json::{Value, json};

  fn entry(value: Value) -> ManifestEntry {
    let Value::Object(object) = value else {
      panic!("fixture must be an object");
    };
    parse_entry(&object, EntryShape::Page).expect("fixture must parse")
  }

  fn to_json(entry: &ManifestEntry) -> Value {
    serde_json::to_value(entry).unwrap()
  }

  #[test]
  fn local_refs_collapse_and_remotes_follow() {
    let result = transform_page_entry(&entry(json!({ "js": ["a.js", "https://cdn/x.js"] })));
    assert_eq!(to_json(&result), json!({ "js": ["page.min.js", "https://cdn/x.js"] }));
  }

  #[test]
  fn bundle_name_is_first_even_when_remote_is_declared_first() {
    let result = transform_page_entry(&entry(json!({
      "css": ["https://cdn/a.css", "theme", "https://cdn/b.css", "layout"]
    })));
    assert_eq!(
      to_json(&result),
      json!({ "css": ["page.min.css", "https://cdn/a.css", "https://cdn/b.css"] })
    );
  }

  #[test]
  fn all_remote_stays_scalar_without_bundle() {
    let result = transform_page_entry(&entry(json!({ "js": "https://cdn/x.js" })));
    assert_eq!(to_json(&result), json!({ "js": "https://cdn/x.js" }));
  }

  #[test]
  fn single_local_list_becomes_scalar() {
    let result = transform_page_entry(&entry(json!({ "js": ["View", "Model"], "css": ["style"] })));
    assert_eq!(to_json(&result), json!({ "css": "page.min.css", "js": "page.min.js" }));
  }

  #[test]
  fn absent_fields_stay_absent() {
    let result = transform_page_entry(&entry(json!({ "title": "Login" })));
    assert_eq!(result, ManifestEntry::default());
    assert_eq!(to_json(&result), json!({}));
  }

  #[test]
  fn source_entry_is_left_untouched() {
    let source = entry(json!({ "js": ["a", "b"] }));
    let before = source.clone();
    let _ = transform_page_entry(&source);
    assert_eq!(source, before);
  }
}
