//! Field-level validation of raw JSON objects into [`ManifestEntry`] values.

use serde_json::{Map, Value};

use crate::error::{DeployError, DeployResult};
use crate::models::{AssetKind, AssetValue, ManifestEntry};

const DEFAULT_FIELD: &str = "default";

/// Which manifest an entry belongs to; only library entries carry the `default` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryShape {
  /// An entry of `frontend/manifest.json`.
  Library,
  /// The single entry of a page's `manifest.json`.
  Page,
}

/// Validate a JSON object and convert it into a manifest entry.
///
/// Unknown keys are ignored so that newer manifests still deploy with older tooling.
pub fn parse_entry(object: &Map<String, Value>, shape: EntryShape) -> DeployResult<ManifestEntry> {
  let mut entry = ManifestEntry::default();
  for kind in AssetKind::ALL {
    *entry.assets_mut(kind) = parse_asset_field(object, kind.extension())?;
  }
  if shape == EntryShape::Library {
    entry.is_default = parse_boolean_field(object, DEFAULT_FIELD)?;
  }
  Ok(entry)
}

fn parse_asset_field(object: &Map<String, Value>, key: &str) -> DeployResult<Option<AssetValue>> {
  let Some(value) = object.get(key) else {
    return Ok(None);
  };

  match value {
    Value::String(text) => {
      let trimmed = text.trim();
      if trimmed.is_empty() {
        return Err(DeployError::field(key, "contains an empty string."));
      }
      Ok(Some(AssetValue::Single(trimmed.to_string())))
    }
    Value::Array(elements) => {
      if elements.is_empty() {
        return Err(DeployError::field(key, "contains an empty array."));
      }
      let mut references = Vec::with_capacity(elements.len());
      for element in elements {
        let Some(text) = element.as_str() else {
          return Err(DeployError::field(key, "must be an array of strings."));
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
          return Err(DeployError::field(key, "contains an empty string in the array."));
        }
        references.push(trimmed.to_string());
      }
      Ok(Some(AssetValue::List(references)))
    }
    _ => Err(DeployError::field(key, "must be a string or an array of strings.")),
  }
}

fn parse_boolean_field(object: &Map<String, Value>, key: &str) -> DeployResult<Option<bool>> {
  match object.get(key) {
    None => Ok(None),
    Some(Value::Bool(flag)) => Ok(Some(*flag)),
    Some(_) => Err(DeployError::field(key, "must be a boolean.")),
  }
}
