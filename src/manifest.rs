//! Build-time asset manifests mapping logical names to fingerprinted filenames.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Immutable mapping from a logical asset name to its built filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
  entries: BTreeMap<String, String>,
}

impl Manifest {
  /// Load a manifest from a JSON object of `name -> filename` pairs.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("manifest not found at {}", path.display()))?;
    serde_json::from_str(&content)
      .with_context(|| format!("failed to parse manifest JSON at {}", path.display()))
  }

  /// Load a manifest, treating a missing file as an empty manifest.
  ///
  /// Development checkouts usually have no build output yet, in which case every
  /// lookup falls back to the logical name.
  pub fn load_or_empty(path: &Path) -> Result<Self> {
    if !path.exists() {
      log::info!("no manifest at {}, serving unversioned names", path.display());
      return Ok(Self::default());
    }
    Self::load(path)
  }

  /// Raw lookup without fallback.
  pub fn get(&self, name: &str) -> Option<&str> {
    self.entries.get(name).map(String::as_str)
  }

  /// Number of entries in the manifest.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when the manifest holds no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<K, V> FromIterator<(K, V)> for Manifest
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      entries: iter
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect(),
    }
  }
}

/// Resolve `name` through `manifest`, falling back to `name` itself.
///
/// Empty values are treated the same as missing keys.
pub fn resolve_manifest_entry(manifest: &Manifest, name: &str) -> String {
  match manifest.get(name) {
    Some(resolved) if !resolved.is_empty() => resolved.to_string(),
    _ => {
      log::debug!("no manifest entry for {name}, using literal name");
      name.to_string()
    }
  }
}
