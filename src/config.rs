//! Configuration loader describing where assets live and how they are versioned.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cdn::CdnAssetUrl;
use crate::host::StaticHost;
use crate::manifest::Manifest;
use crate::resolver::{AssetGlobals, AssetResolver};

const CONFIG_FILES: &[&str] = &["assets.config.json", "assets.config.yaml", "assets.config.yml"];

/// Discoverable configuration for the asset helpers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
  /// Public URL of the asset directory.
  pub assets_url: String,
  /// Plugin version appended to generated URLs.
  pub version: String,
  /// Stylesheet manifest, relative to the project root.
  pub css_manifest: String,
  /// Script manifest, relative to the project root.
  pub js_manifest: String,
  /// Public URL of the plugin, used for CDN paths when the CDN is disabled.
  pub base_url: String,
  /// Serve CDN assets from the public mirror.
  pub use_cdn: bool,
  /// Language tag reported by the host.
  pub language: String,
  /// Text domains whose translation catalogs count as loaded.
  pub loaded_text_domains: Vec<String>,
}

impl Default for AssetsConfig {
  fn default() -> Self {
    Self {
      assets_url: "/wp-content/plugins/mailpoet/assets".into(),
      version: "0.0.0".into(),
      css_manifest: "assets/dist/css/manifest.json".into(),
      js_manifest: "assets/dist/js/manifest.json".into(),
      base_url: "/wp-content/plugins/mailpoet".into(),
      use_cdn: true,
      language: "en-US".into(),
      loaded_text_domains: Vec::new(),
    }
  }
}

impl AssetsConfig {
  /// Look for a configuration file in `dir`.
  ///
  /// Missing or unreadable files fall back to defaults so callers can always render.
  pub fn discover(dir: &Path) -> Self {
    for name in CONFIG_FILES {
      let candidate = dir.join(name);
      if !candidate.exists() {
        continue;
      }
      match Self::from_path(&candidate) {
        Ok(config) => {
          log::info!("loaded asset configuration from {}", candidate.display());
          return config;
        }
        Err(err) => {
          log::warn!("ignoring {}: {err:#}", candidate.display());
        }
      }
    }
    Self::default()
  }

  /// Read configuration from a JSON or YAML file, chosen by extension.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
    } else {
      serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
    }
  }

  /// Path of the stylesheet manifest below `root`.
  pub fn css_manifest_path(&self, root: &Path) -> PathBuf {
    root.join(&self.css_manifest)
  }

  /// Path of the script manifest below `root`.
  pub fn js_manifest_path(&self, root: &Path) -> PathBuf {
    root.join(&self.js_manifest)
  }

  /// Host environment described by this configuration.
  pub fn host(&self) -> StaticHost {
    self
      .loaded_text_domains
      .iter()
      .fold(StaticHost::new(&self.language), |host, domain| {
        host.with_loaded_domain(domain)
      })
  }

  /// Load manifests below `root` and assemble the resolver's shared values.
  pub fn load_globals(&self, root: &Path) -> Result<AssetGlobals> {
    Ok(AssetGlobals {
      assets_url: self.assets_url.trim_end_matches('/').to_string(),
      version: self.version.clone(),
      css_manifest: Manifest::load_or_empty(&self.css_manifest_path(root))?,
      js_manifest: Manifest::load_or_empty(&self.js_manifest_path(root))?,
    })
  }

  /// Build a fully wired resolver for the project rooted at `root`.
  pub fn build_resolver(&self, root: &Path) -> Result<AssetResolver> {
    let globals = self.load_globals(root)?;
    let cdn = CdnAssetUrl::new(&self.base_url, self.use_cdn);
    Ok(AssetResolver::new(globals, Arc::new(self.host())).with_cdn(Arc::new(cdn)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_defaults_without_config_file() {
    let dir = tempdir().unwrap();
    assert_eq!(AssetsConfig::discover(dir.path()), AssetsConfig::default());
  }

  #[test]
  fn discover_defaults_on_invalid_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("assets.config.json"), "{ not json").unwrap();
    assert_eq!(AssetsConfig::discover(dir.path()), AssetsConfig::default());
  }

  #[test]
  fn reads_partial_json_config() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join("assets.config.json"),
      r#"{"version": "5.1.0", "use_cdn": false}"#,
    )
    .unwrap();

    let config = AssetsConfig::discover(dir.path());
    assert_eq!(config.version, "5.1.0");
    assert!(!config.use_cdn);
    assert_eq!(config.language, "en-US");
  }

  #[test]
  fn reads_yaml_config() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join("assets.config.yaml"),
      "assets_url: https://cdn.example/assets/\nloaded_text_domains:\n  - mailpoet\nlanguage: nl-NL\n",
    )
    .unwrap();

    let config = AssetsConfig::discover(dir.path());
    assert_eq!(config.assets_url, "https://cdn.example/assets/");
    assert_eq!(config.loaded_text_domains, vec!["mailpoet".to_string()]);
  }

  #[test]
  fn builds_resolver_from_manifests_on_disk() {
    let dir = tempdir().unwrap();
    let config = AssetsConfig {
      assets_url: "https://site/assets/".into(),
      version: "3.0".into(),
      language: "nl-NL".into(),
      loaded_text_domains: vec!["mailpoet".into()],
      use_cdn: false,
      base_url: "https://site".into(),
      ..AssetsConfig::default()
    };
    let js_path = config.js_manifest_path(dir.path());
    fs::create_dir_all(js_path.parent().unwrap()).unwrap();
    fs::write(&js_path, r#"{"admin.js": "admin.77.js"}"#).unwrap();

    let resolver = config.build_resolver(dir.path()).unwrap();
    assert_eq!(
      resolver.resolve_script_url("admin.js"),
      "https://site/assets/dist/js/admin.77.js?ver=3.0"
    );
    assert_eq!(
      resolver.render_stylesheet_tags(&["admin.css"]),
      r#"<link rel="stylesheet" type="text/css" href="https://site/assets/dist/css/admin.css" />"#
    );
    assert_eq!(resolver.resolve_active_language(), "nl-NL");
    assert_eq!(resolver.resolve_cdn_url("a.png").unwrap(), "https://site/assets/a.png");
  }

  #[test]
  fn malformed_manifest_fails_resolver_construction() {
    let dir = tempdir().unwrap();
    let config = AssetsConfig::default();
    let css_path = config.css_manifest_path(dir.path());
    fs::create_dir_all(css_path.parent().unwrap()).unwrap();
    fs::write(&css_path, "nope").unwrap();

    assert!(config.build_resolver(dir.path()).is_err());
  }
}
