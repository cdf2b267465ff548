//! Resolution of logical asset names into versioned URLs and markup tags.

use std::sync::{Arc, Mutex, OnceLock};

use crate::cdn::CdnUrlGenerator;
use crate::host::HostEnvironment;
use crate::locator::{LocatorError, ServiceLocator};
use crate::manifest::{Manifest, resolve_manifest_entry};
use crate::routing::{DEFAULT_SCRIPT_ROUTES, ScriptRoute, route_for};

/// Text domain whose translation catalog decides the reported language.
pub const TEXT_DOMAIN: &str = "mailpoet";

/// Query parameter carrying the plugin version on image URLs.
pub const VERSION_QUERY_PARAM: &str = "mailpoet_version";

/// Language reported when no translation catalog is loaded.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Values shared by every resolution, fixed at bootstrap.
#[derive(Debug, Clone, Default)]
pub struct AssetGlobals {
  /// Base URL of the plugin's asset directory, without a trailing slash.
  pub assets_url: String,
  /// Plugin version stamped onto generated URLs.
  pub version: String,
  /// Manifest for built stylesheets.
  pub css_manifest: Manifest,
  /// Manifest for built scripts.
  pub js_manifest: Manifest,
}

/// Turns logical asset names into cache-busted URLs and markup.
pub struct AssetResolver {
  globals: AssetGlobals,
  host: Arc<dyn HostEnvironment>,
  routes: Vec<ScriptRoute>,
  locator: Arc<ServiceLocator>,
  cdn: OnceLock<Arc<dyn CdnUrlGenerator>>,
  cdn_init: Mutex<()>,
}

impl AssetResolver {
  /// Create a resolver that falls back to the global service locator for CDN lookups.
  pub fn new(globals: AssetGlobals, host: Arc<dyn HostEnvironment>) -> Self {
    Self {
      globals,
      host,
      routes: DEFAULT_SCRIPT_ROUTES.to_vec(),
      locator: ServiceLocator::global(),
      cdn: OnceLock::new(),
      cdn_init: Mutex::new(()),
    }
  }

  /// Use `generator` for CDN URLs; the service locator is never consulted.
  pub fn with_cdn(self, generator: Arc<dyn CdnUrlGenerator>) -> Self {
    // Only the first generator supplied is kept.
    let _ = self.cdn.set(generator);
    self
  }

  /// Resolve the CDN generator lazily from `locator` instead of the global registry.
  pub fn with_locator(mut self, locator: Arc<ServiceLocator>) -> Self {
    self.locator = locator;
    self
  }

  /// Replace the script routing table.
  pub fn with_script_routes(mut self, routes: Vec<ScriptRoute>) -> Self {
    self.routes = routes;
    self
  }

  /// Shared values this resolver was built with.
  pub fn globals(&self) -> &AssetGlobals {
    &self.globals
  }

  /// Render a `<link>` tag per stylesheet, one per line, in input order.
  pub fn render_stylesheet_tags<S: AsRef<str>>(&self, names: &[S]) -> String {
    names
      .iter()
      .map(|name| {
        format!(
          r#"<link rel="stylesheet" type="text/css" href="{}/dist/css/{}" />"#,
          self.globals.assets_url,
          resolve_manifest_entry(&self.globals.css_manifest, name.as_ref())
        )
      })
      .collect::<Vec<_>>()
      .join("\n")
  }

  /// Render a `<script>` tag per script, one per line, in input order.
  pub fn render_script_tags<S: AsRef<str>>(&self, names: &[S]) -> String {
    names
      .iter()
      .map(|name| {
        format!(
          r#"<script type="text/javascript" src="{}"></script>"#,
          self.resolve_script_url(name.as_ref())
        )
      })
      .collect::<Vec<_>>()
      .join("\n")
  }

  /// Versioned URL of a script, routed by name prefix.
  pub fn resolve_script_url(&self, name: &str) -> String {
    let route = route_for(&self.routes, name);
    let file = if route.fingerprinted {
      resolve_manifest_entry(&self.globals.js_manifest, name)
    } else {
      name.to_string()
    };

    format!(
      "{}/{}/{}?ver={}",
      self.globals.assets_url, route.base_path, file, self.globals.version
    )
  }

  /// Versioned URL of an image below the assets directory.
  pub fn resolve_image_url(&self, path: &str) -> String {
    self.append_version_query_param(&format!("{}/img/{}", self.globals.assets_url, path))
  }

  /// Stamp the plugin version onto any URL.
  pub fn append_version_query_param(&self, url: &str) -> String {
    self
      .host
      .add_query_arg(url, VERSION_QUERY_PARAM, &self.globals.version)
  }

  /// URL of `path` on the CDN.
  ///
  /// Without a generator supplied at construction, one is fetched from the service
  /// locator on first use and kept for the resolver's lifetime.
  pub fn resolve_cdn_url(&self, path: &str) -> Result<String, LocatorError> {
    Ok(self.cdn_generator()?.generate_cdn_url(path))
  }

  /// Language tag for system emails.
  pub fn resolve_active_language(&self) -> String {
    if !self.host.is_textdomain_loaded(TEXT_DOMAIN) {
      return FALLBACK_LANGUAGE.to_string();
    }
    self.host.blog_language()
  }

  fn cdn_generator(&self) -> Result<&Arc<dyn CdnUrlGenerator>, LocatorError> {
    if let Some(generator) = self.cdn.get() {
      return Ok(generator);
    }

    let _guard = self
      .cdn_init
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(generator) = self.cdn.get() {
      return Ok(generator);
    }

    log::debug!("resolving CDN URL generator from service locator");
    let generator = self.locator.get::<Arc<dyn CdnUrlGenerator>>()?;
    Ok(self.cdn.get_or_init(|| generator))
  }
}

impl std::fmt::Debug for AssetResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AssetResolver")
      .field("globals", &self.globals)
      .field("routes", &self.routes)
      .field("cdn_resolved", &self.cdn.get().is_some())
      .finish_non_exhaustive()
  }
}
