//! CDN URL generation for assets hosted on the plugin directory mirror.

/// Rewrites a local asset path into a public URL.
pub trait CdnUrlGenerator: Send + Sync {
  /// Produce the URL serving `path`.
  fn generate_cdn_url(&self, path: &str) -> String;
}

/// Public mirror serving plugin assets.
pub const CDN_URL: &str = "https://ps.w.org/mailpoet/";

/// Generator pointing at the CDN mirror, or at the local plugin URL when disabled.
#[derive(Debug, Clone)]
pub struct CdnAssetUrl {
  base_url: String,
  use_cdn: bool,
}

impl CdnAssetUrl {
  /// Create a generator. `base_url` is the plugin URL used when `use_cdn` is off.
  pub fn new(base_url: impl Into<String>, use_cdn: bool) -> Self {
    Self {
      base_url: base_url.into(),
      use_cdn,
    }
  }
}

impl CdnUrlGenerator for CdnAssetUrl {
  fn generate_cdn_url(&self, path: &str) -> String {
    if self.use_cdn {
      format!("{CDN_URL}assets/{path}")
    } else {
      format!("{}/assets/{path}", self.base_url.trim_end_matches('/'))
    }
  }
}
