//! Collaborators owned by the host environment rendering templates.

use std::collections::BTreeSet;

use crate::query;

/// Locale and URL services provided by the host application.
pub trait HostEnvironment: Send + Sync {
  /// Returns `true` when a translation catalog is loaded for `domain`.
  fn is_textdomain_loaded(&self, domain: &str) -> bool;

  /// Language tag configured for the site, e.g. `de-DE`.
  fn blog_language(&self) -> String;

  /// Add a query parameter to `url`.
  fn add_query_arg(&self, url: &str, key: &str, value: &str) -> String {
    query::add_query_arg(url, key, value)
  }
}

/// Host backed by fixed values, typically read from configuration.
#[derive(Debug, Clone)]
pub struct StaticHost {
  language: String,
  loaded_domains: BTreeSet<String>,
}

impl StaticHost {
  /// Create a host reporting `language` with no translation catalogs loaded.
  pub fn new(language: impl Into<String>) -> Self {
    Self {
      language: language.into(),
      loaded_domains: BTreeSet::new(),
    }
  }

  /// Mark the catalog for `domain` as loaded.
  pub fn with_loaded_domain(mut self, domain: impl Into<String>) -> Self {
    self.loaded_domains.insert(domain.into());
    self
  }
}

impl Default for StaticHost {
  fn default() -> Self {
    Self::new("en-US")
  }
}

impl HostEnvironment for StaticHost {
  fn is_textdomain_loaded(&self, domain: &str) -> bool {
    self.loaded_domains.contains(domain)
  }

  fn blog_language(&self) -> String {
    self.language.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reports_loaded_domains_only() {
    let host = StaticHost::new("fr-FR").with_loaded_domain("mailpoet");
    assert!(host.is_textdomain_loaded("mailpoet"));
    assert!(!host.is_textdomain_loaded("woocommerce"));
    assert_eq!(host.blog_language(), "fr-FR");
  }

  #[test]
  fn default_query_arg_uses_shared_helper() {
    let host = StaticHost::default();
    assert_eq!(host.add_query_arg("/a?b=1", "c", "2"), "/a?b=1&c=2");
  }
}
