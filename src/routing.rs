//! Prefix-based routing rules deciding where script assets are served from.

/// A single routing rule for script assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRoute {
  /// Name prefix the rule applies to. The empty prefix matches every name.
  pub prefix: &'static str,
  /// Directory below the assets URL that serves matching scripts.
  pub base_path: &'static str,
  /// Whether matching names are resolved through the JS manifest.
  pub fingerprinted: bool,
}

/// Default routes: vendored `lib/` scripts bypass the build pipeline, everything else is
/// served from the fingerprinted build output.
pub const DEFAULT_SCRIPT_ROUTES: &[ScriptRoute] = &[
  ScriptRoute {
    prefix: "lib/",
    base_path: "js",
    fingerprinted: false,
  },
  ScriptRoute {
    prefix: "",
    base_path: "dist/js",
    fingerprinted: true,
  },
];

/// Fallback used when a custom table has no catch-all rule.
const CATCH_ALL: ScriptRoute = DEFAULT_SCRIPT_ROUTES[1];

/// Pick the first route whose prefix matches `name`.
pub fn route_for<'a>(routes: &'a [ScriptRoute], name: &str) -> &'a ScriptRoute {
  routes
    .iter()
    .find(|route| name.starts_with(route.prefix))
    .unwrap_or(&CATCH_ALL)
}
