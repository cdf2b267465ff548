//! Query-string helpers used when stamping versions onto asset URLs.

/// Add `key=value` to the query string of `url`.
///
/// Existing parameters keep their order. A parameter already named `key` is replaced in
/// place instead of being duplicated, and any `#fragment` is carried over after the query.
/// Keys and values are inserted verbatim.
pub fn add_query_arg(url: &str, key: &str, value: &str) -> String {
  let (base, fragment) = match url.split_once('#') {
    Some((base, fragment)) => (base, Some(fragment)),
    None => (url, None),
  };
  let (path, query) = match base.split_once('?') {
    Some((path, query)) => (path, query),
    None => (base, ""),
  };

  let pair = format!("{key}={value}");
  let mut replaced = false;
  let mut params: Vec<String> = Vec::new();
  for param in query.split('&').filter(|param| !param.is_empty()) {
    let name = param.split_once('=').map_or(param, |(name, _)| name);
    if name != key {
      params.push(param.to_string());
    } else if !replaced {
      params.push(pair.clone());
      replaced = true;
    }
  }
  if !replaced {
    params.push(pair);
  }

  let mut output = format!("{path}?{}", params.join("&"));
  if let Some(fragment) = fragment {
    output.push('#');
    output.push_str(fragment);
  }
  output
}
