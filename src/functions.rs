//! Named template functions exposed to the host templating engine.

use crate::locator::LocatorError;
use crate::resolver::AssetResolver;

/// Output contexts in which a function's result may be emitted without escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
  /// Safe in every context; the engine must not escape the output.
  All,
}

/// Number of arguments a template function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
  /// No arguments.
  None,
  /// Exactly one argument.
  One,
  /// Any number of arguments.
  Variadic,
}

/// Implementation backing a template function. Arguments are arity-checked beforehand.
pub type Handler = fn(&AssetResolver, &[&str]) -> Result<String, FunctionError>;

/// Registration record for a template function.
#[derive(Debug, Clone, Copy)]
pub struct TemplateFunction {
  /// Name templates call the function by.
  pub name: &'static str,
  /// Accepted argument count.
  pub arity: Arity,
  /// Escaping behaviour of the output.
  pub safety: Safety,
  /// Function invoked by [`AssetResolver::call`].
  pub handler: Handler,
}

/// Every function the asset helpers register.
pub const TEMPLATE_FUNCTIONS: &[TemplateFunction] = &[
  TemplateFunction {
    name: "stylesheet",
    arity: Arity::Variadic,
    safety: Safety::All,
    handler: stylesheet,
  },
  TemplateFunction {
    name: "javascript",
    arity: Arity::Variadic,
    safety: Safety::All,
    handler: javascript,
  },
  TemplateFunction {
    name: "getJavascriptScriptUrl",
    arity: Arity::One,
    safety: Safety::All,
    handler: script_url,
  },
  TemplateFunction {
    name: "image_url",
    arity: Arity::One,
    safety: Safety::All,
    handler: image_url,
  },
  TemplateFunction {
    name: "cdn_url",
    arity: Arity::One,
    safety: Safety::All,
    handler: cdn_url,
  },
  TemplateFunction {
    name: "language",
    arity: Arity::None,
    safety: Safety::All,
    handler: language,
  },
];

/// Errors raised while dispatching a template function call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FunctionError {
  /// No function with this name is registered.
  #[error("unknown template function `{0}`")]
  Unknown(String),
  /// The call supplied the wrong number of arguments.
  #[error("`{name}` expects {expected}, got {got}")]
  Arity {
    /// Function name.
    name: &'static str,
    /// Human readable description of the accepted count.
    expected: &'static str,
    /// Number of arguments supplied.
    got: usize,
  },
  /// The CDN generator could not be obtained.
  #[error(transparent)]
  Locator(#[from] LocatorError),
}

impl AssetResolver {
  /// Functions to register with the templating engine.
  pub fn functions(&self) -> &'static [TemplateFunction] {
    TEMPLATE_FUNCTIONS
  }

  /// Invoke the template function `name` with `args`.
  pub fn call<S: AsRef<str>>(&self, name: &str, args: &[S]) -> Result<String, FunctionError> {
    let function = TEMPLATE_FUNCTIONS
      .iter()
      .find(|function| function.name == name)
      .ok_or_else(|| FunctionError::Unknown(name.to_string()))?;
    check_arity(function, args.len())?;

    let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    (function.handler)(self, &args)
  }
}

fn first<'a>(args: &[&'a str]) -> &'a str {
  args.first().copied().unwrap_or_default()
}

fn stylesheet(resolver: &AssetResolver, args: &[&str]) -> Result<String, FunctionError> {
  Ok(resolver.render_stylesheet_tags(args))
}

fn javascript(resolver: &AssetResolver, args: &[&str]) -> Result<String, FunctionError> {
  Ok(resolver.render_script_tags(args))
}

fn script_url(resolver: &AssetResolver, args: &[&str]) -> Result<String, FunctionError> {
  Ok(resolver.resolve_script_url(first(args)))
}

fn image_url(resolver: &AssetResolver, args: &[&str]) -> Result<String, FunctionError> {
  Ok(resolver.resolve_image_url(first(args)))
}

fn cdn_url(resolver: &AssetResolver, args: &[&str]) -> Result<String, FunctionError> {
  Ok(resolver.resolve_cdn_url(first(args))?)
}

fn language(resolver: &AssetResolver, _args: &[&str]) -> Result<String, FunctionError> {
  Ok(resolver.resolve_active_language())
}

fn check_arity(function: &TemplateFunction, got: usize) -> Result<(), FunctionError> {
  let expected = match function.arity {
    Arity::Variadic => return Ok(()),
    Arity::None if got == 0 => return Ok(()),
    Arity::One if got == 1 => return Ok(()),
    Arity::None => "no arguments",
    Arity::One => "exactly one argument",
  };
  Err(FunctionError::Arity {
    name: function.name,
    expected,
    got,
  })
}
