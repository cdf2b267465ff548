//! Command-line access to the asset template functions.

use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use asset_resolver::{AssetsConfig, TEMPLATE_FUNCTIONS};

/// Resolve logical asset names the way templates do.
#[derive(Debug, Parser)]
#[command(name = "asset-resolve", version, about)]
struct Cli {
  /// Configuration file. Discovered in the project root when omitted.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Project root that manifest paths are relative to.
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Print the available template functions and exit.
  #[arg(long)]
  list: bool,

  /// Template function to call, e.g. `stylesheet` or `image_url`.
  #[arg(required_unless_present = "list")]
  function: Option<String>,

  /// Arguments passed to the function.
  args: Vec<String>,
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

  let cli = Cli::parse();
  let mut stdout = io::stdout().lock();
  match run(cli, &mut stdout).and_then(|()| Ok(stdout.flush()?)) {
    Ok(()) => ExitCode::SUCCESS,
    // The reader went away, e.g. `asset-resolve --list | head -1`.
    Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
  if cli.list {
    for function in TEMPLATE_FUNCTIONS {
      writeln!(out, "{}", function.name)?;
    }
    return Ok(());
  }

  let config = match &cli.config {
    Some(path) => AssetsConfig::from_path(path)?,
    None => AssetsConfig::discover(&cli.root),
  };
  let resolver = config
    .build_resolver(&cli.root)
    .context("failed to prepare asset resolver")?;

  let function = cli.function.as_deref().unwrap_or_default();
  writeln!(out, "{}", resolver.call(function, cli.args.as_slice())?)?;
  Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
  err
    .chain()
    .filter_map(|cause| cause.downcast_ref::<io::Error>())
    .any(|io_err| io_err.kind() == ErrorKind::BrokenPipe)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn run_with(args: &[&str]) -> Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("asset-resolve").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
  }

  /// Writer that rejects every write the way a closed pipe does.
  struct ClosedPipe;

  impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
      Err(io::Error::from(ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  #[test]
  fn lists_every_function_name() {
    let output = run_with(&["--list"]).unwrap();
    let names: Vec<&str> = output.lines().collect();
    let expected: Vec<&str> = TEMPLATE_FUNCTIONS.iter().map(|f| f.name).collect();
    assert_eq!(names, expected);
  }

  #[test]
  fn function_is_required_without_list() {
    assert!(Cli::try_parse_from(["asset-resolve"]).is_err());
  }

  #[test]
  fn renders_stylesheets_in_argument_order() {
    let dir = tempdir().unwrap();
    let root = dir.path().to_str().unwrap();
    fs::write(
      dir.path().join("assets.config.json"),
      r#"{"assets_url": "https://site/assets"}"#,
    )
    .unwrap();

    let output = run_with(&["--root", root, "stylesheet", "a.css", "b.css"]).unwrap();
    assert_eq!(
      output,
      "<link rel=\"stylesheet\" type=\"text/css\" href=\"https://site/assets/dist/css/a.css\" />\n\
       <link rel=\"stylesheet\" type=\"text/css\" href=\"https://site/assets/dist/css/b.css\" />\n"
    );
  }

  #[test]
  fn loads_explicit_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("custom.yaml");
    fs::write(&config, "assets_url: /static\nversion: \"9.9\"\n").unwrap();

    let output = run_with(&[
      "--root",
      dir.path().to_str().unwrap(),
      "--config",
      config.to_str().unwrap(),
      "getJavascriptScriptUrl",
      "lib/x.js",
    ])
    .unwrap();
    assert_eq!(output, "/static/js/lib/x.js?ver=9.9\n");
  }

  #[test]
  fn missing_explicit_config_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(run_with(&["--config", missing.to_str().unwrap(), "language"]).is_err());
  }

  #[test]
  fn unknown_function_is_an_error() {
    let dir = tempdir().unwrap();
    let err = run_with(&["--root", dir.path().to_str().unwrap(), "asset", "a"]).unwrap_err();
    assert!(err.to_string().contains("unknown template function `asset`"));
  }

  #[test]
  fn closed_output_is_reported_as_broken_pipe() {
    let cli = Cli::try_parse_from(["asset-resolve", "--list"]).unwrap();
    let err = run(cli, &mut ClosedPipe).unwrap_err();
    assert!(is_broken_pipe(&err));

    assert!(!is_broken_pipe(&anyhow::anyhow!("unrelated failure")));
  }
}
