#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod cdn;
pub mod config;
pub mod functions;
pub mod host;
pub mod locator;
pub mod manifest;
pub mod query;
pub mod resolver;
pub mod routing;

pub use cdn::{CdnAssetUrl, CdnUrlGenerator};
pub use config::AssetsConfig;
pub use functions::{FunctionError, TEMPLATE_FUNCTIONS, TemplateFunction};
pub use host::{HostEnvironment, StaticHost};
pub use locator::{LocatorError, ServiceLocator};
pub use manifest::{Manifest, resolve_manifest_entry};
pub use resolver::{AssetGlobals, AssetResolver};
pub use routing::ScriptRoute;
