#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod config;
pub mod copier;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod resolver;
pub mod stages;
pub mod transform;

pub use builder::Deployer;
pub use bundle::{Esbuild, Minifier};
pub use config::DeployConfig;
pub use error::{DeployError, DeployResult};
pub use ignore::{IgnoreFilter, IgnoreRules};
pub use models::{AssetKind, AssetValue, LibraryManifest, ManifestEntry};
