//! Configuration management for Shipmate.
//!
//! This crate handles loading the `shipmate.toml` configuration file,
//! layering command-line and environment overrides on top of it, and
//! describing the CI run a release happens in.

mod context;
mod error;
mod inputs;
mod loader;
mod schema;

pub use context::{LocalRepo, RunContext, RunContextInputs};
pub use error::{ConfigError, ConfigResult};
pub use inputs::{Overrides, ReleaseInputs, parse_type_list, parse_version};
pub use loader::{CONFIG_FILE_NAME, find_and_load_config_from, find_config_or_default, load_config};
pub use schema::{BuildConfig, ChangelogConfig, Config, ReleaseConfig, VersionConfig};
