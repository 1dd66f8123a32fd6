//! Reading `shipmate.toml`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult};

/// Name of the file looked up in the repository and its parents.
pub const CONFIG_FILE_NAME: &str = "shipmate.toml";

/// Reads and parses a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` does not exist, or an error if
/// it cannot be read or is not valid TOML.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    debug!(?path, "reading configuration");
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Loads the nearest configuration file at or above `start_dir`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if no ancestor holds a configuration
/// file, or an error if the file found is invalid.
pub fn find_and_load_config_from(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    let start_dir = start_dir.as_ref();
    match locate(start_dir) {
        Some(path) => load_config(path),
        None => Err(ConfigError::NotFound(start_dir.join(CONFIG_FILE_NAME))),
    }
}

/// Like [`find_and_load_config_from`], but falls back to defaults when no file exists.
///
/// # Errors
///
/// Returns an error if a configuration file exists but cannot be parsed.
pub fn find_config_or_default(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    match find_and_load_config_from(start_dir) {
        Err(ConfigError::NotFound(path)) => {
            debug!(?path, "no configuration file, using defaults");
            Ok(Config::default())
        }
        other => other,
    }
}

fn locate(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
