//! Configuration error types.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(std::path::PathBuf),

    /// Invalid TOML syntax.
    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The hosting platform token was not provided.
    #[error("a GitHub token is required (--github-token or GITHUB_TOKEN)")]
    MissingToken,

    /// Changelog titles are not a JSON object of strings.
    #[error("invalid changelog titles: {0}")]
    InvalidTitles(String),

    /// The version override is not a semantic version.
    #[error("the version override \"{0}\" is not a valid semver string")]
    InvalidVersionOverride(String),

    /// A run context value could not be determined.
    #[error("unable to determine {what}; set {variable}")]
    MissingContext {
        what: &'static str,
        variable: &'static str,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
