//! Core error types.

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Hosting platform error.
    #[error("hosting platform error: {0}")]
    Host(#[from] shipmate_host::HostError),

    /// A repository operation failed.
    #[error("{step} failed: {source}")]
    Repository {
        step: &'static str,
        #[source]
        source: shipmate_git::GitError,
    },

    /// The latest release tag is not a semantic version.
    #[error("the tag name \"{0}\" for the latest release is not a valid semver version")]
    InvalidTag(String),

    /// The version override equals the current version.
    #[error("the version override {0} matches the current version, nothing to release")]
    NoVersionChange(semver::Version),

    /// The build command could not run or failed.
    #[error("build command `{command}` failed: {reason}")]
    Build { command: String, reason: String },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Attaches the failing step to repository errors.
pub(crate) trait StepExt<T> {
    fn during(self, step: &'static str) -> CoreResult<T>;
}

impl<T> StepExt<T> for shipmate_git::GitResult<T> {
    fn during(self, step: &'static str) -> CoreResult<T> {
        self.map_err(|source| CoreError::Repository { step, source })
    }
}
