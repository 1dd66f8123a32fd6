//! Hosting platform error types.

/// Result type for hosting platform operations.
pub type HostResult<T> = Result<T, HostError>;

/// Hosting platform error types.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The request could not be sent or its response could not be read.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a failure status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Malformed `owner/repo` slug.
    #[error("invalid repository slug: {0}")]
    InvalidSlug(String),

    /// The HTTP client or async runtime could not be created.
    #[error("failed to initialize HTTP client: {0}")]
    Client(String),
}
