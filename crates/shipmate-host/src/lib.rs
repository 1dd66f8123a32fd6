//! Hosting platform access for Shipmate.
//!
//! This crate provides:
//! - [`ReleaseHost`]: latest-release lookup and release creation
//! - [`GitHubHost`]: the GitHub REST API implementation
//! - [`RepoSlug`]: the `owner/repo` pair identifying a hosted repository

mod error;
mod github;
mod host;
mod slug;

pub use error::{HostError, HostResult};
pub use github::{DEFAULT_API_URL, GitHubHost};
pub use host::{CreatedRelease, LatestRelease, NewRelease, ReleaseHost};
pub use slug::RepoSlug;
