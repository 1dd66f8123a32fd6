//! Release operations on the hosting platform.

use serde::Serialize;

use crate::HostResult;

/// Outcome of a latest-release lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestRelease {
    /// A release exists with this tag.
    Found {
        /// The release tag name, e.g. `v1.2.3`.
        tag_name: String,
    },
    /// The repository has no published release.
    NotFound,
}

/// A release to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub prerelease: bool,
    pub draft: bool,
}

impl NewRelease {
    /// Creates a published, non-prerelease release named after its tag.
    #[must_use]
    pub fn published(tag_name: impl Into<String>, body: impl Into<String>) -> Self {
        let tag_name = tag_name.into();
        Self {
            name: tag_name.clone(),
            tag_name,
            body: body.into(),
            prerelease: false,
            draft: false,
        }
    }
}

/// A release as returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRelease {
    pub id: u64,
    pub html_url: String,
}

/// Hosting platform release API.
pub trait ReleaseHost {
    /// Returns the latest published release.
    ///
    /// # Errors
    ///
    /// Returns an error on any failure other than "no release".
    fn latest_release(&self) -> HostResult<LatestRelease>;

    /// Creates a release.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the request.
    fn create_release(&self, release: &NewRelease) -> HostResult<CreatedRelease>;
}
