//! Repository identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::HostError;

/// A hosted repository, `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    /// The owning user or organization.
    pub owner: String,
    /// The repository name.
    pub repo: String,
}

impl RepoSlug {
    /// Creates a new slug.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Extracts the slug from a GitHub remote URL.
    ///
    /// Supports `git@github.com:owner/repo.git`, `ssh://git@github.com/owner/repo`
    /// and `https://github.com/owner/repo.git`.
    #[must_use]
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let path = url
            .strip_prefix("git@github.com:")
            .or_else(|| url.strip_prefix("ssh://git@github.com/"))
            .or_else(|| url.strip_prefix("https://github.com/"))
            .or_else(|| url.strip_prefix("http://github.com/"))?;
        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        path.parse().ok()
    }

    /// Returns the web URL of a commit.
    #[must_use]
    pub fn commit_url(&self, hash: &str) -> String {
        format!("https://github.com/{}/{}/commit/{hash}", self.owner, self.repo)
    }
}

impl FromStr for RepoSlug {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, repo) = s
            .split_once('/')
            .ok_or_else(|| HostError::InvalidSlug(s.to_string()))?;

        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(HostError::InvalidSlug(s.to_string()));
        }

        Ok(Self::new(owner, repo))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
