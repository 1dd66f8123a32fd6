//! Version resolution and release tags.

use semver::{BuildMetadata, Prerelease, Version};
use shipmate_config::parse_version;

use crate::{CoreError, CoreResult, IncrementDecision};

/// Tag assumed when the repository has never been released.
pub const BASELINE_TAG: &str = "v0.0.0";

/// Floating tag moved to every release.
pub const LATEST_TAG: &str = "latest";

/// The outcome of version resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The version of the latest release.
    pub current: Version,
    /// The version to release.
    pub next: Version,
    /// The increment from `current` to `next`.
    pub applied: IncrementDecision,
}

/// Computes the next version.
pub struct VersionResolver;

impl VersionResolver {
    /// Parses a release tag name such as `v1.2.3`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTag`] if the tag is not a semantic version.
    pub fn parse_tag(tag: &str) -> CoreResult<Version> {
        parse_version(tag).ok_or_else(|| CoreError::InvalidTag(tag.to_string()))
    }

    /// Resolves the next version.
    ///
    /// An override is used verbatim and the applied increment is recomputed
    /// from it; otherwise `current` is incremented by `decision`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoVersionChange`] if the override equals `current`.
    pub fn resolve(
        current: &Version,
        version_override: Option<&Version>,
        decision: IncrementDecision,
    ) -> CoreResult<Resolution> {
        let (next, applied) = match version_override {
            Some(next) => {
                let applied = Self::diff(current, next)
                    .ok_or_else(|| CoreError::NoVersionChange(next.clone()))?;
                (next.clone(), applied)
            }
            None => (Self::bump(current, decision), decision),
        };

        Ok(Resolution {
            current: current.clone(),
            next,
            applied,
        })
    }

    /// Increments a version.
    ///
    /// A prerelease of the target version is promoted instead of skipped:
    /// `1.3.0-rc.1` bumped by `minor` is `1.3.0`.
    #[must_use]
    pub fn bump(version: &Version, decision: IncrementDecision) -> Version {
        let mut next = version.clone();
        let promote = !version.pre.is_empty();

        match decision {
            IncrementDecision::Major => {
                if !(promote && version.minor == 0 && version.patch == 0) {
                    next.major += 1;
                }
                next.minor = 0;
                next.patch = 0;
            }
            IncrementDecision::Minor => {
                if !(promote && version.patch == 0) {
                    next.minor += 1;
                }
                next.patch = 0;
            }
            IncrementDecision::Patch => {
                if !promote {
                    next.patch += 1;
                }
            }
        }

        next.pre = Prerelease::EMPTY;
        next.build = BuildMetadata::EMPTY;
        next
    }

    /// Returns the most significant component that differs.
    ///
    /// A prerelease-only difference counts as `Patch`; build metadata is
    /// ignored. Returns `None` for equal versions.
    #[must_use]
    pub fn diff(from: &Version, to: &Version) -> Option<IncrementDecision> {
        if from.major != to.major {
            Some(IncrementDecision::Major)
        } else if from.minor != to.minor {
            Some(IncrementDecision::Minor)
        } else if from.patch != to.patch || from.pre != to.pre {
            Some(IncrementDecision::Patch)
        } else {
            None
        }
    }
}

/// A version to release and its tag names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    version: Version,
    suffix: String,
}

impl ReleaseVersion {
    /// Creates a release version whose tags end with `suffix`.
    #[must_use]
    pub fn new(version: Version, suffix: impl Into<String>) -> Self {
        Self {
            version,
            suffix: suffix.into(),
        }
    }

    /// Returns the version.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// `v{major}.{minor}.{patch}{suffix}`, with any prerelease.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}{}", self.version, self.suffix)
    }

    /// `v{major}.{minor}{suffix}`
    #[must_use]
    pub fn minor_tag(&self) -> String {
        format!("v{}.{}{}", self.version.major, self.version.minor, self.suffix)
    }

    /// `v{major}{suffix}`
    #[must_use]
    pub fn major_tag(&self) -> String {
        format!("v{}{}", self.version.major, self.suffix)
    }

    /// Every tag set on a release commit, `latest` first.
    #[must_use]
    pub fn release_tags(&self) -> Vec<String> {
        vec![
            LATEST_TAG.to_string(),
            self.tag(),
            self.minor_tag(),
            self.major_tag(),
        ]
    }
}
