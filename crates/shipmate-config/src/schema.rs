//! Configuration schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Release branch and tagging configuration.
    #[serde(default)]
    pub release: ReleaseConfig,

    /// Version decision configuration.
    #[serde(default)]
    pub version: VersionConfig,

    /// Build step configuration.
    #[serde(default)]
    pub build: BuildConfig,

    /// Changelog configuration.
    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// Release branch and tagging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Branch receiving release commits.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Tag marking the last evaluated source commit.
    #[serde(default = "default_tracking_tag")]
    pub tracking_tag: String,

    /// Set `latest` and version tags on the release commit.
    #[serde(default = "default_true")]
    pub tagging: bool,

    /// Appended to every version tag, e.g. `-node`.
    #[serde(default)]
    pub tag_suffix: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            tracking_tag: default_tracking_tag(),
            tagging: true,
            tag_suffix: String::new(),
        }
    }
}

fn default_branch() -> String {
    "release".to_string()
}

fn default_tracking_tag() -> String {
    "latest-src".to_string()
}

fn default_true() -> bool {
    true
}

/// Version decision configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConfig {
    /// Commit types forcing a major release.
    #[serde(default)]
    pub major_types: Vec<String>,

    /// Commit types triggering a minor release.
    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            major_types: Vec::new(),
            minor_types: default_minor_types(),
        }
    }
}

fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string()]
}

/// Build step configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Shell command run on the release branch before committing.
    pub command: Option<String>,
}

/// Changelog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogConfig {
    /// Section titles by commit type, merged over the built-in ones.
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
}
