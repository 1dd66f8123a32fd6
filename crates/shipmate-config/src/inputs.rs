//! Validated release inputs.

use std::collections::BTreeMap;

use semver::Version;

use crate::{Config, ConfigError, ConfigResult};

/// Values given on the command line or through the environment.
///
/// Empty strings count as unset, so an empty `SHIPMATE_RELEASE_BRANCH`
/// falls back to the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub build_command: Option<String>,
    /// JSON object mapping commit types to section titles.
    pub changelog_titles: Option<String>,
    pub dry_run: bool,
    pub disable_git_tagging: bool,
    pub github_token: Option<String>,
    pub git_tag_suffix: Option<String>,
    /// Comma-separated list.
    pub major_types: Option<String>,
    /// Comma-separated list.
    pub minor_types: Option<String>,
    pub release_branch: Option<String>,
    pub tracking_tag: Option<String>,
    pub version_override: Option<String>,
}

/// Everything a release run is configured with, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInputs {
    pub build_command: Option<String>,
    /// Title overrides, to be merged over the built-in titles.
    pub changelog_titles: BTreeMap<String, String>,
    pub dry_run: bool,
    pub enable_git_tagging: bool,
    pub github_token: Option<String>,
    pub git_tag_suffix: String,
    pub major_types: Vec<String>,
    pub minor_types: Vec<String>,
    pub release_branch: String,
    pub tracking_tag: String,
    pub version_override: Option<Version>,
}

impl ReleaseInputs {
    /// Returns the hosting platform token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if no token was given.
    pub fn require_token(&self) -> ConfigResult<&str> {
        self.github_token
            .as_deref()
            .ok_or(ConfigError::MissingToken)
    }
}

impl Config {
    /// Layers `overrides` on top of this configuration and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog titles are not a JSON object of
    /// strings or the version override is not a semantic version.
    pub fn into_inputs(self, overrides: Overrides) -> ConfigResult<ReleaseInputs> {
        let mut changelog_titles = self.changelog.titles;
        if let Some(json) = non_empty(overrides.changelog_titles) {
            let parsed: BTreeMap<String, String> = serde_json::from_str(&json)
                .map_err(|e| ConfigError::InvalidTitles(e.to_string()))?;
            changelog_titles.extend(parsed);
        }

        let version_override = non_empty(overrides.version_override)
            .map(|raw| parse_version(&raw).ok_or(ConfigError::InvalidVersionOverride(raw)))
            .transpose()?;

        let major_types = match non_empty(overrides.major_types) {
            Some(list) => parse_type_list(&list),
            None => self.version.major_types,
        };

        let minor_types = match non_empty(overrides.minor_types) {
            Some(list) => parse_type_list(&list),
            None => self.version.minor_types,
        };

        Ok(ReleaseInputs {
            build_command: non_empty(overrides.build_command).or(self.build.command),
            changelog_titles,
            dry_run: overrides.dry_run,
            enable_git_tagging: self.release.tagging && !overrides.disable_git_tagging,
            github_token: non_empty(overrides.github_token),
            git_tag_suffix: non_empty(overrides.git_tag_suffix)
                .unwrap_or(self.release.tag_suffix),
            major_types,
            minor_types,
            release_branch: non_empty(overrides.release_branch).unwrap_or(self.release.branch),
            tracking_tag: non_empty(overrides.tracking_tag).unwrap_or(self.release.tracking_tag),
            version_override,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated type list, dropping empty entries.
#[must_use]
pub fn parse_type_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Parses a semantic version, accepting a leading `v`.
#[must_use]
pub fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(bare).ok()
}
