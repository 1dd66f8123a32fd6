//! Version determination, shared by releases and previews.

use shipmate_commit::CommitRecord;
use shipmate_config::{ReleaseInputs, RunContext};
use shipmate_git::RepositoryClient;
use shipmate_host::{LatestRelease, ReleaseHost};
use tracing::{debug, info, warn};

use crate::error::StepExt;
use crate::{
    BASELINE_TAG, ChangelogBuilder, CoreResult, IncrementPolicy, ReleaseVersion, Resolution,
    VersionResolver,
};

/// What the next release will be, before any side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    /// Current and next versions.
    pub resolution: Resolution,
    /// Commits since the tracking tag, newest first.
    pub history: Vec<CommitRecord>,
}

impl ReleasePlan {
    /// Determines the next release.
    ///
    /// Returns `None` when nothing was committed since the tracking tag and no
    /// version override is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the latest release cannot be looked up, its tag is
    /// not a semantic version, the history cannot be read, or the override
    /// equals the current version.
    pub fn prepare<R, H>(
        repo: &R,
        host: &H,
        inputs: &ReleaseInputs,
        run: &RunContext,
    ) -> CoreResult<Option<Self>>
    where
        R: RepositoryClient,
        H: ReleaseHost,
    {
        let tag_name = match host.latest_release()? {
            LatestRelease::Found { tag_name } => tag_name,
            LatestRelease::NotFound => {
                warn!(
                    tag = BASELINE_TAG,
                    "no releases found in the repository, using the baseline version"
                );
                BASELINE_TAG.to_string()
            }
        };
        let current = VersionResolver::parse_tag(&tag_name)?;

        let history = repo
            .fetch_history(&inputs.tracking_tag, &run.sha)
            .during("reading the commit history")?;
        debug!(
            tracking_tag = %inputs.tracking_tag,
            commits = history.len(),
            "commit history loaded"
        );

        if history.is_empty() && inputs.version_override.is_none() {
            info!(sha = %run.sha, "commit matches the tracking tag, nothing to release");
            return Ok(None);
        }

        let decision = IncrementPolicy::new(
            inputs.major_types.as_slice(),
            inputs.minor_types.as_slice(),
        )
        .decide(&history);
        let resolution =
            VersionResolver::resolve(&current, inputs.version_override.as_ref(), decision)?;

        info!(
            current = %resolution.current,
            increment = %resolution.applied,
            next = %resolution.next,
            "version determined"
        );

        Ok(Some(Self {
            resolution,
            history,
        }))
    }

    /// Returns the version to release with its tag names.
    #[must_use]
    pub fn release_version(&self, inputs: &ReleaseInputs) -> ReleaseVersion {
        ReleaseVersion::new(self.resolution.next.clone(), inputs.git_tag_suffix.clone())
    }

    /// Renders the release notes.
    #[must_use]
    pub fn release_notes(&self, inputs: &ReleaseInputs, run: &RunContext) -> String {
        ChangelogBuilder::for_release(run.slug.clone(), inputs).build(&self.history)
    }
}
