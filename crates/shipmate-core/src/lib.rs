//! Core library for Shipmate.
//!
//! This crate decides what a release contains and drives it through the
//! repository and the hosting platform:
//! - [`IncrementPolicy`]: major, minor or patch from the commit history
//! - [`ChangelogBuilder`]: release notes grouped by commit type
//! - [`VersionResolver`]: the next version and its tags
//! - [`ReleasePlan`]: the next release, determined without side effects
//! - [`ReleaseStateMachine`]: the tag, branch, build, push and publish sequence

mod build;
mod changelog;
mod error;
mod increment;
mod outputs;
mod plan;
mod release;
mod version;

#[cfg(test)]
mod fakes;

pub use build::{BuildRunner, ShellBuildRunner};
pub use changelog::{ChangelogBuilder, DEFAULT_TYPE_TITLES, TypeTitles};
pub use error::{CoreError, CoreResult};
pub use increment::{IncrementDecision, IncrementPolicy};
pub use outputs::RunOutputs;
pub use plan::ReleasePlan;
pub use release::{ReleaseOutcome, ReleaseState, ReleaseStateMachine};
pub use version::{BASELINE_TAG, LATEST_TAG, ReleaseVersion, Resolution, VersionResolver};
