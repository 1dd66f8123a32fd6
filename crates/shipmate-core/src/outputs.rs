//! Values a release run reports to its caller.

use semver::Version;
use serde::Serialize;

use crate::{IncrementDecision, Resolution};

/// The externally observable result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutputs {
    pub current_version: Version,
    pub increment_type: IncrementDecision,
    pub next_version: Version,
}

impl RunOutputs {
    /// Returns the `(name, value)` pairs in reporting order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("current-version", self.current_version.to_string()),
            ("increment-type", self.increment_type.to_string()),
            ("next-version", self.next_version.to_string()),
            ("next-version-major", self.next_version.major.to_string()),
            ("next-version-minor", self.next_version.minor.to_string()),
            ("next-version-patch", self.next_version.patch.to_string()),
        ]
    }
}

impl From<Resolution> for RunOutputs {
    fn from(resolution: Resolution) -> Self {
        Self {
            current_version: resolution.current,
            increment_type: resolution.applied,
            next_version: resolution.next,
        }
    }
}
