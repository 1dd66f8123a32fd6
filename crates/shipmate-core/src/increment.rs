//! Version increment policy.

use serde::{Deserialize, Serialize};
use shipmate_commit::{CommitRecord, HeaderParse, TypeMatcher, is_breaking};
use tracing::debug;

/// The part of the version a release increments.
///
/// Ordered `Patch < Minor < Major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementDecision {
    /// Bug fixes only.
    Patch,
    /// New features.
    Minor,
    /// Breaking changes.
    Major,
}

impl std::fmt::Display for IncrementDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// Reduces a commit history to one [`IncrementDecision`].
#[derive(Debug, Clone, Default)]
pub struct IncrementPolicy {
    major_types: TypeMatcher,
    minor_types: TypeMatcher,
}

impl IncrementPolicy {
    /// Creates a policy from major and minor type lists.
    #[must_use]
    pub fn new<S: AsRef<str>>(major_types: &[S], minor_types: &[S]) -> Self {
        Self {
            major_types: TypeMatcher::new(major_types),
            minor_types: TypeMatcher::new(minor_types),
        }
    }

    /// Returns the matcher for major types.
    #[must_use]
    pub fn major_types(&self) -> &TypeMatcher {
        &self.major_types
    }

    /// Decides the increment for `history`.
    ///
    /// Commits outside the conventional grammar are ignored. The first
    /// breaking commit decides `Major`; otherwise any minor-type commit
    /// decides `Minor`; otherwise `Patch`.
    #[must_use]
    pub fn decide(&self, history: &[CommitRecord]) -> IncrementDecision {
        let mut decision = IncrementDecision::Patch;

        for record in history {
            if !HeaderParse::parse(&record.message).is_matched() {
                debug!(
                    hash = %record.short_hash(),
                    subject = %record.message,
                    "skipping unparseable commit"
                );
                continue;
            }

            if is_breaking(record, &self.major_types) {
                return IncrementDecision::Major;
            }

            if self.minor_types.matches(&record.message) {
                decision = IncrementDecision::Minor;
            }
        }

        decision
    }
}
