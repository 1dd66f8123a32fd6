//! Commit classification.

use serde::{Deserialize, Serialize};

use crate::{CommitRecord, HeaderParse, TypeMatcher};

/// Group key used for breaking changes, overriding the parsed type.
pub const BREAKING_GROUP: &str = "breaking";

/// A commit that follows the conventional grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCommit {
    /// The full commit hash.
    pub hash: String,

    /// The parsed commit type.
    pub r#type: String,

    /// The commit scope, if parentheses were present.
    pub scope: Option<String>,

    /// The trimmed description.
    pub description: String,

    /// Whether the commit is a breaking change.
    pub is_breaking: bool,
}

impl ClassifiedCommit {
    /// Returns the changelog group of this commit.
    ///
    /// Breaking commits are grouped under [`BREAKING_GROUP`] whatever their type.
    #[must_use]
    pub fn group(&self) -> &str {
        if self.is_breaking {
            BREAKING_GROUP
        } else {
            &self.r#type
        }
    }

    /// Returns the short hash (first 7 characters).
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Returns true if the commit is a breaking change.
///
/// A commit breaks when its header contains `!:`, its body mentions
/// `BREAKING CHANGE` or `BREAKING-CHANGE`, or its header starts with one of
/// the major types.
#[must_use]
pub fn is_breaking(record: &CommitRecord, major_types: &TypeMatcher) -> bool {
    record.message.contains("!:")
        || record.body.contains("BREAKING CHANGE")
        || record.body.contains("BREAKING-CHANGE")
        || major_types.matches(&record.message)
}

/// Classifies a commit record.
///
/// Returns `None` when the header does not follow the conventional grammar.
#[must_use]
pub fn classify(record: &CommitRecord, major_types: &TypeMatcher) -> Option<ClassifiedCommit> {
    let HeaderParse::Matched {
        r#type,
        scope,
        description,
    } = HeaderParse::parse(&record.message)
    else {
        return None;
    };

    Some(ClassifiedCommit {
        hash: record.hash.clone(),
        r#type,
        scope,
        description,
        is_breaking: is_breaking(record, major_types),
    })
}
