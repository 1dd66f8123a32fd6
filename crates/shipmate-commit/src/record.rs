//! Commit record as read from the repository.

use serde::{Deserialize, Serialize};

/// A commit in the history window, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The full commit hash.
    pub hash: String,

    /// The commit subject line.
    pub message: String,

    /// Everything after the subject line, possibly empty.
    pub body: String,
}

impl CommitRecord {
    /// Creates a new commit record.
    #[must_use]
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
            body: body.into(),
        }
    }

    /// Splits a raw commit message into subject and body.
    ///
    /// The blank separator line between subject and body is dropped.
    #[must_use]
    pub fn from_raw_message(hash: impl Into<String>, raw: &str) -> Self {
        let (subject, rest) = raw.split_once('\n').unwrap_or((raw, ""));
        Self::new(hash, subject.trim_end(), rest.trim())
    }

    /// Returns the short hash (first 7 characters).
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}
