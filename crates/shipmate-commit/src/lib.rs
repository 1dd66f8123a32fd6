//! Commit types for Shipmate.
//!
//! This crate provides the commit model shared by every other crate:
//! - [`CommitRecord`]: a commit as read from the repository
//! - [`HeaderParse`]: the result of matching a header against the conventional grammar
//! - [`TypeMatcher`]: case-insensitive, anchored-prefix matching of commit types
//! - [`ClassifiedCommit`]: a commit after classification, see [`classify`]

mod classified;
mod header;
mod matcher;
mod record;

pub use classified::{BREAKING_GROUP, ClassifiedCommit, classify, is_breaking};
pub use header::HeaderParse;
pub use matcher::TypeMatcher;
pub use record::CommitRecord;
