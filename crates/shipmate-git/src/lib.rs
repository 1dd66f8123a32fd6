//! Git abstraction layer for Shipmate.
//!
//! This crate provides the repository operations a release needs:
//! - [`RepositoryClient`]: the operations the release engine drives
//! - [`GitClient`]: the implementation backed by libgit2 and the `git` CLI

mod client;
mod error;
mod repository;

pub use client::{BranchList, RepositoryClient, WorkingTreeStatus};
pub use error::{GitError, GitResult};
pub use repository::{DEFAULT_REMOTE, GitClient};
