//! Repository operations driven by the release engine.

use shipmate_commit::CommitRecord;

use crate::GitResult;

/// Working tree state after a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// True when nothing is modified, staged or untracked.
    pub is_clean: bool,

    /// Paths with pending changes.
    pub changed: Vec<String>,
}

/// Local and remote branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchList {
    /// Every branch: local ones by name, remote ones as `remotes/{remote}/{name}`.
    pub all: Vec<String>,

    /// The checked out branch, if any.
    pub current: Option<String>,
}

impl BranchList {
    /// Returns true if `remote` has a branch named `branch`.
    #[must_use]
    pub fn has_remote_branch(&self, remote: &str, branch: &str) -> bool {
        let wanted = format!("remotes/{remote}/{branch}");
        self.all.iter().any(|b| *b == wanted)
    }
}

/// Version-control operations used by a release.
///
/// Every mutation is idempotent enough to be re-run: tags are forced and
/// branches are switched rather than recreated.
pub trait RepositoryClient {
    /// Sets the committer identity for this repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository configuration cannot be written.
    fn set_user(&self, name: &str, email: &str) -> GitResult<()>;

    /// Returns the working tree status.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be read.
    fn status(&self) -> GitResult<WorkingTreeStatus>;

    /// Lists local and remote branches.
    ///
    /// # Errors
    ///
    /// Returns an error if branches cannot be read.
    fn list_branches(&self) -> GitResult<BranchList>;

    /// Switches to a branch, creating it from `HEAD` when `create` is set.
    ///
    /// `-` switches back to the previously checked out branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the switch fails.
    fn switch(&self, name: &str, create: bool) -> GitResult<()>;

    /// Merges `branch` into the current branch without fast-forwarding.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge fails.
    fn merge(&self, branch: &str, message: Option<&str>) -> GitResult<()>;

    /// Creates or moves each tag to `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns an error if a tag cannot be written.
    fn add_tags(&self, names: &[String]) -> GitResult<()>;

    /// Force-pushes all tags to `remote`.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails.
    fn push_tags(&self, remote: &str) -> GitResult<()>;

    /// Pushes `branch` to `remote`.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails.
    fn push(&self, remote: &str, branch: &str) -> GitResult<()>;

    /// Stages every change and commits it with `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    fn commit_all_files(&self, message: &str) -> GitResult<()>;

    /// Stages every change and amends `HEAD`, keeping its message.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or amending fails.
    fn amend_commit_with_all_files(&self) -> GitResult<()>;

    /// Returns the commits reachable from `head_sha` but not from `tracking_tag`.
    ///
    /// Returns the full history when the tag is missing, and nothing when the
    /// tag already points at `head_sha`. A shallow clone is deepened as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching or walking the history fails.
    fn fetch_history(&self, tracking_tag: &str, head_sha: &str) -> GitResult<Vec<CommitRecord>>;
}
