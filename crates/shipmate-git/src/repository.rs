//! Git repository client.
//!
//! Reads go through libgit2. Mutations and network operations shell out to
//! the `git` binary so they honour the runner's credentials and hooks.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{BranchType, ErrorCode, Oid, Repository, Sort, Status, StatusOptions};
use shipmate_commit::CommitRecord;
use tracing::{debug, info};

use crate::{BranchList, GitError, GitResult, RepositoryClient, WorkingTreeStatus};

/// Remote used when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// A Git repository client.
pub struct GitClient {
    inner: Repository,
    workdir: PathBuf,
    remote: String,
}

impl GitClient {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a non-bare Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Repository::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Self::from_repository(inner)
    }

    /// Discovers the repository containing the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner =
            Repository::discover(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Self::from_repository(inner)
    }

    fn from_repository(inner: Repository) -> GitResult<Self> {
        let workdir = inner
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::Bare(inner.path().to_path_buf()))?;

        Ok(Self {
            inner,
            workdir,
            remote: DEFAULT_REMOTE.to_string(),
        })
    }

    /// Uses `remote` for fetching history.
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Returns the working directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.workdir
    }

    /// Returns the sha of `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns an error if `HEAD` does not point at a commit.
    pub fn head_sha(&self) -> GitResult<String> {
        let commit = self.inner.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// Returns the checked out branch, or `None` when `HEAD` is detached.
    #[must_use]
    pub fn current_branch(&self) -> Option<String> {
        let head = self.inner.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        head.shorthand().map(String::from)
    }

    /// Returns the URL of the given remote, if configured.
    #[must_use]
    pub fn remote_url(&self, name: &str) -> Option<String> {
        let remote = self.inner.find_remote(name).ok()?;
        remote.url().map(String::from)
    }

    fn has_remote(&self) -> bool {
        self.inner.find_remote(&self.remote).is_ok()
    }

    fn tag_target(&self, tag: &str) -> GitResult<Option<Oid>> {
        match self.inner.find_reference(&format!("refs/tags/{tag}")) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }



    /// Runs `git` in the working directory and returns its trimmed stdout.
    fn git(&self, args: &[&str]) -> GitResult<String> {
        let command = format!("git {}", args.join(" "));
        debug!(%command, "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        if !output.status.success() {
            return Err(GitError::Command {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Reopens the repository so libgit2 sees the shallow boundary moved by a fetch.
    fn reopen(&self) -> GitResult<Repository> {
        Ok(Repository::open(&self.workdir)?)
    }
}

fn resolve_sha(repo: &Repository, sha: &str) -> GitResult<Oid> {
    let oid = Oid::from_str(sha).map_err(|_| GitError::InvalidSha(sha.to_string()))?;
    repo.find_commit(oid)
        .map_err(|_| GitError::InvalidSha(sha.to_string()))?;
    Ok(oid)
}

fn walk(repo: &Repository, head: Oid, hide: Option<Oid>) -> GitResult<Vec<CommitRecord>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    revwalk.push(head)?;
    if let Some(from) = hide {
        revwalk.hide(from)?;
    }

    let mut commits = Vec::new();
    for oid in revwalk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        commits.push(CommitRecord::from_raw_message(
            oid.to_string(),
            commit.message().unwrap_or(""),
        ));
    }

    Ok(commits)
}

impl RepositoryClient for GitClient {
    fn set_user(&self, name: &str, email: &str) -> GitResult<()> {
        let mut config = self.inner.config()?;
        config.set_str("user.name", name)?;
        config.set_str("user.email", email)?;
        Ok(())
    }

    fn status(&self) -> GitResult<WorkingTreeStatus> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.inner.statuses(Some(&mut options))?;
        let changed: Vec<String> = statuses
            .iter()
            .filter(|entry| !entry.status().contains(Status::IGNORED))
            .filter_map(|entry| entry.path().map(String::from))
            .collect();

        Ok(WorkingTreeStatus {
            is_clean: changed.is_empty(),
            changed,
        })
    }

    fn list_branches(&self) -> GitResult<BranchList> {
        let mut all = Vec::new();
        for branch in self.inner.branches(None)? {
            let (branch, kind) = branch?;
            let Some(name) = branch.name()? else {
                continue;
            };
            match kind {
                BranchType::Local => all.push(name.to_string()),
                BranchType::Remote => all.push(format!("remotes/{name}")),
            }
        }

        Ok(BranchList {
            all,
            current: self.current_branch(),
        })
    }

    fn switch(&self, name: &str, create: bool) -> GitResult<()> {
        if create {
            self.git(&["switch", "-c", name])?;
        } else {
            self.git(&["switch", name])?;
        }
        Ok(())
    }

    fn merge(&self, branch: &str, message: Option<&str>) -> GitResult<()> {
        let mut args = vec!["merge", branch, "--no-ff"];
        if let Some(message) = message {
            args.extend(["-m", message]);
        }
        self.git(&args)?;
        Ok(())
    }

    fn add_tags(&self, names: &[String]) -> GitResult<()> {
        for name in names {
            self.git(&["tag", "--force", name.as_str()])?;
        }
        Ok(())
    }

    fn push_tags(&self, remote: &str) -> GitResult<()> {
        self.git(&["push", remote, "--tags", "--force"])?;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> GitResult<()> {
        self.git(&["push", remote, branch])?;
        Ok(())
    }

    fn commit_all_files(&self, message: &str) -> GitResult<()> {
        self.git(&["add", "."])?;
        self.git(&["commit", "-m", message])?;
        Ok(())
    }

    fn amend_commit_with_all_files(&self) -> GitResult<()> {
        self.git(&["add", "."])?;
        self.git(&["commit", "--amend", "--no-edit"])?;
        Ok(())
    }

    fn fetch_history(&self, tracking_tag: &str, head_sha: &str) -> GitResult<Vec<CommitRecord>> {
        let online = self.has_remote();
        if online {
            self.git(&["fetch", "--tags", self.remote.as_str()])?;
        } else {
            debug!(remote = %self.remote, "remote not configured, using local history");
        }

        let is_shallow = self.inner.is_shallow();
        debug!(is_shallow, "repository depth");

        let deepen = is_shallow && online;
        let from = self.tag_target(tracking_tag)?;
        match from {
            Some(_) if deepen => {
                let exclude = format!("--shallow-exclude={tracking_tag}");
                self.git(&["fetch", exclude.as_str(), self.remote.as_str()])?;
                // one more commit so the tagged commit itself is present
                self.git(&["fetch", "--deepen=1", self.remote.as_str()])?;
            }
            Some(_) => {}
            None => {
                info!(
                    tag = tracking_tag,
                    "tracking tag not found, retrieving the full history"
                );
                if deepen {
                    self.git(&["fetch", "--unshallow", self.remote.as_str()])?;
                }
            }
        }

        let reopened;
        let repo = if deepen {
            reopened = self.reopen()?;
            &reopened
        } else {
            &self.inner
        };

        let head = resolve_sha(repo, head_sha)?;
        if from == Some(head) {
            return Ok(Vec::new());
        }

        debug!(tag = tracking_tag, from = ?from, to = %head, "reading history");
        walk(repo, head, from)
    }
}
