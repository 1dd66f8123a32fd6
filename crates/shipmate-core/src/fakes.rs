//! Recording collaborators for engine tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use shipmate_commit::CommitRecord;
use shipmate_config::{Config, Overrides, ReleaseInputs, RunContext};
use shipmate_git::{BranchList, GitError, GitResult, RepositoryClient, WorkingTreeStatus};
use shipmate_host::{
    CreatedRelease, DEFAULT_API_URL, HostError, HostResult, LatestRelease, NewRelease,
    ReleaseHost, RepoSlug,
};

use crate::{BuildRunner, CoreError, CoreResult};

pub const HASH: &str = "a10d25492f1c3a33f05947cc5445f5a159436b7a";

pub fn commit(message: &str) -> CommitRecord {
    CommitRecord::new(HASH, message, "")
}

pub fn inputs() -> ReleaseInputs {
    Config::default()
        .into_inputs(Overrides {
            github_token: Some("token".to_string()),
            ..Overrides::default()
        })
        .unwrap()
}

pub fn run_context() -> RunContext {
    RunContext {
        slug: RepoSlug::new("owner", "repo"),
        sha: HASH.to_string(),
        source_branch: "main".to_string(),
        actor: "octocat".to_string(),
        actor_id: Some("583231".to_string()),
        workspace: PathBuf::from("/work"),
        api_url: DEFAULT_API_URL.to_string(),
    }
}

/// Records every repository call as `"{operation} {arguments}"`.
#[derive(Debug, Default)]
pub struct FakeRepo {
    history: Vec<CommitRecord>,
    branches: Vec<String>,
    clean: bool,
    fail_on: Option<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl FakeRepo {
    pub fn with_history(history: Vec<CommitRecord>) -> Self {
        Self {
            history,
            branches: vec!["main".to_string(), "remotes/origin/main".to_string()],
            ..Self::default()
        }
    }

    pub fn with_release_branch(mut self) -> Self {
        self.branches.push("remotes/origin/release".to_string());
        self
    }

    pub fn clean(mut self) -> Self {
        self.clean = true;
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &'static str, arguments: &str) -> GitResult<()> {
        let call = if arguments.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {arguments}")
        };
        self.calls.borrow_mut().push(call);

        if self.fail_on == Some(operation) {
            return Err(GitError::Command {
                command: format!("git {operation}"),
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl RepositoryClient for FakeRepo {
    fn set_user(&self, name: &str, email: &str) -> GitResult<()> {
        self.record("set_user", &format!("{name} <{email}>"))
    }

    fn status(&self) -> GitResult<WorkingTreeStatus> {
        self.record("status", "")?;
        Ok(WorkingTreeStatus {
            is_clean: self.clean,
            changed: if self.clean {
                Vec::new()
            } else {
                vec!["dist/index.js".to_string()]
            },
        })
    }

    fn list_branches(&self) -> GitResult<BranchList> {
        self.record("list_branches", "")?;
        Ok(BranchList {
            all: self.branches.clone(),
            current: Some("main".to_string()),
        })
    }

    fn switch(&self, name: &str, create: bool) -> GitResult<()> {
        if create {
            self.record("switch", &format!("-c {name}"))
        } else {
            self.record("switch", name)
        }
    }

    fn merge(&self, branch: &str, message: Option<&str>) -> GitResult<()> {
        match message {
            Some(message) => self.record("merge", &format!("{branch} -m {message}")),
            None => self.record("merge", branch),
        }
    }

    fn add_tags(&self, names: &[String]) -> GitResult<()> {
        self.record("add_tags", &names.join(" "))
    }

    fn push_tags(&self, remote: &str) -> GitResult<()> {
        self.record("push_tags", remote)
    }

    fn push(&self, remote: &str, branch: &str) -> GitResult<()> {
        self.record("push", &format!("{remote} {branch}"))
    }

    fn commit_all_files(&self, message: &str) -> GitResult<()> {
        self.record("commit", message)
    }

    fn amend_commit_with_all_files(&self) -> GitResult<()> {
        self.record("amend", "")
    }

    fn fetch_history(&self, tracking_tag: &str, head_sha: &str) -> GitResult<Vec<CommitRecord>> {
        self.record("fetch_history", &format!("{tracking_tag} {head_sha}"))?;
        Ok(self.history.clone())
    }
}

/// Answers the latest-release lookup and records created releases.
#[derive(Debug)]
pub struct FakeHost {
    latest: Option<LatestRelease>,
    created: RefCell<Vec<NewRelease>>,
}

impl FakeHost {
    pub fn latest(tag_name: &str) -> Self {
        Self {
            latest: Some(LatestRelease::Found {
                tag_name: tag_name.to_string(),
            }),
            created: RefCell::default(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            latest: Some(LatestRelease::NotFound),
            created: RefCell::default(),
        }
    }

    /// Fails the latest-release lookup with a server error.
    pub fn failing() -> Self {
        Self {
            latest: None,
            created: RefCell::default(),
        }
    }

    pub fn created(&self) -> Vec<NewRelease> {
        self.created.borrow().clone()
    }
}

impl ReleaseHost for FakeHost {
    fn latest_release(&self) -> HostResult<LatestRelease> {
        self.latest.clone().ok_or(HostError::Api {
            status: 500,
            message: "Server Error".to_string(),
        })
    }

    fn create_release(&self, release: &NewRelease) -> HostResult<CreatedRelease> {
        self.created.borrow_mut().push(release.clone());
        Ok(CreatedRelease {
            id: 1,
            html_url: format!(
                "https://github.com/owner/repo/releases/tag/{}",
                release.tag_name
            ),
        })
    }
}

/// Records build commands instead of running them.
#[derive(Debug, Default)]
pub struct FakeBuild {
    fail: bool,
    runs: RefCell<Vec<(String, PathBuf)>>,
}

impl FakeBuild {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn runs(&self) -> Vec<(String, PathBuf)> {
        self.runs.borrow().clone()
    }
}

impl BuildRunner for FakeBuild {
    fn run(&self, command: &str, workdir: &Path) -> CoreResult<()> {
        self.runs
            .borrow_mut()
            .push((command.to_string(), workdir.to_path_buf()));

        if self.fail {
            return Err(CoreError::Build {
                command: command.to_string(),
                reason: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}
