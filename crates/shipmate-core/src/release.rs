//! The release transaction.

use shipmate_config::{ReleaseInputs, RunContext};
use shipmate_git::{DEFAULT_REMOTE, RepositoryClient};
use shipmate_host::{NewRelease, ReleaseHost};
use tracing::{debug, info, warn};

use crate::error::StepExt;
use crate::{BuildRunner, CoreResult, ReleasePlan, RunOutputs};

/// A step of the release transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseState {
    Init,
    VersionDetermined,
    TrackingTagSet,
    BranchReady,
    /// The source branch was merged into an existing release branch.
    Merged,
    /// The release branch was created from the source commit.
    Created,
    Built,
    Committed,
    Pushed,
    Published,
    Done,
    Failed,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The head commit was already evaluated; nothing was changed.
    Skipped,
    /// A release was made.
    Released(RunOutputs),
}

/// Drives one release through the repository and the hosting platform.
///
/// Steps run strictly in order and the first failure moves the machine to
/// [`ReleaseState::Failed`] without undoing earlier steps. Every side effect
/// tolerates a re-run: tags are forced, the release branch is looked up
/// before being created, and a merge commit is amended rather than duplicated.
pub struct ReleaseStateMachine<'a, R, H, B> {
    repo: &'a R,
    host: &'a H,
    builder: &'a B,
    inputs: &'a ReleaseInputs,
    run: &'a RunContext,
    state: ReleaseState,
    visited: Vec<ReleaseState>,
}

impl<'a, R, H, B> ReleaseStateMachine<'a, R, H, B>
where
    R: RepositoryClient,
    H: ReleaseHost,
    B: BuildRunner,
{
    /// Creates a machine in the [`ReleaseState::Init`] state.
    #[must_use]
    pub fn new(
        repo: &'a R,
        host: &'a H,
        builder: &'a B,
        inputs: &'a ReleaseInputs,
        run: &'a RunContext,
    ) -> Self {
        Self {
            repo,
            host,
            builder,
            inputs,
            run,
            state: ReleaseState::Init,
            visited: Vec::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ReleaseState {
        self.state
    }

    /// Returns every state entered so far, in order.
    #[must_use]
    pub fn visited(&self) -> &[ReleaseState] {
        &self.visited
    }

    /// Runs the release to completion.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step.
    pub fn run(&mut self) -> CoreResult<ReleaseOutcome> {
        match self.execute() {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.enter(ReleaseState::Failed);
                Err(e)
            }
        }
    }

    fn enter(&mut self, to: ReleaseState) {
        debug!(from = ?self.state, to = ?to, "release state transition");
        self.state = to;
        self.visited.push(to);
    }

    fn execute(&mut self) -> CoreResult<ReleaseOutcome> {
        let (repo, inputs, run) = (self.repo, self.inputs, self.run);
        let dry_run = inputs.dry_run;

        let Some(plan) = ReleasePlan::prepare(repo, self.host, inputs, run)? else {
            self.enter(ReleaseState::Done);
            return Ok(ReleaseOutcome::Skipped);
        };
        self.enter(ReleaseState::VersionDetermined);

        let release = plan.release_version(inputs);
        let tag = release.tag();
        let message = format!("Release {tag}");

        debug!(
            tag = %inputs.tracking_tag,
            branch = %run.source_branch,
            "setting the tracking tag on the source branch"
        );
        repo.add_tags(std::slice::from_ref(&inputs.tracking_tag))
            .during("setting the tracking tag")?;
        self.enter(ReleaseState::TrackingTagSet);

        let branch = inputs.release_branch.as_str();
        let branch_exists = repo
            .list_branches()
            .during("listing branches")?
            .has_remote_branch(DEFAULT_REMOTE, branch);
        debug!(branch, exists = branch_exists, "switching to the release branch");
        repo.switch(branch, !branch_exists)
            .during("switching to the release branch")?;
        repo.set_user(&run.actor, &run.actor_email())
            .during("setting the git user")?;
        self.enter(ReleaseState::BranchReady);

        if branch_exists {
            repo.merge(&run.source_branch, Some(&message))
                .during("merging the source branch")?;
            self.enter(ReleaseState::Merged);
        } else {
            self.enter(ReleaseState::Created);
        }

        if let Some(command) = &inputs.build_command {
            if dry_run {
                info!(command = %command, "DRY RUN: running the build command");
            } else {
                self.builder.run(command, &run.workspace)?;
            }
        }
        self.enter(ReleaseState::Built);

        let status = repo
            .status()
            .during("reading the working tree status")?;
        debug!(changed = ?status.changed, "working tree status after build");
        if status.is_clean {
            warn!("no changes detected after build");
        } else if branch_exists {
            repo.amend_commit_with_all_files()
                .during("amending the release commit")?;
        } else {
            repo.commit_all_files(&message)
                .during("committing the build output")?;
        }
        self.enter(ReleaseState::Committed);

        let release_tags = release.release_tags();
        if dry_run {
            info!(remote = DEFAULT_REMOTE, branch, "DRY RUN: pushing the release branch");
            if inputs.enable_git_tagging {
                info!(tags = ?release_tags, "DRY RUN: adding or moving release tags");
            }
            info!(remote = DEFAULT_REMOTE, "DRY RUN: pushing tags");
        } else {
            repo.push(DEFAULT_REMOTE, branch)
                .during("pushing the release branch")?;
            if inputs.enable_git_tagging {
                debug!(tags = ?release_tags, "tagging the release commit");
                repo.add_tags(&release_tags).during("tagging the release")?;
            }
            // The tracking tag must reach the remote even without release tags.
            repo.push_tags(DEFAULT_REMOTE).during("pushing tags")?;
        }
        self.enter(ReleaseState::Pushed);

        repo.switch("-", false)
            .during("switching back to the source branch")?;

        let body = plan.release_notes(inputs, run);
        let created = self.host.create_release(&NewRelease::published(&tag, body))?;
        info!(%tag, url = %created.html_url, "release created");
        self.enter(ReleaseState::Published);

        self.enter(ReleaseState::Done);
        Ok(ReleaseOutcome::Released(plan.resolution.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeBuild, FakeHost, FakeRepo, HASH, commit, inputs, run_context};
    use crate::{CoreError, IncrementDecision};
    use semver::Version;
    use shipmate_commit::CommitRecord;
    use shipmate_git::GitClient;
    use std::path::PathBuf;

    const LINK: &str = "([a10d254](https://github.com/owner/repo/commit/a10d25492f1c3a33f05947cc5445f5a159436b7a))";
    const EMAIL: &str = "583231+octocat@users.noreply.github.com";

    fn run_machine(
        repo: &FakeRepo,
        host: &FakeHost,
        builder: &FakeBuild,
        inputs: &ReleaseInputs,
    ) -> (CoreResult<ReleaseOutcome>, Vec<ReleaseState>) {
        let run = run_context();
        let mut machine = ReleaseStateMachine::new(repo, host, builder, inputs, &run);
        let result = machine.run();
        (result, machine.visited().to_vec())
    }

    #[test]
    fn test_release_on_new_branch() {
        let repo = FakeRepo::with_history(vec![commit("feat: Change #1")]);
        let host = FakeHost::latest("v1.2.3");
        let builder = FakeBuild::default();

        let (result, visited) = run_machine(&repo, &host, &builder, &inputs());

        assert_eq!(
            repo.calls(),
            vec![
                format!("fetch_history latest-src {HASH}"),
                "add_tags latest-src".to_string(),
                "list_branches".to_string(),
                "switch -c release".to_string(),
                format!("set_user octocat <{EMAIL}>"),
                "status".to_string(),
                "commit Release v1.3.0".to_string(),
                "push origin release".to_string(),
                "add_tags latest v1.3.0 v1.3 v1".to_string(),
                "push_tags origin".to_string(),
                "switch -".to_string(),
            ]
        );
        assert_eq!(
            visited,
            vec![
                ReleaseState::VersionDetermined,
                ReleaseState::TrackingTagSet,
                ReleaseState::BranchReady,
                ReleaseState::Created,
                ReleaseState::Built,
                ReleaseState::Committed,
                ReleaseState::Pushed,
                ReleaseState::Published,
                ReleaseState::Done,
            ]
        );

        let created = host.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].tag_name, "v1.3.0");
        assert_eq!(created[0].name, "v1.3.0");
        assert_eq!(created[0].body, format!("# Features\n- Change #1 {LINK}\n"));
        assert!(!created[0].draft);
        assert!(!created[0].prerelease);

        match result.unwrap() {
            ReleaseOutcome::Released(outputs) => {
                assert_eq!(outputs.current_version, Version::new(1, 2, 3));
                assert_eq!(outputs.increment_type, IncrementDecision::Minor);
                assert_eq!(outputs.next_version, Version::new(1, 3, 0));
            }
            ReleaseOutcome::Skipped => panic!("Expected a release"),
        }
        assert!(builder.runs().is_empty());
    }

    #[test]
    fn test_release_on_existing_branch_merges_and_amends() {
        let repo = FakeRepo::with_history(vec![commit("fix: a")]).with_release_branch();
        let host = FakeHost::latest("v1.2.3");

        let (result, visited) = run_machine(&repo, &host, &FakeBuild::default(), &inputs());
        result.unwrap();

        let calls = repo.calls();
        assert!(calls.contains(&"switch release".to_string()));
        assert!(calls.contains(&"merge main -m Release v1.2.4".to_string()));
        assert!(calls.contains(&"amend".to_string()));
        assert!(!calls.iter().any(|c| c.starts_with("commit")));
        assert!(visited.contains(&ReleaseState::Merged));
        assert!(!visited.contains(&ReleaseState::Created));
    }

    #[test]
    fn test_clean_tree_skips_commit() {
        let repo = FakeRepo::with_history(vec![commit("fix: a")]).clean();
        let host = FakeHost::latest("v1.2.3");

        let (result, visited) = run_machine(&repo, &host, &FakeBuild::default(), &inputs());
        result.unwrap();

        let calls = repo.calls();
        assert!(!calls.iter().any(|c| c.starts_with("commit") || c == "amend"));
        assert!(calls.contains(&"push origin release".to_string()));
        assert!(visited.contains(&ReleaseState::Committed));
    }

    #[test]
    fn test_build_runs_in_workspace() {
        let repo = FakeRepo::with_history(vec![commit("fix: a")]);
        let host = FakeHost::latest("v1.2.3");
        let builder = FakeBuild::default();
        let mut inputs = inputs();
        inputs.build_command = Some("npm run build".to_string());

        let (result, _) = run_machine(&repo, &host, &builder, &inputs);
        result.unwrap();

        assert_eq!(
            builder.runs(),
            vec![("npm run build".to_string(), PathBuf::from("/work"))]
        );
    }

    #[test]
    fn test_dry_run_skips_build_and_push_but_publishes() {
        let repo = FakeRepo::with_history(vec![commit("feat: a")]);
        let host = FakeHost::latest("v1.2.3");
        let builder = FakeBuild::default();
        let mut inputs = inputs();
        inputs.dry_run = true;
        inputs.build_command = Some("make".to_string());

        let (result, visited) = run_machine(&repo, &host, &builder, &inputs);

        assert!(matches!(result.unwrap(), ReleaseOutcome::Released(_)));
        assert!(builder.runs().is_empty());

        let created = host.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].tag_name, "v1.3.0");

        let calls = repo.calls();
        assert!(!calls.iter().any(|c| c.starts_with("push")));
        assert!(!calls.contains(&"add_tags latest v1.3.0 v1.3 v1".to_string()));
        assert!(calls.contains(&"add_tags latest-src".to_string()));
        assert_eq!(calls.last().map(String::as_str), Some("switch -"));
        assert_eq!(visited.last(), Some(&ReleaseState::Done));
    }

    #[test]
    fn test_tagging_disabled_still_pushes_tracking_tag() {
        let repo = FakeRepo::with_history(vec![commit("fix: a")]);
        let host = FakeHost::latest("v1.2.3");
        let mut inputs = inputs();
        inputs.enable_git_tagging = false;

        let (result, _) = run_machine(&repo, &host, &FakeBuild::default(), &inputs);
        result.unwrap();

        let calls = repo.calls();
        let tag_calls: Vec<_> = calls.iter().filter(|c| c.starts_with("add_tags")).collect();
        assert_eq!(tag_calls, vec!["add_tags latest-src"]);
        assert!(calls.contains(&"push_tags origin".to_string()));
        assert_eq!(host.created()[0].tag_name, "v1.2.4");
    }

    #[test]
    fn test_tag_suffix() {
        let repo = FakeRepo::with_history(vec![commit("feat!: a")]);
        let host = FakeHost::latest("v1.2.3");
        let mut inputs = inputs();
        inputs.git_tag_suffix = "-node".to_string();

        let (result, _) = run_machine(&repo, &host, &FakeBuild::default(), &inputs);
        result.unwrap();

        assert!(
            repo.calls()
                .contains(&"add_tags latest v2.0.0-node v2.0-node v2-node".to_string())
        );
        assert_eq!(host.created()[0].tag_name, "v2.0.0-node");
    }

    #[test]
    fn test_unchanged_head_is_a_no_op() {
        let repo = FakeRepo::with_history(vec![]);
        let host = FakeHost::latest("v1.2.3");

        for _ in 0..2 {
            let (result, visited) = run_machine(&repo, &host, &FakeBuild::default(), &inputs());
            assert_eq!(result.unwrap(), ReleaseOutcome::Skipped);
            assert_eq!(visited, vec![ReleaseState::Done]);
        }

        assert!(repo.calls().iter().all(|c| c.starts_with("fetch_history")));
        assert!(host.created().is_empty());
    }

    #[test]
    fn test_first_release_starts_from_baseline() {
        let repo = FakeRepo::with_history(vec![commit("feat: a")]);
        let host = FakeHost::not_found();

        let (result, _) = run_machine(&repo, &host, &FakeBuild::default(), &inputs());
        match result.unwrap() {
            ReleaseOutcome::Released(outputs) => {
                assert_eq!(outputs.current_version, Version::new(0, 0, 0));
                assert_eq!(outputs.next_version, Version::new(0, 1, 0));
            }
            ReleaseOutcome::Skipped => panic!("Expected a release"),
        }
    }

    #[test]
    fn test_override_equal_to_current_fails_before_side_effects() {
        let repo = FakeRepo::with_history(vec![commit("fix: a")]);
        let host = FakeHost::latest("v1.2.3");
        let mut inputs = inputs();
        inputs.version_override = Some(Version::new(1, 2, 3));

        let run = run_context();
        let builder = FakeBuild::default();
        let mut machine = ReleaseStateMachine::new(&repo, &host, &builder, &inputs, &run);
        let result = machine.run();

        assert!(matches!(result, Err(CoreError::NoVersionChange(_))));
        assert_eq!(machine.state(), ReleaseState::Failed);
        assert_eq!(repo.calls(), vec![format!("fetch_history latest-src {HASH}")]);
    }

    #[test]
    fn test_failure_aborts_remaining_steps() {
        let repo = FakeRepo::with_history(vec![commit("fix: a")]).failing_on("push");
        let host = FakeHost::latest("v1.2.3");

        let (result, visited) = run_machine(&repo, &host, &FakeBuild::default(), &inputs());

        match result.unwrap_err() {
            CoreError::Repository { step, .. } => assert_eq!(step, "pushing the release branch"),
            other => panic!("Expected Repository error, got {other:?}"),
        }
        assert_eq!(visited.last(), Some(&ReleaseState::Failed));
        assert!(!visited.contains(&ReleaseState::Pushed));

        let calls = repo.calls();
        assert_eq!(calls.last().map(String::as_str), Some("push origin release"));
        assert!(host.created().is_empty());
    }

    #[test]
    fn test_build_failure_aborts_before_commit() {
        let repo = FakeRepo::with_history(vec![commit("fix: a")]);
        let host = FakeHost::latest("v1.2.3");
        let builder = FakeBuild::failing();
        let mut inputs = inputs();
        inputs.build_command = Some("make".to_string());

        let (result, visited) = run_machine(&repo, &host, &builder, &inputs);

        assert!(matches!(result, Err(CoreError::Build { .. })));
        assert!(!repo.calls().contains(&"status".to_string()));
        assert_eq!(
            visited,
            vec![
                ReleaseState::VersionDetermined,
                ReleaseState::TrackingTagSet,
                ReleaseState::BranchReady,
                ReleaseState::Created,
                ReleaseState::Failed,
            ]
        );
    }

    fn git(dir: &std::path::Path, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    fn commit_file(dir: &std::path::Path, file: &str, message: &str) -> String {
        std::fs::write(dir.join(file), message).unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", message]);
        git(dir, &["rev-parse", "HEAD"])
    }

    fn release_with_git(client: &GitClient, host: &FakeHost, sha: &str) -> Vec<ReleaseState> {
        let mut run = run_context();
        run.sha = sha.to_string();
        run.workspace = client.path().to_path_buf();
        let builder = FakeBuild::default();
        let inputs = inputs();

        let mut machine = ReleaseStateMachine::new(client, host, &builder, &inputs, &run);
        assert!(matches!(machine.run().unwrap(), ReleaseOutcome::Released(_)));
        machine.visited().to_vec()
    }

    #[test]
    fn test_repeated_releases_against_a_real_remote() {
        let remote = tempfile::TempDir::new().unwrap();
        git(remote.path(), &["init", "--bare"]);

        let work = tempfile::TempDir::new().unwrap();
        let dir = work.path();
        git(dir, &["init"]);
        git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(dir, &["config", "user.name", "Test User"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["config", "commit.gpgsign", "false"]);
        git(dir, &["config", "tag.gpgsign", "false"]);
        git(dir, &["remote", "add", "origin", remote.path().to_str().unwrap()]);
        commit_file(dir, "readme.md", "chore: initial commit");
        let first = commit_file(dir, "login.rs", "feat: add login");
        git(dir, &["push", "origin", "main"]);

        let client = GitClient::open(dir).unwrap();

        let host = FakeHost::latest("v1.0.0");
        let visited = release_with_git(&client, &host, &first);
        assert!(visited.contains(&ReleaseState::Created));
        assert_eq!(host.created()[0].tag_name, "v1.1.0");
        assert_eq!(client.current_branch().as_deref(), Some("main"));

        let second = commit_file(dir, "login.rs", "fix: typo in login");
        let host = FakeHost::latest("v1.1.0");
        let visited = release_with_git(&client, &host, &second);
        assert!(visited.contains(&ReleaseState::Merged));
        assert!(!visited.contains(&ReleaseState::Created));
        assert_eq!(host.created()[0].tag_name, "v1.1.1");
        assert_eq!(client.current_branch().as_deref(), Some("main"));

        let remote = remote.path();
        let tags = git(remote, &["tag", "--list"]);
        assert_eq!(
            tags.lines().collect::<Vec<_>>(),
            vec!["latest", "latest-src", "v1", "v1.1", "v1.1.0", "v1.1.1"]
        );
        assert_eq!(git(remote, &["rev-parse", "latest-src"]), second);
        assert_eq!(
            git(remote, &["log", "-1", "--format=%s", "release"]),
            "Release v1.1.1"
        );
        let parents = git(remote, &["rev-list", "--parents", "-n", "1", "release"]);
        assert_eq!(parents.split_whitespace().count(), 3);
    }

    #[test]
    fn test_breaking_commits_lead_release_notes() {
        let repo = FakeRepo::with_history(vec![
            commit("fix: Change #1"),
            CommitRecord::new(HASH, "feat: Change #2", "BREAKING CHANGE: api"),
        ]);
        let host = FakeHost::latest("v1.2.3");

        let (result, _) = run_machine(&repo, &host, &FakeBuild::default(), &inputs());
        result.unwrap();

        assert_eq!(
            host.created()[0].body,
            format!("# BREAKING CHANGES\n- Change #2 {LINK}\n\n# Fixes\n- Change #1 {LINK}\n")
        );
        assert_eq!(host.created()[0].tag_name, "v2.0.0");
    }
}
