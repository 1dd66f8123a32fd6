//! Options shared by the subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use shipmate_config::{
    LocalRepo, Overrides, ReleaseInputs, RunContext, RunContextInputs, find_config_or_default,
    load_config,
};
use shipmate_git::{DEFAULT_REMOTE, GitClient};
use shipmate_host::GitHubHost;
use tracing::debug;

/// Where to release from and how to read the history.
#[derive(Debug, Args)]
pub struct RepoArgs {
    /// Configuration file (default: shipmate.toml, searched upwards)
    #[arg(short, long, env = "SHIPMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository directory
    #[arg(short = 'C', long, default_value = ".")]
    pub path: PathBuf,

    /// Hosted repository as owner/repo (default: GITHUB_REPOSITORY or the origin remote)
    #[arg(long)]
    pub repository: Option<String>,

    /// Commit to release (default: GITHUB_SHA or HEAD)
    #[arg(long)]
    pub sha: Option<String>,

    /// Branch the release starts from (default: GITHUB_HEAD_REF, GITHUB_REF_NAME or the current branch)
    #[arg(long)]
    pub source_branch: Option<String>,

    /// Tag marking the last evaluated commit
    #[arg(long, env = "SHIPMATE_TRACKING_TAG")]
    pub tracking_tag: Option<String>,

    /// Comma-separated commit types that trigger a major release
    #[arg(long, env = "SHIPMATE_MAJOR_TYPES")]
    pub major_types: Option<String>,

    /// Comma-separated commit types that trigger a minor release
    #[arg(long, env = "SHIPMATE_MINOR_TYPES")]
    pub minor_types: Option<String>,

    /// JSON object mapping commit types to changelog section titles
    #[arg(long, env = "SHIPMATE_CHANGELOG_TITLES")]
    pub changelog_titles: Option<String>,
}

/// Access to the hosting platform and version naming.
#[derive(Debug, Args)]
pub struct HostArgs {
    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Release this version instead of the computed one
    #[arg(long, env = "SHIPMATE_VERSION_OVERRIDE")]
    pub version_override: Option<String>,

    /// Suffix appended to every release tag
    #[arg(long, env = "SHIPMATE_GIT_TAG_SUFFIX")]
    pub git_tag_suffix: Option<String>,
}

impl HostArgs {
    /// Adds these values to `overrides`.
    pub fn apply(&self, overrides: Overrides) -> Overrides {
        Overrides {
            github_token: self.github_token.clone(),
            version_override: self.version_override.clone(),
            git_tag_suffix: self.git_tag_suffix.clone(),
            ..overrides
        }
    }
}

/// An opened repository with its validated inputs and run context.
pub struct Session {
    pub repo: GitClient,
    pub inputs: ReleaseInputs,
    pub run: RunContext,
}

impl Session {
    /// Creates the GitHub client for this run.
    pub fn host(&self) -> Result<GitHubHost> {
        let token = self.inputs.require_token()?;
        let host = GitHubHost::new(self.run.slug.clone(), token)
            .context("failed to create the GitHub client")?
            .with_api_url(self.run.api_url.clone());
        Ok(host)
    }
}

impl RepoArgs {
    /// Returns the overrides given through these options.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            changelog_titles: self.changelog_titles.clone(),
            major_types: self.major_types.clone(),
            minor_types: self.minor_types.clone(),
            tracking_tag: self.tracking_tag.clone(),
            ..Overrides::default()
        }
    }

    /// Opens the repository, loads the configuration and resolves the run context.
    pub fn open(&self, overrides: Overrides) -> Result<Session> {
        let repo = GitClient::discover(&self.path).with_context(|| {
            format!("failed to open git repository at {}", self.path.display())
        })?;

        let config = match &self.config {
            Some(path) => load_config(path),
            None => find_config_or_default(repo.path()),
        }
        .context("failed to load configuration")?;
        let inputs = config
            .into_inputs(overrides)
            .context("invalid release inputs")?;

        let local = LocalRepo {
            workdir: repo.path().to_path_buf(),
            head_sha: repo.head_sha().ok(),
            branch: repo.current_branch(),
            remote_url: repo.remote_url(DEFAULT_REMOTE),
        };
        let explicit = RunContextInputs {
            repository: self.repository.clone(),
            sha: self.sha.clone(),
            source_branch: self.source_branch.clone(),
            ..RunContextInputs::default()
        };
        let run = RunContextInputs::from_env()
            .merge(explicit)
            .resolve(&local)
            .context("failed to determine the run context")?;
        debug!(?run, "run context resolved");

        Ok(Session { repo, inputs, run })
    }
}
