//! Description of the CI run a release happens in.

use std::path::PathBuf;

use shipmate_host::{DEFAULT_API_URL, RepoSlug};
use tracing::debug;

use crate::{ConfigError, ConfigResult};

/// Identity used when the run does not name an actor.
const BOT_ACTOR: &str = "github-actions[bot]";
const BOT_ACTOR_ID: &str = "41898282";

/// The run a release belongs to, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// The hosted repository.
    pub slug: RepoSlug,
    /// The commit being released.
    pub sha: String,
    /// The branch the release starts from.
    pub source_branch: String,
    /// Login of the user triggering the run.
    pub actor: String,
    /// Numeric id of the actor, when the environment provides it.
    pub actor_id: Option<String>,
    /// Checkout directory; the build command runs here.
    pub workspace: PathBuf,
    /// Hosting platform API endpoint.
    pub api_url: String,
}

impl RunContext {
    /// Returns the no-reply address commits are authored with.
    #[must_use]
    pub fn actor_email(&self) -> String {
        match &self.actor_id {
            Some(id) => format!("{id}+{}@users.noreply.github.com", self.actor),
            None => format!("{}@users.noreply.github.com", self.actor),
        }
    }
}

/// Facts read from the local checkout, used when the environment is silent.
#[derive(Debug, Clone, Default)]
pub struct LocalRepo {
    pub workdir: PathBuf,
    pub head_sha: Option<String>,
    pub branch: Option<String>,
    pub remote_url: Option<String>,
}

/// Unresolved run values, gathered from the environment and the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContextInputs {
    pub repository: Option<String>,
    pub sha: Option<String>,
    pub source_branch: Option<String>,
    pub actor: Option<String>,
    pub actor_id: Option<String>,
    pub workspace: Option<PathBuf>,
    pub api_url: Option<String>,
}

impl RunContextInputs {
    /// Reads the `GITHUB_*` variables of the current process.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the `GITHUB_*` variables through `lookup`; empty values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            repository: get("GITHUB_REPOSITORY"),
            sha: get("GITHUB_SHA"),
            source_branch: get("GITHUB_HEAD_REF")
                .or_else(|| get("GITHUB_REF_NAME"))
                .or_else(|| get("GITHUB_REF")),
            actor: get("GITHUB_ACTOR"),
            actor_id: get("GITHUB_ACTOR_ID"),
            workspace: get("GITHUB_WORKSPACE").map(PathBuf::from),
            api_url: get("GITHUB_API_URL"),
        }
    }

    /// Replaces each value that `other` sets.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            repository: other.repository.or(self.repository),
            sha: other.sha.or(self.sha),
            source_branch: other.source_branch.or(self.source_branch),
            actor: other.actor.or(self.actor),
            actor_id: other.actor_id.or(self.actor_id),
            workspace: other.workspace.or(self.workspace),
            api_url: other.api_url.or(self.api_url),
        }
    }

    /// Fills the gaps from the local checkout and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository, commit or source branch cannot be
    /// determined, or the repository is not an `owner/repo` slug.
    pub fn resolve(self, local: &LocalRepo) -> ConfigResult<RunContext> {
        let slug = match self.repository {
            Some(raw) => raw
                .parse::<RepoSlug>()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            None => local
                .remote_url
                .as_deref()
                .and_then(RepoSlug::from_remote_url)
                .ok_or(ConfigError::MissingContext {
                    what: "the repository",
                    variable: "GITHUB_REPOSITORY",
                })?,
        };

        let sha = self
            .sha
            .or_else(|| local.head_sha.clone())
            .ok_or(ConfigError::MissingContext {
                what: "the commit to release",
                variable: "GITHUB_SHA",
            })?;

        let source_branch = self
            .source_branch
            .or_else(|| local.branch.clone())
            .ok_or(ConfigError::MissingContext {
                what: "the source branch",
                variable: "GITHUB_REF_NAME",
            })?;

        let (actor, actor_id) = match (self.actor, self.actor_id) {
            (Some(actor), id) => (actor, id),
            (None, _) => {
                debug!(actor = BOT_ACTOR, "no actor in environment, using the bot");
                (BOT_ACTOR.to_string(), Some(BOT_ACTOR_ID.to_string()))
            }
        };

        Ok(RunContext {
            slug,
            sha,
            source_branch,
            actor,
            actor_id,
            workspace: self.workspace.unwrap_or_else(|| local.workdir.clone()),
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}
