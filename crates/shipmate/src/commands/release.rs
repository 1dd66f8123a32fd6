//! Release command.

use anyhow::{Context, Result};
use clap::Args;
use shipmate_config::Overrides;
use shipmate_core::{ReleaseOutcome, ReleaseStateMachine, ShellBuildRunner};
use tracing::info;

use super::options::{HostArgs, RepoArgs};
use crate::outputs;

/// Arguments for the release command.
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub host: HostArgs,

    /// Branch receiving the built release
    #[arg(long, env = "SHIPMATE_RELEASE_BRANCH")]
    pub release_branch: Option<String>,

    /// Command building the release artifacts
    #[arg(long, env = "SHIPMATE_BUILD_COMMAND")]
    pub build_command: Option<String>,

    /// Skip the build, the pushes and the release tags
    #[arg(short, long, env = "SHIPMATE_DRY_RUN")]
    pub dry_run: bool,

    /// Only move the tracking tag, not the version tags
    #[arg(long, env = "SHIPMATE_DISABLE_GIT_TAGGING")]
    pub disable_git_tagging: bool,
}

impl ReleaseArgs {
    fn overrides(&self) -> Overrides {
        self.host.apply(Overrides {
            release_branch: self.release_branch.clone(),
            build_command: self.build_command.clone(),
            dry_run: self.dry_run,
            disable_git_tagging: self.disable_git_tagging,
            ..self.repo.overrides()
        })
    }
}

/// Runs the release command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ReleaseArgs) -> Result<()> {
    let session = args.repo.open(args.overrides())?;
    let host = session.host()?;
    let builder = ShellBuildRunner;

    if session.inputs.dry_run {
        info!("dry run, nothing will be built or pushed");
    }

    let mut machine = ReleaseStateMachine::new(
        &session.repo,
        &host,
        &builder,
        &session.inputs,
        &session.run,
    );
    let outcome = machine.run().context("release failed")?;

    match outcome {
        ReleaseOutcome::Skipped => info!("nothing to release"),
        ReleaseOutcome::Released(released) => outputs::report(&released)?,
    }

    Ok(())
}
