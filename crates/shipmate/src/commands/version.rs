//! Version command.

use anyhow::{Context, Result};
use clap::Args;
use shipmate_core::{ReleasePlan, RunOutputs};
use tracing::info;

use super::options::{HostArgs, RepoArgs};
use crate::outputs;

/// Arguments for the version command.
#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub host: HostArgs,

    /// Print only the next tag name
    #[arg(long)]
    pub tag: bool,
}

/// Runs the version command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: VersionArgs) -> Result<()> {
    let session = args.repo.open(args.host.apply(args.repo.overrides()))?;
    let host = session.host()?;

    let plan = ReleasePlan::prepare(&session.repo, &host, &session.inputs, &session.run)
        .context("failed to determine the next version")?;

    let Some(plan) = plan else {
        info!("nothing to release");
        return Ok(());
    };

    if args.tag {
        println!("{}", plan.release_version(&session.inputs).tag());
        return Ok(());
    }

    outputs::report(&RunOutputs::from(plan.resolution))
}
