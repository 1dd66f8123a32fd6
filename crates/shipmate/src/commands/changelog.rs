//! Changelog command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use shipmate_core::ChangelogBuilder;
use shipmate_git::RepositoryClient;
use tracing::info;

use super::options::RepoArgs;

/// Arguments for the changelog command.
#[derive(Debug, Args)]
pub struct ChangelogArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Runs the changelog command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ChangelogArgs) -> Result<()> {
    let session = args.repo.open(args.repo.overrides())?;

    let history = session
        .repo
        .fetch_history(&session.inputs.tracking_tag, &session.run.sha)
        .context("failed to read the commit history")?;
    info!(commits = history.len(), "building release notes");

    let notes = ChangelogBuilder::for_release(session.run.slug.clone(), &session.inputs)
        .build(&history);

    match args.output {
        Some(path) => {
            fs::write(&path, &notes)
                .with_context(|| format!("failed to write release notes to {}", path.display()))?;
            info!(path = %path.display(), "release notes written");
        }
        None => print!("{notes}"),
    }

    Ok(())
}
