//! CLI definition.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Release automation for conventional-commit repositories on GitHub.
#[derive(Debug, Parser)]
#[command(name = "shipmate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tag, build, push and publish the next release
    Release(commands::release::ReleaseArgs),

    /// Print the release notes for the commits since the tracking tag
    Changelog(commands::changelog::ChangelogArgs),

    /// Print the next version without releasing
    Version(commands::version::VersionArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Release(args) => commands::release::run(args),
            Commands::Changelog(args) => commands::changelog::run(args),
            Commands::Version(args) => commands::version::run(args),
        }
    }
}
