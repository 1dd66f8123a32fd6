//! Build step.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::{CoreError, CoreResult};

/// Runs the configured build command.
pub trait BuildRunner {
    /// Runs `command` in `workdir`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Build`] if the command cannot start or fails.
    fn run(&self, command: &str, workdir: &Path) -> CoreResult<()>;
}

/// Runs build commands through the platform shell.
///
/// The command's output goes to stderr so stdout stays free for run outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellBuildRunner;

impl BuildRunner for ShellBuildRunner {
    fn run(&self, command: &str, workdir: &Path) -> CoreResult<()> {
        info!(command, ?workdir, "running build command");

        let mut shell = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c");
            cmd
        };

        let status = shell
            .arg(command)
            .current_dir(workdir)
            .stdout(std::io::stderr())
            .status()
            .map_err(|e| CoreError::Build {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(CoreError::Build {
                command: command.to_string(),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}
