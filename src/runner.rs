//! # External Command Execution
//!
//! The solution and workspace composers delegate descriptor creation and
//! mutation to external tools (`dotnet`, `ng`). This module defines the
//! `CommandRunner` trait they go through, so the tools can be mocked in
//! tests, plus the `ShellRunner` implementation that actually spawns
//! processes.
//!
//! The engine treats a non-zero exit or a spawn failure as a failure to
//! record; it never interprets tool output beyond capturing stderr for the
//! error message.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Trait for running external commands - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `working_dir`, succeeding iff the
    /// process exits with status zero.
    fn run(&self, program: &str, args: &[&str], working_dir: &Path) -> Result<()>;
}

/// The default implementation of `CommandRunner`, spawning real processes
/// through `std::process::Command`.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, program: &str, args: &[&str], working_dir: &Path) -> Result<()> {
        let rendered = render_command(program, args);
        log::debug!("running `{}` in {}", rendered, working_dir.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| Error::CommandFailed {
                command: rendered.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::CommandFailed {
                command: rendered,
                stderr,
            });
        }

        Ok(())
    }
}

/// Render a program and its arguments as a single display string.
pub fn render_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_command_no_args() {
        assert_eq!(render_command("git", &[]), "git");
    }

    #[test]
    fn test_render_command_with_args() {
        assert_eq!(
            render_command("dotnet", &["new", "sln", "--name", "Widgets"]),
            "dotnet new sln --name Widgets"
        );
    }

    #[test]
    fn test_shell_runner_success() {
        let runner = ShellRunner;
        let cwd = std::env::current_dir().unwrap();
        assert!(runner.run("true", &[], &cwd).is_ok());
    }

    #[test]
    fn test_shell_runner_nonzero_exit() {
        let runner = ShellRunner;
        let cwd = std::env::current_dir().unwrap();
        let err = runner.run("false", &[], &cwd).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[test]
    fn test_shell_runner_missing_program() {
        let runner = ShellRunner;
        let err = runner
            .run(
                "definitely-not-a-real-program-xyz",
                &[],
                &PathBuf::from("."),
            )
            .unwrap_err();
        match err {
            Error::CommandFailed { command, .. } => {
                assert!(command.contains("definitely-not-a-real-program-xyz"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }
}
