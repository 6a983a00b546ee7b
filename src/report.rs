//! # Composition Reports
//!
//! A composition run never fails as a whole: every per-repository and
//! per-folder outcome is folded into a report that describes what succeeded
//! and what did not. Callers render the warning/error lists after the run
//! and use `success()` to pick an exit code for scripted pipelines.
//!
//! Warnings never block processing; a run is successful iff no error was
//! recorded. All lists are append-only and accumulate across every
//! repository and folder processed in one request.

use std::path::PathBuf;

/// Outcome of a bulk composition run.
#[derive(Debug, Clone, Default)]
pub struct ComposeReport {
    /// The output workspace directory.
    pub output_dir: PathBuf,
    /// Path of the solution descriptor, when one was created or updated.
    pub solution_path: Option<PathBuf>,
    /// Every .NET project descriptor discovered in the output tree.
    pub discovered_project_files: Vec<PathBuf>,
    /// Framework workspace descriptors created by this run.
    pub created_framework_workspaces: Vec<PathBuf>,
    /// Non-blocking issues (skipped folders, unparseable descriptors).
    pub warnings: Vec<String>,
    /// Failures recorded during the run (clone failures, tool failures).
    pub errors: Vec<String>,
}

impl ComposeReport {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    /// A run succeeded iff no error was recorded. Warnings do not count.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.errors.push(message);
    }
}

/// Outcome of an incremental take operation.
#[derive(Debug, Clone, Default)]
pub struct TakeReport {
    /// The output workspace directory.
    pub output_dir: PathBuf,
    /// Where the folder was copied to, inside the output workspace.
    pub destination: PathBuf,
    /// True when the copied folder carries a .NET project descriptor.
    pub is_dotnet_project: bool,
    /// True when the copied folder carries a framework workspace marker.
    pub is_framework_project: bool,
    /// The (possibly pre-existing) solution descriptor touched by this take.
    pub solution_path: Option<PathBuf>,
    /// The (possibly pre-existing) workspace descriptor touched by this take.
    pub workspace_path: Option<PathBuf>,
    /// .NET project descriptors discovered in the copied folder.
    pub discovered_project_files: Vec<PathBuf>,
    /// Non-blocking issues.
    pub warnings: Vec<String>,
    /// Failures recorded during the run.
    pub errors: Vec<String>,
}

impl TakeReport {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    /// A run succeeded iff no error was recorded. Warnings do not count.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.errors.push(message);
    }
}
