//! # Composition Orchestration
//!
//! The orchestrator drives the whole pipeline: clone each repository,
//! extract its configured folders into the output workspace, detect what
//! the merged tree contains, sanitize the extracted .NET descriptors, and
//! compose the solution/workspace descriptors on top.
//!
//! Two entry points share that pipeline:
//!
//! - **`process`**: bulk mode, many repositories, output directory created
//!   by the run.
//! - **`take`**: incremental mode, one repository and one folder, merged
//!   into a possibly pre-existing workspace with ensure/append composer
//!   operations.
//!
//! ## Failure isolation
//!
//! Neither entry point returns `Err` or panics through: every per-step
//! failure is folded into the report and the loop continues. A clone
//! failure isolates that repository; a missing source folder is a warning
//! that skips that folder; an unparseable project descriptor is a warning
//! that leaves the file untouched; a composer tool failure is an error that
//! still lets the remaining steps run. The only way a run is unsuccessful
//! is at least one recorded error.
//!
//! Repositories are processed sequentially in list order, which pins
//! last-writer-wins semantics for overlapping destination mappings.
//!
//! Collaborators (clone client, command runner) are explicit constructor
//! parameters, injected as trait objects so tests can substitute fakes.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::{ComposeRequest, TakeRequest};
use crate::detect::{self, Detection};
use crate::error::{Error, Result};
use crate::extract::{extract, ExtractOutcome};
use crate::git::{clone_to_temp, CloneClient, GitCloneClient};
use crate::report::{ComposeReport, TakeReport};
use crate::runner::{CommandRunner, ShellRunner};
use crate::sanitize::sanitize_project_file;
use crate::{solution, workspace};

/// Cooperative cancellation flag shared between the pipeline and its
/// caller.
///
/// The pipeline checks the token between steps; in-flight clone
/// directories are scoped temporaries, so they are deleted during unwind
/// regardless of when cancellation lands.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives composition requests against injected collaborators.
pub struct Orchestrator {
    clone_client: Box<dyn CloneClient>,
    runner: Box<dyn CommandRunner>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// An orchestrator wired to the real git and shell tools.
    pub fn new() -> Self {
        Self {
            clone_client: Box::new(GitCloneClient),
            runner: Box::new(ShellRunner),
        }
    }

    /// An orchestrator with injected collaborators, used by tests.
    pub fn with_collaborators(
        clone_client: Box<dyn CloneClient>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            clone_client,
            runner,
        }
    }

    /// Run the bulk composition pipeline.
    ///
    /// Never returns an error; the report describes what succeeded and what
    /// did not.
    pub fn process(&self, request: &ComposeRequest, cancel: &CancelToken) -> ComposeReport {
        let mut report = ComposeReport::new(request.output_dir.clone());

        if let Err(e) = fs::create_dir_all(&request.output_dir) {
            report.error(format!(
                "cannot create output directory {}: {}",
                request.output_dir.display(),
                e
            ));
            return report;
        }

        'repositories: for repo in &request.repositories {
            if cancel.is_cancelled() {
                report.error(Error::Cancelled.to_string());
                break;
            }

            log::info!("cloning {}@{}", repo.url, repo.branch);
            let cloned = match clone_to_temp(self.clone_client.as_ref(), &repo.url, &repo.branch) {
                Ok(cloned) => cloned,
                Err(e) => {
                    report.error(e.to_string());
                    continue;
                }
            };

            for folder in &repo.folders {
                if cancel.is_cancelled() {
                    report.error(Error::Cancelled.to_string());
                    break 'repositories;
                }

                match extract(
                    cloned.path(),
                    &folder.from,
                    folder.destination(),
                    &request.output_dir,
                ) {
                    Ok(ExtractOutcome::Copied {
                        files_copied,
                        overwritten,
                        ..
                    }) => {
                        log::info!(
                            "extracted {} -> {} ({} files, {} overwritten)",
                            folder.from,
                            folder.destination(),
                            files_copied,
                            overwritten
                        );
                    }
                    Ok(ExtractOutcome::SourceMissing) => {
                        report.warn(format!(
                            "folder '{}' not found in {}@{}, skipped",
                            folder.from, repo.url, repo.branch
                        ));
                    }
                    Err(e) => {
                        report.error(format!(
                            "extracting '{}' from {}: {}",
                            folder.from, repo.url, e
                        ));
                    }
                }
            }
            // The clone drops here, deleting its temporary directory.
        }

        if cancel.is_cancelled() {
            return report;
        }

        let detection = detect::detect(&request.output_dir);
        report.discovered_project_files = detection.dotnet_projects.clone();
        for warning in self.sanitize_all(&detection) {
            report.warn(warning);
        }

        let name = descriptor_name(request.solution_name.as_deref(), &request.output_dir);

        if detection.is_dotnet() {
            match self.compose_solution(&request.output_dir, &name, &detection) {
                Ok(path) => report.solution_path = Some(path),
                Err(e) => report.error(e.to_string()),
            }
        }

        if detection.is_framework() {
            let existed = request.output_dir.join(workspace::WORKSPACE_DESCRIPTOR).exists();
            match self.compose_workspace(&request.output_dir, &name, &detection) {
                Ok(path) => {
                    if !existed {
                        report.created_framework_workspaces.push(path);
                    }
                }
                Err(e) => report.error(e.to_string()),
            }
        }

        report
    }

    /// Run the incremental single-folder pipeline.
    ///
    /// Never returns an error; the report describes what succeeded and what
    /// did not.
    pub fn take(&self, request: &TakeRequest, cancel: &CancelToken) -> TakeReport {
        let mut report = TakeReport::new(request.output_dir.clone());

        if let Err(e) = fs::create_dir_all(&request.output_dir) {
            report.error(format!(
                "cannot create output directory {}: {}",
                request.output_dir.display(),
                e
            ));
            return report;
        }

        if cancel.is_cancelled() {
            report.error(Error::Cancelled.to_string());
            return report;
        }

        let destination_name = match folder_name(&request.from_path) {
            Ok(name) => name,
            Err(e) => {
                report.error(e.to_string());
                return report;
            }
        };

        log::info!("taking {} from {}@{}", request.from_path, request.url, request.branch);
        let cloned = match clone_to_temp(self.clone_client.as_ref(), &request.url, &request.branch)
        {
            Ok(cloned) => cloned,
            Err(e) => {
                report.error(e.to_string());
                return report;
            }
        };

        match extract(
            cloned.path(),
            &request.from_path,
            &destination_name,
            &request.output_dir,
        ) {
            Ok(ExtractOutcome::Copied { destination, .. }) => {
                report.destination = destination;
            }
            Ok(ExtractOutcome::SourceMissing) => {
                report.warn(format!(
                    "folder '{}' not found in {}@{}, nothing taken",
                    request.from_path, request.url, request.branch
                ));
                return report;
            }
            Err(e) => {
                report.error(format!(
                    "extracting '{}' from {}: {}",
                    request.from_path, request.url, e
                ));
                return report;
            }
        }
        drop(cloned);

        if cancel.is_cancelled() {
            report.error(Error::Cancelled.to_string());
            return report;
        }

        // Detection is scoped to the folder this take copied, not the whole
        // workspace: a take classifies what it brought in.
        let detection = detect::detect(&report.destination);
        report.is_dotnet_project = detection.is_dotnet();
        report.is_framework_project = detection.is_framework();
        report.discovered_project_files = detection.dotnet_projects.clone();
        for warning in self.sanitize_all(&detection) {
            report.warn(warning);
        }

        let name = descriptor_name(request.solution_name.as_deref(), &request.output_dir);

        if detection.is_dotnet() {
            match self.compose_solution(&request.output_dir, &name, &detection) {
                Ok(path) => report.solution_path = Some(path),
                Err(e) => report.error(e.to_string()),
            }
        }

        if detection.is_framework() {
            match self.compose_workspace(&request.output_dir, &name, &detection) {
                Ok(path) => report.workspace_path = Some(path),
                Err(e) => report.error(e.to_string()),
            }
        }

        report
    }

    /// Sanitize every discovered project descriptor, returning the
    /// warnings for descriptors that had to be left unmodified.
    fn sanitize_all(&self, detection: &Detection) -> Vec<String> {
        let mut warnings = Vec::new();
        for project in &detection.dotnet_projects {
            match sanitize_project_file(project) {
                Ok(true) => log::info!("sanitized {}", project.display()),
                Ok(false) => {}
                Err(e) => warnings.push(format!("{} left unmodified: {}", project.display(), e)),
            }
        }
        warnings
    }

    fn compose_solution(
        &self,
        output_dir: &Path,
        name: &str,
        detection: &Detection,
    ) -> Result<std::path::PathBuf> {
        let solution_path = solution::ensure_solution(self.runner.as_ref(), output_dir, name)?;
        let added = solution::add_projects(
            self.runner.as_ref(),
            &solution_path,
            &detection.dotnet_projects,
        )?;
        log::info!(
            "solution {} references {} new project(s)",
            solution_path.display(),
            added
        );
        Ok(solution_path)
    }

    fn compose_workspace(
        &self,
        output_dir: &Path,
        name: &str,
        detection: &Detection,
    ) -> Result<std::path::PathBuf> {
        let workspace_path = workspace::ensure_workspace(self.runner.as_ref(), output_dir, name)?;
        for root in &detection.framework_roots {
            // The workspace's own descriptor marks the output root; it is
            // not a project to incorporate into itself.
            if root == output_dir {
                continue;
            }
            if workspace::incorporate_project(&workspace_path, root)? {
                log::info!("incorporated {}", root.display());
            }
        }
        Ok(workspace_path)
    }
}

/// Name used for the solution/workspace descriptors: the explicit request
/// name, or the output directory's own name.
fn descriptor_name(requested: Option<&str>, output_dir: &Path) -> String {
    requested
        .map(str::to_string)
        .or_else(|| {
            output_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "workspace".to_string())
}

/// Last component of a take's source path, used as the destination folder
/// name.
fn folder_name(from_path: &str) -> Result<String> {
    Path::new(from_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| Error::Path {
            message: format!("'{}' has no folder name to take", from_path),
        })
}
