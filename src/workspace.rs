//! # Framework Workspace Composition
//!
//! Mirrors the solution composer for the Angular/Node side: ensures a
//! workspace scaffold exists at the output directory, then folds each
//! discovered app or library folder into the workspace descriptor's
//! project map.
//!
//! Scaffold creation is delegated to the workspace tool through the
//! `CommandRunner`; incorporation edits the descriptor's `projects` map
//! directly, since the tool has no command for registering an existing
//! folder. Both operations are idempotent: an existing descriptor is never
//! recreated, and an already-incorporated project is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::detect::is_framework_library;
use crate::error::{Error, Result};
use crate::runner::CommandRunner;

/// File name of the framework workspace descriptor.
pub const WORKSPACE_DESCRIPTOR: &str = "angular.json";

/// Return the workspace descriptor at `output_dir`, creating the scaffold
/// through the workspace tool if it does not exist yet.
pub fn ensure_workspace(
    runner: &dyn CommandRunner,
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let workspace_path = output_dir.join(WORKSPACE_DESCRIPTOR);
    if workspace_path.exists() {
        log::debug!("reusing workspace {}", workspace_path.display());
        return Ok(workspace_path);
    }

    runner.run(
        "ng",
        &[
            "new",
            name,
            "--directory",
            ".",
            "--create-application",
            "false",
            "--skip-install",
            "--skip-git",
        ],
        output_dir,
    )?;

    if !workspace_path.exists() {
        return Err(Error::Compose {
            message: format!(
                "workspace tool reported success but {} was not created",
                workspace_path.display()
            ),
        });
    }
    Ok(workspace_path)
}

/// Fold `project_root` into the workspace descriptor's project map.
///
/// Returns `Ok(true)` iff the descriptor changed; incorporating an
/// already-registered project is a no-op.
pub fn incorporate_project(workspace_path: &Path, project_root: &Path) -> Result<bool> {
    let source = fs::read_to_string(workspace_path)?;
    let mut descriptor: Value = serde_json::from_str(&source)?;

    let workspace_dir = workspace_path.parent().ok_or_else(|| Error::Compose {
        message: format!("workspace path {} has no parent", workspace_path.display()),
    })?;
    let relative_root = project_root
        .strip_prefix(workspace_dir)
        .unwrap_or(project_root)
        .to_string_lossy()
        .replace('\\', "/");

    let project_name = project_root
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Compose {
            message: format!("project root {} has no name", project_root.display()),
        })?
        .to_string();

    let root_object = descriptor.as_object_mut().ok_or_else(|| Error::Compose {
        message: format!("{} is not a JSON object", workspace_path.display()),
    })?;
    let projects = root_object
        .entry("projects")
        .or_insert_with(|| Value::Object(Map::new()));
    let projects = projects.as_object_mut().ok_or_else(|| Error::Compose {
        message: format!("'projects' in {} is not an object", workspace_path.display()),
    })?;

    if projects.contains_key(&project_name) {
        log::debug!("{} already incorporated", project_name);
        return Ok(false);
    }

    let project_type = if is_framework_library(project_root) {
        "library"
    } else {
        "application"
    };
    projects.insert(
        project_name,
        json!({
            "root": relative_root,
            "sourceRoot": format!("{}/src", relative_root),
            "projectType": project_type,
        }),
    );

    let mut output = serde_json::to_string_pretty(&descriptor)?;
    output.push('\n');
    fs::write(workspace_path, output)?;
    Ok(true)
}
