//! # Solution Composition
//!
//! Ensures the output workspace carries a solution descriptor and that it
//! references every discovered, sanitized project. Descriptor creation and
//! mutation are delegated to the solution tool through the `CommandRunner`
//! (`dotnet new sln`, `dotnet sln add`); this module only decides *whether*
//! to invoke it.
//!
//! Idempotence is the contract that makes repeated take operations safe: an
//! existing solution is never recreated, and adding an already-referenced
//! project is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{Error, Result};
use crate::runner::CommandRunner;

/// Return the solution descriptor at `output_dir`, creating it through the
/// solution tool if it does not exist yet.
pub fn ensure_solution(
    runner: &dyn CommandRunner,
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let solution_path = output_dir.join(format!("{}.sln", name));
    if solution_path.exists() {
        log::debug!("reusing solution {}", solution_path.display());
        return Ok(solution_path);
    }

    runner.run("dotnet", &["new", "sln", "--name", name], output_dir)?;

    if !solution_path.exists() {
        return Err(Error::Compose {
            message: format!(
                "solution tool reported success but {} was not created",
                solution_path.display()
            ),
        });
    }
    Ok(solution_path)
}

/// Add every not-yet-referenced project to the solution. Returns how many
/// projects were actually added.
pub fn add_projects(
    runner: &dyn CommandRunner,
    solution_path: &Path,
    projects: &[PathBuf],
) -> Result<usize> {
    let solution_dir = solution_path.parent().ok_or_else(|| Error::Compose {
        message: format!("solution path {} has no parent", solution_path.display()),
    })?;
    let solution_file = solution_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Compose {
            message: format!("solution path {} has no file name", solution_path.display()),
        })?;

    let source = fs::read_to_string(solution_path)?;
    let mut referenced = referenced_projects(&source);
    let mut added = 0;

    for project in projects {
        let relative = project
            .strip_prefix(solution_dir)
            .unwrap_or(project)
            .to_string_lossy()
            .to_string();
        let normalized = normalize_separators(&relative);

        if referenced.contains(&normalized) {
            log::debug!("{} already referenced by {}", normalized, solution_file);
            continue;
        }

        runner.run(
            "dotnet",
            &["sln", solution_file, "add", relative.as_str()],
            solution_dir,
        )?;
        referenced.push(normalized);
        added += 1;
    }

    Ok(added)
}

/// Project paths referenced by a solution document, with separators
/// normalized to `/`.
///
/// Solution project lines look like:
/// `Project("{GUID}") = "Name", "path\to\Name.csproj", "{GUID}"`
pub fn referenced_projects(solution_source: &str) -> Vec<String> {
    let line = Regex::new(r#"(?m)^Project\("\{[^}]+\}"\)\s*=\s*"[^"]*",\s*"([^"]+)""#)
        .expect("static regex");
    line.captures_iter(solution_source)
        .map(|captures| normalize_separators(&captures[1]))
        .collect()
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}
