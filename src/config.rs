//! # Composition Manifest and Request Types
//!
//! This module defines the data structures that describe a composition run:
//! the `.alacarte.yaml` manifest for bulk mode, and the request types the
//! orchestrator consumes.
//!
//! ## Key Components
//!
//! - **`Manifest`**: The on-disk YAML document listing the repositories and
//!   folder mappings to compose, plus the desired output layout.
//! - **`RepositoryConfig` / `FolderMapping`**: One remote source to pull
//!   from, and one subtree mapping inside it.
//! - **`ComposeRequest`**: The fully-resolved bulk request (manifest plus
//!   CLI overrides for the output directory and solution name).
//! - **`TakeRequest`**: The incremental single-repository/single-folder
//!   request, mapping 1:1 onto the `take` subcommand's flags.
//!
//! ## Parsing
//!
//! `parse` and `from_file` are the entry points for reading a manifest.
//! Parse and validation failures are reported as `Error::ConfigParse` with a
//! hint attached where the mistake has an obvious fix.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A subtree mapping inside one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderMapping {
    /// Source path, relative to the repository root after clone.
    pub from: String,
    /// Destination path, relative to the output workspace.
    ///
    /// Defaults to `from` when omitted, which covers the common case of
    /// keeping the folder at the same relative location.
    #[serde(default)]
    pub to: Option<String>,
}

impl FolderMapping {
    /// The effective destination path for this mapping.
    pub fn destination(&self) -> &str {
        self.to.as_deref().unwrap_or(&self.from)
    }
}

/// One remote repository to pull folders from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// The URL of the repository to clone.
    pub url: String,
    /// The branch to clone.
    pub branch: String,
    /// Ordered list of folder mappings to extract from this repository.
    #[serde(default)]
    pub folders: Vec<FolderMapping>,
}

/// Desired shape of the composed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    /// The manifest author left the layout open; compose whatever the
    /// detector finds, same as the mixed layout.
    #[default]
    Unspecified,
    /// A solution referencing every discovered project, with any other
    /// extracted folders left alongside it.
    MixedSolutionWithOtherFolders,
}

/// The `.alacarte.yaml` manifest document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Name for the solution/workspace descriptors. Defaults to the output
    /// directory name when omitted.
    #[serde(default)]
    pub solution: Option<String>,
    /// Desired output layout.
    #[serde(default)]
    pub output_type: OutputType,
    /// Repositories to compose, in merge order (last writer wins on
    /// overlapping destinations).
    pub repositories: Vec<RepositoryConfig>,
}

impl Manifest {
    /// Resolve this manifest into a `ComposeRequest`.
    ///
    /// `output_dir` comes from the CLI; `solution_override` takes precedence
    /// over the manifest's `solution` field.
    pub fn into_request(
        self,
        output_dir: PathBuf,
        solution_override: Option<String>,
    ) -> ComposeRequest {
        ComposeRequest {
            solution_name: solution_override.or(self.solution),
            output_type: self.output_type,
            repositories: self.repositories,
            output_dir,
        }
    }
}

/// A fully-resolved bulk composition request.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    /// Repositories to compose, in merge order.
    pub repositories: Vec<RepositoryConfig>,
    /// Desired output layout.
    pub output_type: OutputType,
    /// Output workspace directory, created by the run.
    pub output_dir: PathBuf,
    /// Name for the solution/workspace descriptors.
    pub solution_name: Option<String>,
}

/// An incremental single-folder request against a possibly pre-existing
/// workspace.
#[derive(Debug, Clone)]
pub struct TakeRequest {
    /// The URL of the repository to clone.
    pub url: String,
    /// The branch to clone.
    pub branch: String,
    /// Source path inside the clone to copy.
    pub from_path: String,
    /// Output workspace directory, merged into (never wiped).
    pub output_dir: PathBuf,
    /// Name for the solution/workspace descriptors.
    pub solution_name: Option<String>,
}

/// Parse a manifest from a YAML string.
pub fn parse(input: &str) -> Result<Manifest> {
    let manifest: Manifest = serde_yaml::from_str(input).map_err(|e| {
        let message = e.to_string();
        let hint = parse_hint(&message);
        Error::ConfigParse { message, hint }
    })?;
    validate(&manifest)?;
    Ok(manifest)
}

/// Parse a manifest from a file on disk.
pub fn from_file(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: None,
    })?;
    parse(&content)
}

/// Best-effort hint for common serde parse failures.
fn parse_hint(message: &str) -> Option<String> {
    if message.contains("missing field `url`") {
        Some("every repository entry needs a 'url:' field".to_string())
    } else if message.contains("missing field `branch`") {
        Some("every repository entry needs a 'branch:' field".to_string())
    } else if message.contains("missing field `repositories`") {
        Some("add a top-level 'repositories:' list".to_string())
    } else if message.contains("unknown variant") {
        Some("output_type must be 'unspecified' or 'mixed-solution-with-other-folders'".to_string())
    } else {
        None
    }
}

/// Validate manifest field values beyond what serde enforces.
fn validate(manifest: &Manifest) -> Result<()> {
    for repo in &manifest.repositories {
        if repo.url.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "repository url must not be empty".to_string(),
                hint: Some("set 'url:' to the repository's clone URL".to_string()),
            });
        }
        // Only absolute URLs are checked; scp-style addresses
        // (git@host:path) have no scheme and are passed through to git.
        if repo.url.contains("://") {
            url::Url::parse(&repo.url).map_err(|e| Error::ConfigParse {
                message: format!("invalid repository url '{}': {}", repo.url, e),
                hint: None,
            })?;
        }
        if repo.branch.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: format!("repository {} has an empty branch", repo.url),
                hint: Some("set 'branch:' to an existing remote branch".to_string()),
            });
        }
        for folder in &repo.folders {
            if folder.from.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("repository {} has a folder with an empty 'from'", repo.url),
                    hint: None,
                });
            }
        }
    }
    Ok(())
}
