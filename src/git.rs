//! # Repository Cloning
//!
//! Cloning is the one remote, failure-prone operation in the pipeline, so it
//! sits behind the `CloneClient` trait: the default implementation shells
//! out to the system `git`, and tests substitute a fake that materializes a
//! fixture tree instead.
//!
//! Using the system git command automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Clones are ephemeral. `clone_to_temp` places the working copy in a
//! `tempfile::TempDir` owned by the returned `ClonedRepo`; dropping it
//! deletes the directory on every path out of the pipeline: success,
//! downstream failure, cancellation, or panic.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::error::{Error, Result};

/// Trait for clone operations - allows mocking in tests
pub trait CloneClient: Send + Sync {
    /// Clone `url` at `branch` into `target`, which exists and is empty.
    fn clone_branch(&self, url: &str, branch: &str, target: &Path) -> Result<()>;
}

/// The default implementation of `CloneClient`, shelling out to the system
/// `git` command for a shallow clone.
pub struct GitCloneClient;

impl CloneClient for GitCloneClient {
    fn clone_branch(&self, url: &str, branch: &str, target: &Path) -> Result<()> {
        let output = Command::new("git")
            .args(["clone", "--depth=1", "--branch", branch, url])
            .arg(target)
            .output()
            .map_err(|e| Error::CloneFailed {
                url: url.to_string(),
                branch: branch.to_string(),
                message: e.to_string(),
                hint: None,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let hint = clone_hint(&stderr);
            return Err(Error::CloneFailed {
                url: url.to_string(),
                branch: branch.to_string(),
                message: stderr.trim().to_string(),
                hint,
            });
        }

        Ok(())
    }
}

/// Suggest a fix for the most common clone failures.
fn clone_hint(stderr: &str) -> Option<String> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        Some(
            "make sure you have access to the repository: an SSH key added to \
             ssh-agent, git credentials configured, or a personal access token"
                .to_string(),
        )
    } else if stderr.contains("Remote branch") && stderr.contains("not found") {
        Some("check that the branch exists on the remote".to_string())
    } else {
        None
    }
}

/// A repository working copy inside a scoped temporary directory.
///
/// The directory is deleted when this value drops.
#[derive(Debug)]
pub struct ClonedRepo {
    // Held for its Drop impl.
    _temp: TempDir,
    path: PathBuf,
}

impl ClonedRepo {
    /// Root of the working copy.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Clone `url` at `branch` into a fresh temporary directory.
pub fn clone_to_temp(client: &dyn CloneClient, url: &str, branch: &str) -> Result<ClonedRepo> {
    let temp = TempDir::new().map_err(Error::Io)?;
    let path = temp.path().join("clone");

    log::debug!("cloning {}@{} into {}", url, branch, path.display());
    client.clone_branch(url, branch, &path)?;

    Ok(ClonedRepo { _temp: temp, path })
}
