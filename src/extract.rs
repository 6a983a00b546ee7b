//! # Folder Extraction
//!
//! Copies a named subtree out of a clone into the output workspace. This is
//! plain filesystem plumbing with one contract worth stating precisely:
//!
//! - A missing source is an expected outcome (`SourceMissing`), not an
//!   error; the orchestrator records a warning and moves on.
//! - Merge semantics: files already present at the destination but absent
//!   from the source are preserved; files present in both are overwritten
//!   (source wins). This makes repeated takes and overlapping destination
//!   mappings well-defined.
//! - The component never interprets file content.
//!
//! Both the source and destination paths are required to stay inside their
//! base directories; a mapping that climbs out with `..` is rejected.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Outcome of one subtree extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The subtree was copied into the workspace.
    Copied {
        /// Where the subtree landed, as an absolute path.
        destination: PathBuf,
        /// Number of files written.
        files_copied: usize,
        /// How many of those replaced a pre-existing destination file.
        overwritten: usize,
    },
    /// The configured source path does not exist in the clone.
    SourceMissing,
}

/// Copy `clone_root/from` into `output_dir/to`, merging with any
/// pre-existing destination content.
pub fn extract(
    clone_root: &Path,
    from: &str,
    to: &str,
    output_dir: &Path,
) -> Result<ExtractOutcome> {
    ensure_relative(from)?;
    ensure_relative(to)?;

    let source = clone_root.join(from);
    if !source.exists() {
        return Ok(ExtractOutcome::SourceMissing);
    }

    let destination = output_dir.join(to);
    let mut files_copied = 0;
    let mut overwritten = 0;

    if source.is_file() {
        copy_file(&source, &destination, &mut files_copied, &mut overwritten)?;
        return Ok(ExtractOutcome::Copied {
            destination,
            files_copied,
            overwritten,
        });
    }

    for entry in WalkDir::new(&source).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Path {
            message: format!("cannot walk {}: {}", source.display(), e),
        })?;
        let relative = entry
            .path()
            .strip_prefix(&source)
            .expect("walkdir yields paths under its root");

        // The clone's own metadata never belongs in the workspace.
        if relative.components().next() == Some(Component::Normal(".git".as_ref())) {
            continue;
        }

        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target, &mut files_copied, &mut overwritten)?;
        }
    }

    Ok(ExtractOutcome::Copied {
        destination,
        files_copied,
        overwritten,
    })
}

fn copy_file(
    source: &Path,
    target: &Path,
    files_copied: &mut usize,
    overwritten: &mut usize,
) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    if target.exists() {
        *overwritten += 1;
        log::debug!("overwriting {}", target.display());
    }
    fs::copy(source, target)?;
    *files_copied += 1;
    Ok(())
}

/// Reject path values that are absolute or climb out of their base
/// directory.
fn ensure_relative(path: &str) -> Result<()> {
    let p = Path::new(path);
    let escapes = p.is_absolute()
        || p.components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(Error::Path {
            message: format!("path '{}' escapes its base directory", path),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(root: &Path, relative: &str) -> String {
        fs::read_to_string(root.join(relative)).unwrap()
    }

    #[test]
    fn test_extract_copies_subtree() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(clone.path(), "src/Lib/Lib.csproj", "<Project/>");
        write(clone.path(), "src/Lib/Class.cs", "class C {}");

        let outcome = extract(clone.path(), "src/Lib", "src/Lib", output.path()).unwrap();

        match outcome {
            ExtractOutcome::Copied {
                files_copied,
                overwritten,
                destination,
            } => {
                assert_eq!(files_copied, 2);
                assert_eq!(overwritten, 0);
                assert_eq!(destination, output.path().join("src/Lib"));
            }
            other => panic!("expected Copied, got {:?}", other),
        }
        assert_eq!(read(output.path(), "src/Lib/Class.cs"), "class C {}");
    }

    #[test]
    fn test_extract_missing_source() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let outcome = extract(clone.path(), "does/not/exist", "dest", output.path()).unwrap();
        assert_eq!(outcome, ExtractOutcome::SourceMissing);
    }

    #[test]
    fn test_extract_merge_preserves_unrelated_destination_files() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(clone.path(), "lib/new.txt", "new");
        write(output.path(), "lib/existing.txt", "keep me");

        extract(clone.path(), "lib", "lib", output.path()).unwrap();

        assert_eq!(read(output.path(), "lib/existing.txt"), "keep me");
        assert_eq!(read(output.path(), "lib/new.txt"), "new");
    }

    #[test]
    fn test_extract_source_wins_on_conflict() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(clone.path(), "lib/shared.txt", "from source");
        write(output.path(), "lib/shared.txt", "stale");

        let outcome = extract(clone.path(), "lib", "lib", output.path()).unwrap();

        match outcome {
            ExtractOutcome::Copied { overwritten, .. } => assert_eq!(overwritten, 1),
            other => panic!("expected Copied, got {:?}", other),
        }
        assert_eq!(read(output.path(), "lib/shared.txt"), "from source");
    }

    #[test]
    fn test_extract_skips_git_metadata() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(clone.path(), "lib/file.txt", "content");
        write(clone.path(), "lib/.git/config", "git internals");

        extract(clone.path(), "lib", "lib", output.path()).unwrap();

        assert!(output.path().join("lib/file.txt").exists());
        assert!(!output.path().join("lib/.git").exists());
    }

    #[test]
    fn test_extract_single_file_source() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(clone.path(), "docs/README.md", "# Docs");

        let outcome =
            extract(clone.path(), "docs/README.md", "docs/README.md", output.path()).unwrap();

        match outcome {
            ExtractOutcome::Copied { files_copied, .. } => assert_eq!(files_copied, 1),
            other => panic!("expected Copied, got {:?}", other),
        }
        assert_eq!(read(output.path(), "docs/README.md"), "# Docs");
    }

    #[test]
    fn test_extract_rejects_traversal_in_from() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let err = extract(clone.path(), "../outside", "dest", output.path()).unwrap_err();
        assert!(matches!(err, Error::Path { .. }));
    }

    #[test]
    fn test_extract_rejects_traversal_in_to() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(clone.path(), "lib/file.txt", "content");

        let err = extract(clone.path(), "lib", "../escape", output.path()).unwrap_err();
        assert!(matches!(err, Error::Path { .. }));
    }

    #[test]
    fn test_extract_rejects_absolute_paths() {
        let clone = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let err = extract(clone.path(), "/etc", "dest", output.path()).unwrap_err();
        assert!(matches!(err, Error::Path { .. }));
    }
}
