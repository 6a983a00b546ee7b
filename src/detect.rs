//! # Project Type Detection
//!
//! Classifies a folder subtree by the build manifests it carries: .NET
//! project descriptors (`.csproj`, `.fsproj`, `.vbproj`) on one side,
//! framework workspace markers (`angular.json`, `project.json`,
//! `package.json`) on the other. Both can be present at once (a mixed
//! folder) and both can be absent (plain content such as documentation).
//!
//! Detection is a pure classification step: it never errors, and unreadable
//! entries are simply skipped. Classification is a closed set of variants,
//! not an open handler registry; four outcomes cover everything this
//! engine composes.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// .NET project descriptor extensions.
const DOTNET_PROJECT_EXTENSIONS: &[&str] = &["csproj", "fsproj", "vbproj"];

/// Files that mark a directory as a framework (Angular/Node) project root.
const FRAMEWORK_MARKERS: &[&str] = &["angular.json", "project.json", "package.json"];

/// Marker distinguishing a framework library from an application.
const LIBRARY_MARKER: &str = "ng-package.json";

/// Directories never worth descending into.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "bin", "obj", "dist"];

/// Closed classification of a detected subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Carries .NET project descriptors only.
    DotNet,
    /// Carries framework workspace markers only.
    Framework,
    /// Carries both.
    Mixed,
    /// Carries neither; plain content.
    Plain,
}

/// What was found under a detected path.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Every .NET project descriptor found, in walk order.
    pub dotnet_projects: Vec<PathBuf>,
    /// Directories carrying a framework marker, deduplicated, in walk order.
    pub framework_roots: Vec<PathBuf>,
}

impl Detection {
    pub fn is_dotnet(&self) -> bool {
        !self.dotnet_projects.is_empty()
    }

    pub fn is_framework(&self) -> bool {
        !self.framework_roots.is_empty()
    }

    pub fn classification(&self) -> Classification {
        match (self.is_dotnet(), self.is_framework()) {
            (true, true) => Classification::Mixed,
            (true, false) => Classification::DotNet,
            (false, true) => Classification::Framework,
            (false, false) => Classification::Plain,
        }
    }
}

/// Walk `path` and classify what it contains.
///
/// Missing paths yield an empty `Detection` rather than an error; absence
/// of markers is an answer, not a failure.
pub fn detect(path: &Path) -> Detection {
    let mut detection = Detection::default();

    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }

        if is_dotnet_project(entry.path()) {
            detection.dotnet_projects.push(entry.path().to_path_buf());
        }

        if is_framework_marker(entry.path()) {
            let root = entry
                .path()
                .parent()
                .unwrap_or(path)
                .to_path_buf();
            if !detection.framework_roots.contains(&root) {
                detection.framework_roots.push(root);
            }
        }
    }

    detection
}

/// True when `root` looks like a framework library rather than an
/// application.
pub fn is_framework_library(root: &Path) -> bool {
    root.join(LIBRARY_MARKER).exists()
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_dotnet_project(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOTNET_PROJECT_EXTENSIONS.contains(&ext))
}

fn is_framework_marker(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| FRAMEWORK_MARKERS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_detect_dotnet_project() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/Lib/Lib.csproj", "<Project/>");
        write(dir.path(), "src/Lib/Class.cs", "class C {}");

        let detection = detect(dir.path());
        assert!(detection.is_dotnet());
        assert!(!detection.is_framework());
        assert_eq!(detection.classification(), Classification::DotNet);
        assert_eq!(
            detection.dotnet_projects,
            vec![dir.path().join("src/Lib/Lib.csproj")]
        );
    }

    #[test]
    fn test_detect_fsproj_and_vbproj() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "A/A.fsproj", "<Project/>");
        write(dir.path(), "B/B.vbproj", "<Project/>");

        let detection = detect(dir.path());
        assert_eq!(detection.dotnet_projects.len(), 2);
    }

    #[test]
    fn test_detect_framework_project() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app/angular.json", "{}");

        let detection = detect(dir.path());
        assert!(!detection.is_dotnet());
        assert!(detection.is_framework());
        assert_eq!(detection.classification(), Classification::Framework);
        assert_eq!(detection.framework_roots, vec![dir.path().join("app")]);
    }

    #[test]
    fn test_detect_mixed_folder() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "backend/Api.csproj", "<Project/>");
        write(dir.path(), "frontend/package.json", "{}");

        let detection = detect(dir.path());
        assert_eq!(detection.classification(), Classification::Mixed);
    }

    #[test]
    fn test_detect_plain_content() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/README.md", "# Docs");

        let detection = detect(dir.path());
        assert_eq!(detection.classification(), Classification::Plain);
        assert!(!detection.is_dotnet());
        assert!(!detection.is_framework());
    }

    #[test]
    fn test_detect_missing_path_is_plain() {
        let dir = TempDir::new().unwrap();
        let detection = detect(&dir.path().join("nope"));
        assert_eq!(detection.classification(), Classification::Plain);
    }

    #[test]
    fn test_detect_skips_node_modules_and_git() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "node_modules/dep/package.json", "{}");
        write(dir.path(), ".git/package.json", "{}");

        let detection = detect(dir.path());
        assert!(!detection.is_framework());
    }

    #[test]
    fn test_detect_skips_build_output_dirs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bin/Debug/Stale.csproj", "<Project/>");
        write(dir.path(), "obj/Stale.csproj", "<Project/>");
        write(dir.path(), "dist/package.json", "{}");

        let detection = detect(dir.path());
        assert_eq!(detection.classification(), Classification::Plain);
    }

    #[test]
    fn test_detect_deduplicates_framework_roots() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app/angular.json", "{}");
        write(dir.path(), "app/package.json", "{}");

        let detection = detect(dir.path());
        assert_eq!(detection.framework_roots.len(), 1);
    }

    #[test]
    fn test_is_framework_library() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "lib/ng-package.json", "{}");
        write(dir.path(), "app/package.json", "{}");

        assert!(is_framework_library(&dir.path().join("lib")));
        assert!(!is_framework_library(&dir.path().join("app")));
    }
}
