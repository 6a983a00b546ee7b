//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `alacarte` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! Note that the composition pipeline itself never surfaces these errors to
//! its callers: the orchestrator converts every per-step failure into a
//! report entry and keeps going. `Error` is the currency *between* the
//! components and the orchestrator, not the public contract of a run.
//!
//! Two variants carry an optional `hint` field (`ConfigParse` and
//! `CloneFailed`) so that the most common user mistakes (a malformed
//! manifest, a repository that needs credentials) come with an actionable
//! suggestion attached.

use thiserror::Error;

/// Main error type for alacarte operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the `.alacarte.yaml` manifest.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the manifest issue
        hint: Option<String>,
    },

    /// An error occurred while cloning a repository.
    ///
    /// Includes the repository URL, branch, error message, and an optional
    /// hint for resolution.
    #[error("Clone error for {url}@{branch}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    CloneFailed {
        url: String,
        branch: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An external command (solution tool, workspace tool) failed.
    #[error("Command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A .NET project descriptor could not be parsed as XML.
    ///
    /// The orchestrator downgrades this to a warning and leaves the file
    /// unmodified.
    #[error("Project descriptor parse error in {path}: {message}")]
    ProjectFileParse { path: String, message: String },

    /// A solution or workspace descriptor could not be created or updated.
    #[error("Composer error: {message}")]
    Compose { message: String },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// The run was cancelled before this step could start.
    #[error("Operation cancelled")]
    Cancelled,

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            message: "Invalid YAML".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Manifest parsing error"));
        assert!(display.contains("Invalid YAML"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "Missing url field".to_string(),
            hint: Some("Add 'url:' to the repository block".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Manifest parsing error"));
        assert!(display.contains("Missing url field"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add 'url:'"));
    }

    #[test]
    fn test_error_display_clone_failed() {
        let error = Error::CloneFailed {
            url: "https://github.com/test/repo.git".to_string(),
            branch: "main".to_string(),
            message: "Authentication failed".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Clone error"));
        assert!(display.contains("https://github.com/test/repo.git"));
        assert!(display.contains("main"));
        assert!(display.contains("Authentication failed"));
    }

    #[test]
    fn test_error_display_clone_failed_with_hint() {
        let error = Error::CloneFailed {
            url: "https://github.com/test/repo.git".to_string(),
            branch: "main".to_string(),
            message: "Authentication failed".to_string(),
            hint: Some("Check SSH keys".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Clone error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Check SSH keys"));
    }

    #[test]
    fn test_error_display_command_failed() {
        let error = Error::CommandFailed {
            command: "dotnet new sln".to_string(),
            stderr: "command not found".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Command failed"));
        assert!(display.contains("dotnet new sln"));
        assert!(display.contains("command not found"));
    }

    #[test]
    fn test_error_display_project_file_parse() {
        let error = Error::ProjectFileParse {
            path: "src/Lib/Lib.csproj".to_string(),
            message: "unexpected end of stream".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Project descriptor parse error"));
        assert!(display.contains("src/Lib/Lib.csproj"));
        assert!(display.contains("unexpected end of stream"));
    }

    #[test]
    fn test_error_display_compose() {
        let error = Error::Compose {
            message: "solution file was not created".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Composer error"));
        assert!(display.contains("solution file was not created"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_str = "invalid: [unclosed";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: Error = yaml_error.into();
        let display = format!("{}", error);
        assert!(display.contains("YAML parsing error"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let error: Error = json_error.into();
        let display = format!("{}", error);
        assert!(display.contains("JSON parsing error"));
    }

    #[test]
    fn test_error_display_cancelled() {
        let display = format!("{}", Error::Cancelled);
        assert!(display.contains("cancelled"));
    }
}
