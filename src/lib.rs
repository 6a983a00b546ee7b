//! # Alacarte Workspace Composition Library
//!
//! This library assembles local development workspaces from folders picked
//! out of remote repositories. It is designed to be used by the `alacarte`
//! command-line tool but can also be integrated into other applications
//! that need to compose or grow workspaces programmatically.
//!
//! ## Quick Example
//!
//! ```
//! use alacarte::config;
//! use alacarte::sanitize;
//!
//! // Parse a composition manifest
//! let manifest = config::parse(r#"
//! solution: Widgets
//! repositories:
//!   - url: https://host/repoA
//!     branch: main
//!     folders:
//!       - from: src/Lib
//! "#).unwrap();
//! assert_eq!(manifest.repositories.len(), 1);
//!
//! // References that escape their project directory get stripped during
//! // sanitization; everything else is preserved
//! assert!(sanitize::is_escaping_path("..\\Sibling\\Sibling.csproj"));
//! assert!(!sanitize::is_escaping_path("Inner/Inner.csproj"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The `.alacarte.yaml` manifest schema and
//!   the request types the orchestrator consumes.
//! - **Cloning (`git`)**: Shallow clones into scoped temporary directories
//!   behind the mockable `CloneClient` trait.
//! - **Extraction (`extract`)**: Subtree copies into the output workspace
//!   with merge semantics (source wins on conflict, unrelated destination
//!   content is preserved).
//! - **Detection (`detect`)**: Classification of the merged tree as
//!   .NET-bearing, framework-bearing, both, or plain content.
//! - **Sanitization (`sanitize`)**: Removal of directory-escaping build
//!   references from extracted .NET project descriptors.
//! - **Composition (`solution`, `workspace`)**: Idempotent ensure/append
//!   maintenance of the solution and framework workspace descriptors,
//!   delegating tool invocations through the `runner` module.
//! - **Orchestration (`orchestrator`)**: The never-throwing pipeline that
//!   drives all of the above and folds every per-step outcome into a
//!   `report`.
//!
//! ## Execution Flow
//!
//! The main entry points are `orchestrator::Orchestrator::process` (bulk
//! mode) and `orchestrator::Orchestrator::take` (incremental mode). A bulk
//! run executes the following high-level steps:
//!
//! 1.  **Clone**: Shallow-clone each listed repository into a scoped
//!     temporary directory.
//! 2.  **Extract**: Copy each configured folder into the output workspace,
//!     merging with whatever is already there.
//! 3.  **Detect**: Classify the merged tree and collect project
//!     descriptors.
//! 4.  **Sanitize**: Strip directory-escaping references from every
//!     extracted .NET descriptor.
//! 5.  **Compose**: Ensure and update the solution and/or framework
//!     workspace descriptors to reference what was discovered.
//!
//! Per-step failures never abort the run; they accumulate in the returned
//! report, and the run is successful iff no error was recorded.

pub mod config;
pub mod defaults;
pub mod detect;
pub mod error;
pub mod extract;
pub mod git;
pub mod orchestrator;
pub mod output;
pub mod report;
pub mod runner;
pub mod sanitize;
pub mod solution;
pub mod workspace;

#[cfg(test)]
mod sanitize_proptest;
