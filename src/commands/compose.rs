//! Compose command implementation
//!
//! Reads the composition manifest, runs the bulk pipeline against every
//! listed repository, and renders the resulting report. The command exits
//! non-zero iff the run recorded at least one error, so scripted pipelines
//! can gate on it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;

use alacarte::config;
use alacarte::defaults::MANIFEST_FILE;
use alacarte::orchestrator::{CancelToken, Orchestrator};
use alacarte::output::{emoji, print_issues, OutputConfig};

/// Arguments for the compose command
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Path to the composition manifest
    #[arg(short, long, value_name = "PATH", env = "ALACARTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output workspace directory (defaults to current directory)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Solution/workspace name (overrides the manifest)
    #[arg(short, long, value_name = "NAME")]
    pub solution: Option<String>,

    /// Compose into a non-empty output directory without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the compose command
pub fn execute(args: ComposeArgs, output_config: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let config_path = args.config.unwrap_or_else(|| PathBuf::from(MANIFEST_FILE));
    if !config_path.exists() {
        anyhow::bail!("Manifest file not found: {}", config_path.display());
    }

    let output_dir = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let manifest = config::from_file(&config_path)?;
    confirm_non_empty_output(&output_dir, args.force)?;

    let repository_count = manifest.repositories.len();
    let request = manifest.into_request(output_dir, args.solution);

    if !args.quiet {
        println!(
            "{} Composing workspace from {} repositorie(s)",
            emoji(output_config, "🧩", "[COMPOSE]"),
            repository_count
        );
        println!();
    }

    let spinner = if !args.quiet && output_config.use_color {
        let spinner = indicatif::ProgressBar::new_spinner();
        spinner.set_message("cloning and extracting...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    } else {
        None
    };

    let orchestrator = Orchestrator::new();
    let report = orchestrator.process(&request, &CancelToken::new());

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if !args.quiet {
        let duration = start_time.elapsed();
        println!(
            "   {} project file(s) discovered",
            report.discovered_project_files.len()
        );
        if let Some(solution) = &report.solution_path {
            println!("   solution: {}", solution.display());
        }
        for workspace in &report.created_framework_workspaces {
            println!("   workspace: {}", workspace.display());
        }
        println!("   output: {}", report.output_dir.display());
        print_issues(output_config, &report.warnings, &report.errors);
        println!();

        if report.success() {
            println!(
                "{} Composed successfully in {:.2}s",
                emoji(output_config, "✅", "[OK]"),
                duration.as_secs_f64()
            );
        } else {
            println!("{} Composition finished with errors", emoji(output_config, "❌", "[FAIL]"));
        }
    }

    if !report.success() {
        anyhow::bail!("{} error(s) recorded", report.errors.len());
    }
    Ok(())
}

/// Bulk mode owns its output directory; composing into one that already has
/// content needs an explicit go-ahead.
fn confirm_non_empty_output(output_dir: &std::path::Path, force: bool) -> Result<()> {
    if force || !output_dir.exists() {
        return Ok(());
    }
    let has_content = std::fs::read_dir(output_dir)?.next().is_some();
    if !has_content {
        return Ok(());
    }

    if console::user_attended() {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "{} is not empty, compose into it anyway?",
                output_dir.display()
            ))
            .default(false)
            .interact()?;
        if !proceed {
            anyhow::bail!("aborted");
        }
        Ok(())
    } else {
        anyhow::bail!(
            "output directory {} is not empty (use --force to compose into it)",
            output_dir.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn plain_output() -> OutputConfig {
        OutputConfig { use_color: false }
    }

    #[test]
    fn test_execute_missing_manifest() {
        let args = ComposeArgs {
            config: Some(PathBuf::from("/nonexistent/.alacarte.yaml")),
            output: None,
            solution: None,
            force: false,
            quiet: true,
        };

        let result = execute(args, &plain_output());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Manifest file not found"));
    }

    #[test]
    fn test_execute_empty_manifest_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".alacarte.yaml");
        fs::write(&config_path, "repositories: []").unwrap();

        let args = ComposeArgs {
            config: Some(config_path),
            output: Some(temp_dir.path().join("workspace")),
            solution: None,
            force: false,
            quiet: true,
        };

        let result = execute(args, &plain_output());
        assert!(result.is_ok(), "{:?}", result);
        assert!(temp_dir.path().join("workspace").exists());
    }

    #[test]
    fn test_execute_invalid_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".alacarte.yaml");
        fs::write(&config_path, "solution: OnlyAName").unwrap();

        let args = ComposeArgs {
            config: Some(config_path),
            output: Some(temp_dir.path().join("workspace")),
            solution: None,
            force: false,
            quiet: true,
        };

        assert!(execute(args, &plain_output()).is_err());
    }

    #[test]
    fn test_confirm_non_empty_output_force_bypasses() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("existing.txt"), "content").unwrap();

        assert!(confirm_non_empty_output(temp_dir.path(), true).is_ok());
    }

    #[test]
    fn test_confirm_empty_output_passes() {
        let temp_dir = TempDir::new().unwrap();
        assert!(confirm_non_empty_output(temp_dir.path(), false).is_ok());
    }

    #[test]
    fn test_confirm_missing_output_passes() {
        let temp_dir = TempDir::new().unwrap();
        assert!(confirm_non_empty_output(&temp_dir.path().join("new"), false).is_ok());
    }
}
