//! Take command implementation
//!
//! The incremental counterpart to `compose`: clones one repository, copies
//! one folder into the output workspace, and folds whatever it brought in
//! into the existing solution/workspace descriptors. Safe to re-run; an
//! already-taken folder updates in place and never duplicates descriptor
//! references.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use alacarte::config::TakeRequest;
use alacarte::defaults::DEFAULT_BRANCH;
use alacarte::orchestrator::{CancelToken, Orchestrator};
use alacarte::output::{emoji, print_issues, OutputConfig};

/// Arguments for the take command
#[derive(Args, Debug)]
pub struct TakeArgs {
    /// Repository URL to take from
    #[arg(short, long, value_name = "URL")]
    pub url: String,

    /// Branch to clone
    #[arg(short, long, value_name = "BRANCH", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Folder inside the repository to take
    #[arg(short, long, value_name = "PATH")]
    pub from: String,

    /// Output workspace directory (defaults to current directory)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Solution/workspace name (defaults to the output directory name)
    #[arg(short, long, value_name = "NAME")]
    pub solution: Option<String>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the take command
pub fn execute(args: TakeArgs, output_config: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let output_dir = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let request = TakeRequest {
        url: args.url,
        branch: args.branch,
        from_path: args.from,
        output_dir,
        solution_name: args.solution,
    };

    if !args.quiet {
        println!(
            "{} Taking {} from {}@{}",
            emoji(output_config, "📦", "[TAKE]"),
            request.from_path,
            request.url,
            request.branch
        );
        println!();
    }

    let orchestrator = Orchestrator::new();
    let report = orchestrator.take(&request, &CancelToken::new());

    if !args.quiet {
        let duration = start_time.elapsed();
        if report.destination.as_os_str().is_empty() {
            println!("   nothing copied");
        } else {
            println!("   copied to: {}", report.destination.display());
        }
        match (report.is_dotnet_project, report.is_framework_project) {
            (true, true) => println!("   detected: mixed (.NET + framework)"),
            (true, false) => println!("   detected: .NET project"),
            (false, true) => println!("   detected: framework project"),
            (false, false) => println!("   detected: plain content"),
        }
        if let Some(solution) = &report.solution_path {
            println!("   solution: {}", solution.display());
        }
        if let Some(workspace) = &report.workspace_path {
            println!("   workspace: {}", workspace.display());
        }
        print_issues(output_config, &report.warnings, &report.errors);
        println!();

        if report.success() {
            println!(
                "{} Taken successfully in {:.2}s",
                emoji(output_config, "✅", "[OK]"),
                duration.as_secs_f64()
            );
        } else {
            println!("{} Take finished with errors", emoji(output_config, "❌", "[FAIL]"));
        }
    }

    if !report.success() {
        anyhow::bail!("{} error(s) recorded", report.errors.len());
    }
    Ok(())
}
