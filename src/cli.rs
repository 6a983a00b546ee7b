//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use alacarte::output::OutputConfig;

/// Alacarte - Compose local workspaces from folders of remote repositories
#[derive(Parser, Debug)]
#[command(name = "alacarte")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a workspace from the repositories listed in a manifest
    Compose(commands::compose::ComposeArgs),

    /// Take one folder from a repository into an existing workspace
    Take(commands::take::TakeArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Compose(args) => commands::compose::execute(args, &output),
            Commands::Take(args) => commands::take::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
