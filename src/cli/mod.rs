//! CLI interface for repospec.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

pub mod analyze;

pub use analyze::AnalyzeCommand;

/// repospec: infer repository conventions from git history.
#[derive(Parser)]
#[command(name = "repospec")]
#[command(about = "Infer a repository's development conventions from its git history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Analyzes a repository and outputs the inferred spec document.
    Analyze(AnalyzeCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(analyze_cmd) => {
                // Use tokio runtime for async execution
                let rt =
                    tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
                rt.block_on(analyze_cmd.execute())
            }
        }
    }
}
