//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Montage - multi-shot narrative video pipelines
#[derive(Parser, Debug)]
#[command(name = "montage")]
#[command(about = "Render, inspect and assemble multi-shot narrative videos", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a narrative script
    Run(RunArgs),

    /// Check a narrative script without running anything
    Validate {
        /// Path to the narrative script JSON
        #[arg(long)]
        script: PathBuf,
    },

    /// Print the report of a finished run
    Report {
        /// Path to a narrative-run-summary.json
        #[arg(long)]
        summary: PathBuf,

        /// Print the summary JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
}

/// Arguments of `montage run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the narrative script JSON
    #[arg(long)]
    pub script: PathBuf,

    /// Root directory for run outputs
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory of generation profiles
    #[arg(long)]
    pub profiles: Option<PathBuf>,
}
