//! Montage CLI binary.
//!
//! - Run a narrative script end to end
//! - Validate a script and print its step plan
//! - Re-render the report of a finished run

use clap::Parser;
use montage::{ObservabilityConfig, init_observability_with_config};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, render_report, run_narrative, validate_script};

    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let mut observability = ObservabilityConfig::new().with_json_logs(cli.json_logs);
    if std::env::var("RUST_LOG").is_err() {
        observability = observability.with_log_level(level);
    }
    init_observability_with_config(observability)?;

    let code = match cli.command {
        Commands::Run(args) => run_narrative(&args, cli.config.as_deref()).await?,
        Commands::Validate { script } => validate_script(&script, cli.config.as_deref())?,
        Commands::Report { summary, json } => render_report(&summary, json)?,
    };

    Ok(code)
}
