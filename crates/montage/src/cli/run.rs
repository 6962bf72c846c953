//! Narrative execution command handler.

use super::RunArgs;
use montage::{MontageConfig, MontageResult, NarrativeRunner, RunOutcome};
use std::path::Path;
use std::process::ExitCode;

/// Run a narrative script and print where its results went.
///
/// Exits non-zero when the run ends failed.
pub async fn run_narrative(args: &RunArgs, config: Option<&Path>) -> MontageResult<ExitCode> {
    let mut config = MontageConfig::load(config)?;
    if let Some(output) = &args.output {
        config = config.with_output_root(output);
    }
    if let Some(profiles) = &args.profiles {
        config = config.with_profiles_dir(profiles);
    }

    tracing::info!(
        script = %args.script.display(),
        output_root = %config.output().root().display(),
        "Running narrative"
    );
    let runner = NarrativeRunner::from_config(config)?;
    let outcome = runner.run(&args.script).await?;
    print_outcome(&outcome);

    Ok(if outcome.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_outcome(outcome: &RunOutcome) {
    let summary = outcome.summary();
    println!("Narrative:   {}", summary.narrative_id);
    println!("Status:      {}", summary.status);
    println!(
        "Shots:       {}/{} rendered",
        summary.successful_shots, summary.shot_count
    );
    println!("QA verdict:  {}", summary.qa_summary.overall_verdict);
    match &summary.final_video_path {
        Some(path) => println!("Final video: {}", path.display()),
        None => println!("Final video: none"),
    }
    match outcome.reports() {
        Some(reports) => {
            println!("Summary:     {}", reports.summary().display());
            println!("Report:      {}", reports.report().display());
        }
        None => println!("Reports:     not written (see log)"),
    }
    for error in &summary.errors {
        println!("Error:       {error}");
    }
}
