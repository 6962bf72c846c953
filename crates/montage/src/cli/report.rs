//! Report rendering command handler.

use montage::{JsonError, MontageResult, RunStatus, load_summary, render_markdown};
use std::path::Path;
use std::process::ExitCode;

/// Print a stored run summary as Markdown or JSON.
///
/// The exit code mirrors the stored run status.
pub fn render_report(summary: &Path, json: bool) -> MontageResult<ExitCode> {
    let summary = load_summary(summary)?;

    if json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| JsonError::new(format!("Failed to serialize summary: {}", e)))?;
        println!("{text}");
    } else {
        print!("{}", render_markdown(&summary));
    }

    Ok(if summary.status == RunStatus::Succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
