//! Human-readable run report.

use montage_core::{NarrativeRunSummary, StepStatus, Verdict};
use std::fmt::Write;

fn badge(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "✅ PASS",
        Verdict::Warn => "⚠️ WARN",
        Verdict::Fail => "❌ FAIL",
    }
}

fn cell<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

fn score(value: Option<f64>) -> String {
    cell(value.map(|v| format!("{v:.1}")))
}

/// Render a summary as Markdown.
pub fn render_markdown(summary: &NarrativeRunSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, summary);
    out
}

fn write_report(out: &mut String, s: &NarrativeRunSummary) -> std::fmt::Result {
    let title = s.title.as_deref().unwrap_or(&s.narrative_id);
    writeln!(out, "# Narrative run: {title}")?;
    writeln!(out)?;
    writeln!(out, "- **Narrative:** `{}`", s.narrative_id)?;
    writeln!(out, "- **Status:** {}", s.status)?;
    writeln!(out, "- **QA verdict:** {}", badge(s.qa_summary.overall_verdict))?;
    writeln!(
        out,
        "- **Shots:** {} total, {} rendered, {} failed",
        s.shot_count, s.successful_shots, s.failed_shots
    )?;
    writeln!(out, "- **Started:** {}", s.started_at.to_rfc3339())?;
    writeln!(out, "- **Duration:** {:.1}s", s.duration_seconds)?;
    if let Some(path) = &s.final_video_path {
        writeln!(out, "- **Final video:** `{}`", path.display())?;
    }
    writeln!(out)?;

    writeln!(out, "## QA summary")?;
    writeln!(out)?;
    for reason in &s.qa_summary.overall_reasons {
        writeln!(out, "- {reason}")?;
    }
    writeln!(out)?;

    if !s.qa_summary.shots.is_empty() {
        writeln!(out, "| Shot | Profile | Verdict | Reasons |")?;
        writeln!(out, "|---|---|---|---|")?;
        for shot in &s.qa_summary.shots {
            let reasons = if shot.reasons.is_empty() {
                "—".to_string()
            } else {
                shot.reasons.join("; ")
            };
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                shot.shot_id,
                shot.profile_id,
                badge(shot.verdict),
                reasons
            )?;
        }
        writeln!(out)?;

        writeln!(out, "## Metrics")?;
        writeln!(out)?;
        writeln!(
            out,
            "| Shot | Vision | Overall | Artifacts | Flicker | Jitter | Identity | Quality | Path error | Direction |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|---|---|---|---|")?;
        for m in &s.metrics {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                m.shot_id,
                cell(m.vision_status.as_deref()),
                score(m.vision_overall),
                score(m.vision_artifacts),
                cell(m.flicker_frame_count),
                score(m.jitter_score),
                score(m.identity_score),
                score(m.overall_quality),
                cell(m.path_adherence_error.map(|v| format!("{v:.3}"))),
                cell(m.path_direction_consistency.map(|v| format!("{v:.3}"))),
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Artifacts")?;
    writeln!(out)?;
    for shot in &s.shots {
        writeln!(out, "### {} ({})", shot.shot_id(), shot.status())?;
        let paths = [
            ("video", shot.video_path()),
            ("manifest", shot.manifest_path()),
            ("benchmark", shot.benchmark_report_path()),
            ("vision", shot.vision_report_path()),
        ];
        for (label, path) in paths {
            if let Some(path) = path {
                writeln!(out, "- {label}: `{}`", path.display())?;
            }
        }
        if *shot.smoothing_applied() {
            writeln!(out, "- temporal smoothing applied")?;
        }
        if let Some(error) = shot.error() {
            writeln!(out, "- error: {error}")?;
        }
        writeln!(out)?;
    }

    let troubled: Vec<_> = s
        .steps
        .iter()
        .filter(|r| r.status != StepStatus::Succeeded)
        .collect();
    if !troubled.is_empty() {
        writeln!(out, "## Skipped and failed steps")?;
        writeln!(out)?;
        writeln!(out, "| Step | Status | Reason |")?;
        writeln!(out, "|---|---|---|")?;
        for record in troubled {
            writeln!(
                out,
                "| {} | {} | {} |",
                record.step_id,
                record.status,
                record.reason.as_deref().unwrap_or("—")
            )?;
        }
        writeln!(out)?;
    }

    if !s.errors.is_empty() {
        writeln!(out, "## Errors")?;
        writeln!(out)?;
        for error in &s.errors {
            writeln!(out, "- {error}")?;
        }
    }
    Ok(())
}
