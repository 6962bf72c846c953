//! Building and persisting run summaries.

use crate::{REPORT_FILE, SUMMARY_FILE, collect_shot_metrics, render_markdown, write_atomic};
use chrono::{DateTime, Utc};
use montage_core::{NarrativeRunSummary, RunContext, StepRecord};
use montage_error::{ReportError, ReportErrorKind};
use montage_qa::{QaThresholds, compute_narrative_overall_verdict, compute_shot_qa_verdict};
use std::path::{Path, PathBuf};

/// Where a summary was written.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ReportPaths {
    /// JSON summary
    summary: PathBuf,
    /// Markdown report
    report: PathBuf,
}

/// Builds [`NarrativeRunSummary`] values and writes them next to a run.
#[derive(Debug, Clone, Default)]
pub struct SummaryReporter {
    thresholds: QaThresholds,
}

impl SummaryReporter {
    /// Reporter judging shots against `thresholds`.
    pub fn new(thresholds: QaThresholds) -> Self {
        Self { thresholds }
    }

    /// Derive the summary of a finished run.
    ///
    /// Never fails: unreadable reports only leave metrics unset.
    #[tracing::instrument(skip_all, fields(narrative = %ctx.narrative_id()))]
    pub fn build(
        &self,
        ctx: &RunContext,
        steps: Vec<StepRecord>,
        finished_at: DateTime<Utc>,
    ) -> NarrativeRunSummary {
        let metrics: Vec<_> = ctx.shots().iter().map(collect_shot_metrics).collect();
        let shot_summaries = ctx
            .shots()
            .iter()
            .zip(&metrics)
            .map(|(shot, m)| compute_shot_qa_verdict(m, shot.profile_id(), &self.thresholds))
            .collect();
        let qa_summary = compute_narrative_overall_verdict(shot_summaries);

        let shot_count = ctx.shots().len();
        let successful_shots = ctx.successful_shots();
        let duration_seconds =
            (finished_at - *ctx.started_at()).num_milliseconds().max(0) as f64 / 1000.0;

        NarrativeRunSummary {
            narrative_id: ctx.narrative_id().clone(),
            title: ctx.title().clone(),
            script_path: ctx.script_path().clone(),
            output_dir: ctx.output_dir().clone(),
            status: *ctx.status(),
            started_at: *ctx.started_at(),
            finished_at,
            duration_seconds,
            shot_count,
            successful_shots,
            failed_shots: shot_count - successful_shots,
            final_video_path: ctx.final_video_path().clone(),
            shots: ctx.shots().clone(),
            metrics,
            qa_summary,
            steps,
            errors: ctx.errors().clone(),
            warnings: ctx.warnings().clone(),
        }
    }

    /// Write the JSON summary and Markdown report into `dir`.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn write(&self, summary: &NarrativeRunSummary, dir: &Path) -> Result<ReportPaths, ReportError> {
        let json = serde_json::to_vec_pretty(summary)
            .map_err(|e| ReportError::new(ReportErrorKind::Serialize(e.to_string())))?;

        let paths = ReportPaths {
            summary: dir.join(SUMMARY_FILE),
            report: dir.join(REPORT_FILE),
        };
        write_atomic(&paths.summary, &json).map_err(|e| io_error(&paths.summary, e))?;
        write_atomic(&paths.report, render_markdown(summary).as_bytes())
            .map_err(|e| io_error(&paths.report, e))?;

        tracing::info!(summary = %paths.summary.display(), "Run summary written");
        Ok(paths)
    }

    /// Write reports, downgrading any failure to a logged warning.
    pub fn publish(&self, summary: &NarrativeRunSummary, dir: &Path) -> Option<ReportPaths> {
        match self.write(summary, dir) {
            Ok(paths) => Some(paths),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to write run reports");
                None
            }
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> ReportError {
    ReportError::new(ReportErrorKind::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load a previously written summary.
pub fn load_summary(path: &Path) -> Result<NarrativeRunSummary, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| ReportError::new(ReportErrorKind::Parse(e.to_string())))
}
