//! Vision QA and benchmark steps.
//!
//! Both tools write a JSON report into a directory. A report that exists is
//! used even when the tool exits non-zero, since QA tools commonly signal a
//! failing video through their exit code.

use super::{ShotStepKind, StepEnvironment, degrade, lossy, rendered_video, work_dir};
use crate::ToolConfig;
use montage_core::{SharedRunContext, ShotRef};
use montage_pipeline::StepOutcome;
use montage_process::{Invocation, OutputDiscovery, invoke_with_retry};
use montage_report::read_vision_status;
use std::path::{Path, PathBuf};

async fn run_report_tool(
    env: &StepEnvironment,
    tool: &ToolConfig,
    invocation: &Invocation,
    dir: &Path,
) -> Result<PathBuf, String> {
    let outcome = invoke_with_retry(env.invoker().as_ref(), invocation, &tool.retry_policy()).await;
    let stdout = outcome.as_ref().map(|o| o.stdout().as_str()).unwrap_or_default();
    let report = OutputDiscovery::json_reports().discover_within(stdout, dir);

    match (outcome, report) {
        (Ok(_), Some(report)) => Ok(report),
        (Err(e), Some(report)) => {
            tracing::debug!(error = %e, "Tool failed but left a report");
            Ok(report)
        }
        (Ok(_), None) => Err(format!("{} produced no report in {}", tool.program(), dir.display())),
        (Err(e), None) => Err(e.kind.to_string()),
    }
}

pub(super) async fn run_vision(
    shot: &ShotRef,
    env: &StepEnvironment,
    ctx: &SharedRunContext,
) -> StepOutcome {
    const KIND: ShotStepKind = ShotStepKind::VisionQa;

    let Some(video) = rendered_video(ctx, shot.id()) else {
        return StepOutcome::skipped("no rendered video to inspect");
    };
    let dir = match work_dir(ctx, shot.id(), "vision").await {
        Ok(dir) => dir,
        Err(reason) => return degrade(ctx, shot.id(), KIND, reason),
    };

    let tool = env.tools().inspector();
    let invocation = tool
        .invocation()
        .arg("--video")
        .arg(lossy(&video))
        .arg("--output-dir")
        .arg(lossy(&dir));

    match run_report_tool(env, tool, &invocation, &dir).await {
        Ok(report) => {
            let status = read_vision_status(&report);
            tracing::info!(shot = %shot.id(), status = ?status, "Vision QA report recorded");
            ctx.update_shot(shot.id(), |s| s.record_vision_report(report, status));
            StepOutcome::Succeeded
        }
        Err(reason) => degrade(ctx, shot.id(), KIND, reason),
    }
}

pub(super) async fn run_benchmark(
    shot: &ShotRef,
    env: &StepEnvironment,
    ctx: &SharedRunContext,
) -> StepOutcome {
    const KIND: ShotStepKind = ShotStepKind::Benchmark;

    let Some(video) = rendered_video(ctx, shot.id()) else {
        return StepOutcome::skipped("no rendered video to benchmark");
    };
    let dir = match work_dir(ctx, shot.id(), "benchmark").await {
        Ok(dir) => dir,
        Err(reason) => return degrade(ctx, shot.id(), KIND, reason),
    };

    let tool = env.tools().benchmark();
    let invocation = tool
        .invocation()
        .arg("--video")
        .arg(lossy(&video))
        .arg("--profile")
        .arg(shot.pipeline_config_id())
        .arg("--output-dir")
        .arg(lossy(&dir))
        .optional_arg("--camera-path", shot.camera_path_id().as_deref());

    match run_report_tool(env, tool, &invocation, &dir).await {
        Ok(report) => {
            tracing::info!(shot = %shot.id(), report = %report.display(), "Benchmark report recorded");
            ctx.update_shot(shot.id(), |s| s.record_benchmark_report(report));
            StepOutcome::Succeeded
        }
        Err(reason) => degrade(ctx, shot.id(), KIND, reason),
    }
}
