//! Temporal regularization.

use super::{ShotStepKind, StepEnvironment, degrade, lossy, work_dir};
use montage_core::{SharedRunContext, ShotRef, TemporalMode};
use montage_pipeline::StepOutcome;
use montage_process::{OutputDiscovery, invoke_with_retry};

const KIND: ShotStepKind = ShotStepKind::TemporalRegularize;

pub(super) async fn run(
    shot: &ShotRef,
    env: &StepEnvironment,
    ctx: &SharedRunContext,
) -> StepOutcome {
    match shot.temporal_mode() {
        TemporalMode::Off => return StepOutcome::skipped("temporal regularization is off"),
        TemporalMode::Auto if !env.profiles().recommends_smoothing(shot.pipeline_config_id()) => {
            return StepOutcome::skipped(format!(
                "profile '{}' does not recommend temporal regularization",
                shot.pipeline_config_id()
            ));
        }
        _ => {}
    }

    let Some(current) = ctx.shot(shot.id()).filter(|s| s.has_video()) else {
        return StepOutcome::skipped("no rendered video to smooth");
    };
    if *current.smoothing_applied() {
        return StepOutcome::Succeeded;
    }
    let Some(input) = current.raw_video_path().clone() else {
        return StepOutcome::skipped("no rendered video to smooth");
    };

    let dir = match work_dir(ctx, shot.id(), "temporal").await {
        Ok(dir) => dir,
        Err(reason) => return degrade(ctx, shot.id(), KIND, reason),
    };

    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("video");
    let extension = input.extension().and_then(|e| e.to_str()).unwrap_or("mp4");
    let target = dir.join(format!("{stem}_smoothed.{extension}"));

    let tool = env.tools().smoother();
    let invocation = tool
        .invocation()
        .arg("--input")
        .arg(lossy(&input))
        .arg("--output")
        .arg(lossy(&target));

    let output = match invoke_with_retry(env.invoker().as_ref(), &invocation, &tool.retry_policy()).await
    {
        Ok(output) => output,
        Err(e) => return degrade(ctx, shot.id(), KIND, format!("smoothing failed: {}", e.kind)),
    };

    let smoothed = if target.is_file() {
        Some(target)
    } else {
        OutputDiscovery::videos().discover_within(output.stdout(), &dir)
    };

    match smoothed {
        Some(path) => {
            tracing::info!(shot = %shot.id(), video = %path.display(), "Shot smoothed");
            ctx.update_shot(shot.id(), |s| s.record_smoothing(path));
            StepOutcome::Succeeded
        }
        None => degrade(
            ctx,
            shot.id(),
            KIND,
            format!("{} produced no video", tool.program()),
        ),
    }
}
