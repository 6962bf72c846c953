//! Shot rendering.

use super::{StepEnvironment, lossy, work_dir};
use montage_core::{SharedRunContext, ShotRef};
use montage_error::ProcessErrorKind;
use montage_pipeline::StepOutcome;
use montage_process::{OutputDiscovery, invoke_with_retry};

pub(super) async fn run(
    shot: &ShotRef,
    env: &StepEnvironment,
    ctx: &SharedRunContext,
) -> StepOutcome {
    let fail = |dir: Option<&std::path::Path>, message: String| {
        ctx.update_shot(shot.id(), |s| s.record_failure(dir, message.clone()));
        StepOutcome::Failed(message)
    };

    let dir = match work_dir(ctx, shot.id(), "render").await {
        Ok(dir) => dir,
        Err(message) => return fail(None, message),
    };

    let tool = env.tools().renderer();
    let invocation = tool
        .invocation()
        .arg("--profile")
        .arg(shot.pipeline_config_id())
        .arg("--shot-id")
        .arg(shot.id())
        .arg("--output-dir")
        .arg(lossy(&dir))
        .optional_arg("--camera-path", shot.camera_path_id().as_deref())
        .optional_arg("--sample", shot.sample_id().as_deref())
        .optional_arg("--duration", *shot.duration_seconds());

    let output = match invoke_with_retry(env.invoker().as_ref(), &invocation, &tool.retry_policy()).await
    {
        Ok(output) => output,
        Err(e) => return fail(Some(&dir), e.kind.to_string()),
    };

    match OutputDiscovery::videos().discover_within(output.stdout(), &dir) {
        Some(video) => {
            tracing::info!(shot = %shot.id(), video = %video.display(), "Shot rendered");
            ctx.update_shot(shot.id(), |s| s.record_render(dir.clone(), video));
            StepOutcome::Succeeded
        }
        None => {
            let kind = ProcessErrorKind::OutputNotFound {
                program: tool.program().clone(),
                location: dir.display().to_string(),
            };
            fail(Some(&dir), kind.to_string())
        }
    }
}
