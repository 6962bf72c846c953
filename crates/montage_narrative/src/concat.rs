//! Final video assembly.

use crate::StepEnvironment;
use async_trait::async_trait;
use montage_core::{Criticality, SharedRunContext};
use montage_error::MontageResult;
use montage_pipeline::{Step, StepOutcome};
use montage_process::invoke_with_retry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Step id of the concatenation step.
pub const CONCATENATE_STEP_ID: &str = "concatenate";

/// Concat demuxer list written next to the final video while ffmpeg runs.
pub const CONCAT_LIST_FILE: &str = "concat-list.txt";

/// Joins every rendered shot, in script order, into one video.
///
/// A single rendered shot is copied byte for byte. Several shots are joined
/// with the concatenator's concat demuxer and stream copy, so inputs must
/// share codec parameters.
pub struct ConcatenateStep {
    dependencies: Vec<String>,
    env: Arc<StepEnvironment>,
}

impl ConcatenateStep {
    /// Step waiting on `dependencies`.
    pub fn new(dependencies: Vec<String>, env: Arc<StepEnvironment>) -> Self {
        Self { dependencies, env }
    }

    async fn join(&self, videos: &[PathBuf], final_dir: &Path, target: &Path) -> Result<(), String> {
        let list = final_dir.join(CONCAT_LIST_FILE);
        let body: String = videos
            .iter()
            .map(|video| format!("file '{}'\n", quote_concat_path(video)))
            .collect();

        let tool = self.env.tools().concatenator();
        let invocation = tool
            .invocation()
            .with_args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(list.to_string_lossy())
            .with_args(["-c", "copy"])
            .arg(target.to_string_lossy());

        with_concat_list(&list, body, || async {
            invoke_with_retry(self.env.invoker().as_ref(), &invocation, &tool.retry_policy())
                .await
                .map(|_| ())
                .map_err(|e| format!("concatenation failed: {}", e.kind))
        })
        .await?;

        if !target.is_file() {
            return Err(format!("{} produced no output at {}", tool.program(), target.display()));
        }
        Ok(())
    }
}

/// Write `body` to `list`, run `join`, then remove `list` whatever happened.
async fn with_concat_list<F, Fut>(list: &Path, body: String, join: F) -> Result<(), String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    let result = match tokio::fs::write(list, body).await {
        Ok(()) => join().await,
        Err(e) => Err(format!("cannot write {}: {}", list.display(), e)),
    };

    match tokio::fs::remove_file(list).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(list = %list.display(), error = %e, "Failed to remove concat list"),
    }
    result
}

/// Absolute path with single quotes escaped for the concat demuxer.
fn quote_concat_path(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute.to_string_lossy().replace('\'', r"'\''")
}

#[async_trait]
impl Step<SharedRunContext> for ConcatenateStep {
    fn id(&self) -> &str {
        CONCATENATE_STEP_ID
    }

    fn description(&self) -> &str {
        "Concatenate rendered shots into the final video"
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn criticality(&self) -> Criticality {
        Criticality::Critical
    }

    #[tracing::instrument(skip_all, fields(step = CONCATENATE_STEP_ID))]
    async fn run(&self, ctx: &SharedRunContext) -> MontageResult<StepOutcome> {
        let (videos, final_dir, narrative_id) = ctx.read(|c| {
            let videos: Vec<PathBuf> = c
                .shots()
                .iter()
                .filter(|s| s.has_video())
                .filter_map(|s| s.video_path().clone())
                .collect();
            (videos, c.output_dir().join("final"), c.narrative_id().clone())
        });

        let Some(first) = videos.first() else {
            return Ok(StepOutcome::failed(
                "no shots were rendered; nothing to concatenate",
            ));
        };

        if let Err(e) = tokio::fs::create_dir_all(&final_dir).await {
            return Ok(StepOutcome::failed(format!(
                "cannot create {}: {}",
                final_dir.display(),
                e
            )));
        }

        let extension = first.extension().and_then(|e| e.to_str()).unwrap_or("mp4");
        let target = final_dir.join(format!("{narrative_id}.{extension}"));

        let joined = if videos.len() == 1 {
            tokio::fs::copy(first, &target)
                .await
                .map(|_| ())
                .map_err(|e| format!("cannot copy {} to {}: {}", first.display(), target.display(), e))
        } else {
            self.join(&videos, &final_dir, &target).await
        };

        match joined {
            Ok(()) => {
                info!(video = %target.display(), shots = videos.len(), "Final video assembled");
                ctx.update(|c| c.set_final_video(target));
                Ok(StepOutcome::Succeeded)
            }
            Err(reason) => Ok(StepOutcome::Failed(reason)),
        }
    }
}
