//! Shot manifests.

use super::{ShotStepKind, degrade};
use chrono::{DateTime, Utc};
use montage_core::{SharedRunContext, ShotRef, TemporalMode};
use montage_pipeline::StepOutcome;
use montage_report::write_atomic;
use serde::Serialize;
use std::path::PathBuf;

/// File name of a shot manifest inside the shot directory.
pub const MANIFEST_FILE: &str = "shot-manifest.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShotManifest<'a> {
    narrative_id: String,
    shot_id: &'a str,
    profile_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    camera_path_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_id: Option<&'a str>,
    temporal_regularization: TemporalMode,
    video_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact_dir: Option<PathBuf>,
    generated_at: DateTime<Utc>,
}

pub(super) async fn run(shot: &ShotRef, ctx: &SharedRunContext) -> StepOutcome {
    let (narrative_id, shot_dir, artifacts) =
        ctx.read(|c| (c.narrative_id().clone(), c.shot_dir(shot.id()), c.shot(shot.id()).cloned()));

    let Some(artifacts) = artifacts.filter(|s| s.has_video()) else {
        return StepOutcome::skipped("shot was not rendered");
    };
    let Some(video_path) = artifacts.raw_video_path().clone() else {
        return StepOutcome::skipped("shot was not rendered");
    };

    let manifest = ShotManifest {
        narrative_id,
        shot_id: shot.id(),
        profile_id: shot.pipeline_config_id(),
        camera_path_id: shot.camera_path_id().as_deref(),
        duration_seconds: *shot.duration_seconds(),
        sample_id: shot.sample_id().as_deref(),
        temporal_regularization: shot.temporal_mode(),
        video_path,
        artifact_dir: artifacts.artifact_dir().clone(),
        generated_at: Utc::now(),
    };

    let path = shot_dir.join(MANIFEST_FILE);
    let written = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| e.to_string())
        .and_then(|json| write_atomic(&path, &json).map_err(|e| e.to_string()));

    match written {
        Ok(()) => {
            ctx.update_shot(shot.id(), |s| s.record_manifest(path));
            StepOutcome::Succeeded
        }
        Err(e) => degrade(
            ctx,
            shot.id(),
            ShotStepKind::Manifest,
            format!("cannot write manifest: {e}"),
        ),
    }
}
