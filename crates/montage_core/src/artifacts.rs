//! Per-shot artifact bookkeeping.

use crate::ShotRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Render status of a shot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShotStatus {
    /// Not rendered yet
    #[default]
    Pending,
    /// Rendered, a video exists
    Succeeded,
    /// Rendering failed
    Failed,
}

/// Everything a run learned about one shot.
///
/// Each field is written by exactly one step kind: the generate step owns
/// status, artifact directory and the initial video path; the temporal step
/// may repoint the video path; QA steps own their report paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct ShotArtifacts {
    /// Shot id
    shot_id: String,
    /// Generation profile id
    profile_id: String,
    /// Camera path id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    camera_path_id: Option<String>,
    /// Render status
    status: ShotStatus,
    /// Directory holding this shot's outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact_dir: Option<PathBuf>,
    /// Current video, smoothed when smoothing applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_path: Option<PathBuf>,
    /// Video as produced by the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw_video_path: Option<PathBuf>,
    /// Written shot manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manifest_path: Option<PathBuf>,
    /// Benchmark report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    benchmark_report_path: Option<PathBuf>,
    /// Vision inspection report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vision_report_path: Option<PathBuf>,
    /// Coarse status reported by vision inspection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vision_status: Option<String>,
    /// Render failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Whether temporal smoothing replaced the video
    #[serde(default)]
    smoothing_applied: bool,
}

impl ShotArtifacts {
    /// Fresh pending entry for a shot.
    pub fn pending(shot: &ShotRef) -> Self {
        Self {
            shot_id: shot.id().clone(),
            profile_id: shot.pipeline_config_id().clone(),
            camera_path_id: shot.camera_path_id().clone(),
            status: ShotStatus::Pending,
            artifact_dir: None,
            video_path: None,
            raw_video_path: None,
            manifest_path: None,
            benchmark_report_path: None,
            vision_report_path: None,
            vision_status: None,
            error: None,
            smoothing_applied: false,
        }
    }

    /// The shot rendered a usable video.
    pub fn has_video(&self) -> bool {
        self.status == ShotStatus::Succeeded && self.video_path.is_some()
    }

    /// Record a successful render.
    pub fn record_render(&mut self, artifact_dir: impl Into<PathBuf>, video: impl Into<PathBuf>) {
        let video = video.into();
        self.status = ShotStatus::Succeeded;
        self.artifact_dir = Some(artifact_dir.into());
        self.raw_video_path = Some(video.clone());
        self.video_path = Some(video);
        self.error = None;
    }

    /// Record a failed render.
    pub fn record_failure(&mut self, artifact_dir: Option<&Path>, message: impl Into<String>) {
        self.status = ShotStatus::Failed;
        self.artifact_dir = artifact_dir.map(Path::to_path_buf);
        self.error = Some(message.into());
    }

    /// Repoint the video at its smoothed version.
    pub fn record_smoothing(&mut self, smoothed: impl Into<PathBuf>) {
        self.video_path = Some(smoothed.into());
        self.smoothing_applied = true;
    }

    /// Record the vision inspection report.
    pub fn record_vision_report(&mut self, report: impl Into<PathBuf>, status: Option<String>) {
        self.vision_report_path = Some(report.into());
        self.vision_status = status;
    }

    /// Record the benchmark report.
    pub fn record_benchmark_report(&mut self, report: impl Into<PathBuf>) {
        self.benchmark_report_path = Some(report.into());
    }

    /// Record the written manifest.
    pub fn record_manifest(&mut self, manifest: impl Into<PathBuf>) {
        self.manifest_path = Some(manifest.into());
    }
}
