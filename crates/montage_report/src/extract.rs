//! Defensive metric extraction from tool reports.
//!
//! Report layouts differ between tool versions, so each signal is looked up
//! under several candidate keys. Missing files, malformed JSON and
//! non-numeric values all yield absent signals.

use montage_core::{ShotArtifacts, ShotMetrics};
use serde_json::Value;
use std::path::Path;

const VISION_STATUS: &[&str] = &["status", "verdict", "overall_status", "summary.status"];
const VISION_OVERALL: &[&str] = &[
    "scores.overall",
    "overall_score",
    "overallScore",
    "overall",
    "summary.overall_score",
];
const VISION_ARTIFACTS: &[&str] = &[
    "scores.artifacts",
    "artifact_score",
    "artifactScore",
    "artifact_severity",
    "artifacts",
];
const FLICKER: &[&str] = &[
    "temporal_coherence.flicker_frames",
    "temporalCoherence.flickerFrameCount",
    "flicker_frame_count",
    "flickerFrameCount",
    "flicker_frames",
];
const JITTER: &[&str] = &[
    "temporal_coherence.jitter_score",
    "temporalCoherence.jitterScore",
    "jitter_score",
    "jitterScore",
];
const IDENTITY: &[&str] = &[
    "temporal_coherence.identity_score",
    "temporalCoherence.identityScore",
    "identity_score",
    "identityScore",
];
const OVERALL_QUALITY: &[&str] = &[
    "overall_quality",
    "overallQuality",
    "quality.overall",
    "summary.overall_quality",
];
const PATH_ERROR: &[&str] = &[
    "camera_path.mean_error",
    "cameraPath.adherenceError",
    "camera_path.adherence_error",
    "path_adherence_error",
    "pathAdherenceError",
];
const PATH_DIRECTION: &[&str] = &[
    "camera_path.direction_consistency",
    "cameraPath.directionConsistency",
    "path_direction_consistency",
    "pathDirectionConsistency",
];

fn load(path: &Path) -> Option<Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Report unreadable");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Report is not valid JSON");
            None
        }
    }
}

fn lookup<'a>(root: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted.split('.').try_fold(root, |node, key| node.get(key))
}

fn number(root: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match lookup(root, key)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn text(root: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match lookup(root, key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Coarse vision status from a report, uppercased.
pub fn read_vision_status(path: &Path) -> Option<String> {
    load(path).and_then(|root| text(&root, VISION_STATUS).map(|s| s.to_ascii_uppercase()))
}

/// Fill the vision signals of `metrics` from a report.
pub fn read_vision_report(path: &Path, metrics: &mut ShotMetrics) {
    let Some(root) = load(path) else { return };
    metrics.vision_status = text(&root, VISION_STATUS).map(|s| s.to_ascii_uppercase());
    metrics.vision_overall = number(&root, VISION_OVERALL);
    metrics.vision_artifacts = number(&root, VISION_ARTIFACTS);
}

/// Fill the benchmark signals of `metrics` from a report.
pub fn read_benchmark_report(path: &Path, metrics: &mut ShotMetrics) {
    let Some(root) = load(path) else { return };
    metrics.flicker_frame_count = number(&root, FLICKER)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round().min(f64::from(u32::MAX)) as u32);
    metrics.jitter_score = number(&root, JITTER);
    metrics.identity_score = number(&root, IDENTITY);
    metrics.overall_quality = number(&root, OVERALL_QUALITY);
    metrics.path_adherence_error = number(&root, PATH_ERROR);
    metrics.path_direction_consistency = number(&root, PATH_DIRECTION);
}

/// Gather every available signal for one shot.
///
/// The vision status recorded by the vision step is kept when the report
/// itself does not carry one.
pub fn collect_shot_metrics(shot: &ShotArtifacts) -> ShotMetrics {
    let mut metrics = ShotMetrics::new(shot.shot_id().clone());
    if let Some(path) = shot.benchmark_report_path() {
        read_benchmark_report(path, &mut metrics);
    }
    if let Some(path) = shot.vision_report_path() {
        read_vision_report(path, &mut metrics);
    }
    if metrics.vision_status.is_none() {
        metrics.vision_status = shot.vision_status().clone();
    }
    metrics
}
