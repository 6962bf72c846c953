//! Quality signals extracted for one shot.

use serde::{Deserialize, Serialize};

/// Quality metrics for one shot. Every signal is optional: absent values
/// never trip a WARN or FAIL.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotMetrics {
    /// Shot id
    pub shot_id: String,
    /// Frames flagged as flickering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flicker_frame_count: Option<u32>,
    /// Frame-to-frame jitter score, lower is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_score: Option<f64>,
    /// Subject identity consistency, higher is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_score: Option<f64>,
    /// Overall quality score, higher is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_quality: Option<f64>,
    /// Mean camera-path adherence error, lower is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_adherence_error: Option<f64>,
    /// Camera-path direction consistency, higher is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_direction_consistency: Option<f64>,
    /// Vision inspection overall score, higher is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_overall: Option<f64>,
    /// Vision inspection artifact severity, lower is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_artifacts: Option<f64>,
    /// Coarse vision status string (PASS/WARN/FAIL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_status: Option<String>,
}

impl ShotMetrics {
    /// Empty metrics for a shot.
    pub fn new(shot_id: impl Into<String>) -> Self {
        Self {
            shot_id: shot_id.into(),
            ..Self::default()
        }
    }

    /// Whether any signal was captured.
    pub fn is_empty(&self) -> bool {
        self.flicker_frame_count.is_none()
            && self.jitter_score.is_none()
            && self.identity_score.is_none()
            && self.overall_quality.is_none()
            && self.path_adherence_error.is_none()
            && self.path_direction_consistency.is_none()
            && self.vision_overall.is_none()
            && self.vision_artifacts.is_none()
            && self.vision_status.is_none()
    }
}
