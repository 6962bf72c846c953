//! Persisted run summary.

use crate::{NarrativeQaSummary, RunStatus, ShotArtifacts, ShotMetrics, StepRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a run produced, derived once from the final [`crate::RunContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRunSummary {
    /// Narrative id
    pub narrative_id: String,
    /// Narrative title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Script the run was started from
    pub script_path: PathBuf,
    /// Run output directory
    pub output_dir: PathBuf,
    /// Final run status
    pub status: RunStatus,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    pub finished_at: DateTime<Utc>,
    /// Wall-clock duration
    pub duration_seconds: f64,
    /// Number of shots in the script
    pub shot_count: usize,
    /// Shots that rendered a video
    pub successful_shots: usize,
    /// Shots whose render failed or never happened
    pub failed_shots: usize,
    /// Concatenated artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_video_path: Option<PathBuf>,
    /// Per-shot artifacts in script order
    #[serde(default)]
    pub shots: Vec<ShotArtifacts>,
    /// Per-shot metrics in script order
    #[serde(default)]
    pub metrics: Vec<ShotMetrics>,
    /// QA verdicts
    pub qa_summary: NarrativeQaSummary,
    /// Executed steps in completion order
    #[serde(default)]
    pub steps: Vec<StepRecord>,
    /// Critical error messages
    #[serde(default)]
    pub errors: Vec<String>,
    /// Degraded-step messages
    #[serde(default)]
    pub warnings: Vec<String>,
}
