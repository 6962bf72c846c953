//! Step outcome records.

use serde::{Deserialize, Serialize};

/// Whether a step failure fails the whole run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Criticality {
    /// Failure marks the run failed
    Critical,
    /// Failure only reduces available signal
    #[default]
    NonCritical,
}

/// Final state of an executed step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StepStatus {
    /// Step did its work
    Succeeded,
    /// Step failed
    Failed,
    /// Step had nothing to do or degraded
    Skipped,
}

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Step id
    pub step_id: String,
    /// Human-readable description
    pub description: String,
    /// Criticality
    pub criticality: Criticality,
    /// Final status
    pub status: StepStatus,
    /// Failure or skip reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Wall-clock execution time in milliseconds
    pub elapsed_ms: u64,
}
