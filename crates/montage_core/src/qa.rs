//! Verdicts and QA summaries.

use crate::ShotMetrics;
use serde::{Deserialize, Serialize};

/// Coarse quality classification, ordered by severity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Verdict {
    /// All signals within thresholds
    #[default]
    Pass,
    /// At least one marginal signal
    Warn,
    /// At least one failing signal
    Fail,
}

/// QA outcome for one shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotQaSummary {
    /// Shot id
    pub shot_id: String,
    /// Generation profile id
    pub profile_id: String,
    /// Signals the verdict was computed from
    pub metrics: ShotMetrics,
    /// Verdict
    pub verdict: Verdict,
    /// One entry per tripped signal
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// QA outcome for a whole narrative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeQaSummary {
    /// Aggregate verdict
    pub overall_verdict: Verdict,
    /// Why the aggregate verdict was reached
    #[serde(default)]
    pub overall_reasons: Vec<String>,
    /// Per-shot summaries in script order
    #[serde(default)]
    pub shots: Vec<ShotQaSummary>,
}
