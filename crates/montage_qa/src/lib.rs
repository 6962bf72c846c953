//! QA verdict engine.
//!
//! Pure functions that classify each shot from its [`ShotMetrics`] against
//! [`QaThresholds`] and aggregate the shot verdicts for a narrative.
//!
//! Every signal has a FAIL threshold and a WARN level on the side nearer
//! PASS. Absent or non-finite signals are ignored.
//!
//! [`ShotMetrics`]: montage_core::ShotMetrics

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod thresholds;
mod verdict;

pub use thresholds::{QaThresholds, QaThresholdsBuilder};
pub use verdict::{
    Polarity, classify, compute_narrative_overall_verdict, compute_shot_qa_verdict,
};
