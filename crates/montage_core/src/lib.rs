//! Core data model for Montage.
//!
//! This crate holds the types shared by every stage of a narrative run:
//! - [`NarrativeScript`] and [`ShotRef`]: the declarative shot list
//! - [`RunContext`] and [`SharedRunContext`]: mutable state for one run
//! - [`ShotMetrics`], [`Verdict`] and the QA summaries
//! - [`NarrativeRunSummary`]: the only persisted artifact of a run

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifacts;
mod context;
mod metrics;
mod qa;
mod script;
mod step;
mod summary;

pub use artifacts::{ShotArtifacts, ShotStatus};
pub use context::{RunContext, RunStatus, SharedRunContext};
pub use metrics::ShotMetrics;
pub use qa::{NarrativeQaSummary, ShotQaSummary, Verdict};
pub use script::{NarrativeScript, ShotRef, ShotRefBuilder, TemporalMode};
pub use step::{Criticality, StepRecord, StepStatus};
pub use summary::NarrativeRunSummary;
