//! Multi-shot narrative runs for Montage.
//!
//! A [`NarrativeRunner`] loads a [`NarrativeScript`](montage_core::NarrativeScript),
//! plans five steps per shot plus a final concatenation through
//! [`ShotStepFactory`], drives them with the pipeline orchestrator and
//! publishes the run summary.
//!
//! ```text
//! shot A: generate ─┬─ temporal-regularize ─┐
//!                   ├─ vision-qa            │
//!                   ├─ benchmark            │
//!                   └─ manifest             │
//! shot B: generate (after all of A) ...     ├─ concatenate
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod concat;
mod config;
mod factory;
mod loader;
mod profile;
mod runner;
mod steps;

pub use concat::{CONCAT_LIST_FILE, CONCATENATE_STEP_ID, ConcatenateStep};
pub use config::{
    MontageConfig, MontageConfigBuilder, OutputConfig, PipelineConfig, ProfilesConfig, ToolConfig,
    ToolsConfig,
};
pub use factory::{ShotStepDescriptor, ShotStepFactory, StepKind, shot_step_id};
pub use loader::ScriptLoader;
pub use profile::{GenerationProfile, ProfileCatalog};
pub use runner::{NarrativeRunner, RunOutcome};
pub use steps::{MANIFEST_FILE, ShotStep, ShotStepKind, StepEnvironment};
