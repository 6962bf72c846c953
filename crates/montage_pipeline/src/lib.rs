//! Dependency-graph step execution.
//!
//! A pipeline is a list of [`Step`]s, each naming the ids it depends on.
//! [`PipelineOrchestrator`] validates the graph up front (duplicate ids,
//! unknown dependencies, cycles) and then runs every step exactly once,
//! as soon as all of its dependencies have resolved. Independent steps run
//! concurrently.
//!
//! A dependency that failed or skipped does not block its dependents; a step
//! that needs an upstream artifact checks for it in the shared context.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod graph;
mod orchestrator;
mod step;

pub use graph::StepGraph;
pub use orchestrator::{PipelineOrchestrator, PipelineRun};
pub use step::{Step, StepOutcome};
