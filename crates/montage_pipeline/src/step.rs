//! Step contract.

use async_trait::async_trait;
use montage_core::Criticality;
use montage_error::MontageResult;

/// How a step finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step did its work
    Succeeded,
    /// The step failed, with a reason
    Failed(String),
    /// The step had nothing to do or degraded, with a reason
    Skipped(String),
}

impl StepOutcome {
    /// Failed outcome.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Skipped outcome.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }
}

/// A named unit of work in the pipeline graph.
///
/// `run` receives the context shared by every step of one pipeline
/// invocation. Steps should be idempotent: running one twice against the
/// same context must leave it in the same state. Returning `Err` is
/// equivalent to returning [`StepOutcome::Failed`] with the error message.
#[async_trait]
pub trait Step<C>: Send + Sync
where
    C: Send + Sync,
{
    /// Unique step id.
    fn id(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Ids of the steps that must resolve first.
    fn dependencies(&self) -> &[String];

    /// Whether a failure fails the run.
    fn criticality(&self) -> Criticality {
        Criticality::NonCritical
    }

    /// Execute the step.
    async fn run(&self, ctx: &C) -> MontageResult<StepOutcome>;
}
