//! Topological step executor.

use crate::{Step, StepGraph, StepOutcome};
use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use montage_core::{Criticality, RunStatus, StepRecord, StepStatus};
use montage_error::MontageResult;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Result of executing every step of a pipeline.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct PipelineRun {
    /// One record per step, in completion order
    records: Vec<StepRecord>,
    /// Failed when any critical step failed
    status: RunStatus,
}

impl PipelineRun {
    /// Record for a step id.
    pub fn record(&self, step_id: &str) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.step_id == step_id)
    }

    /// Consume into the records.
    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}

/// Runs a step graph against a shared context.
///
/// All steps are driven from the calling task; concurrency comes from
/// polling several step futures at once, so the only suspension points are
/// the ones inside the steps themselves.
///
/// # Examples
///
/// ```
/// use montage_pipeline::PipelineOrchestrator;
///
/// let orchestrator = PipelineOrchestrator::new().with_max_concurrency(4);
/// assert_eq!(orchestrator.max_concurrency(), Some(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineOrchestrator {
    max_concurrency: Option<usize>,
}

impl PipelineOrchestrator {
    /// Orchestrator without a concurrency cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of steps in flight. Zero is treated as one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    /// Configured concurrency cap.
    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Validate the graph without running anything.
    pub fn validate<C>(&self, steps: &[Arc<dyn Step<C>>]) -> MontageResult<StepGraph>
    where
        C: Send + Sync,
    {
        let graph = StepGraph::build(steps.iter().map(|s| (s.id(), s.dependencies())))?;
        Ok(graph)
    }

    /// Execute every step exactly once.
    ///
    /// # Errors
    ///
    /// Returns a pipeline error, before any step runs, when the graph has
    /// duplicate ids, unknown dependencies or a cycle. Step failures are
    /// reported in the returned [`PipelineRun`], never as an error.
    #[tracing::instrument(skip_all, fields(steps = steps.len()))]
    pub async fn run<C>(&self, steps: &[Arc<dyn Step<C>>], ctx: &C) -> MontageResult<PipelineRun>
    where
        C: Send + Sync,
    {
        let graph = self.validate(steps)?;
        let limit = self.max_concurrency.unwrap_or(usize::MAX);

        let mut remaining = graph.dependency_counts().clone();
        let mut ready: VecDeque<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(index, _)| index)
            .collect();
        let mut in_flight = FuturesUnordered::new();
        let mut records = Vec::with_capacity(steps.len());
        let mut status = RunStatus::Succeeded;

        loop {
            while in_flight.len() < limit {
                let Some(index) = ready.pop_front() else {
                    break;
                };
                let step = &steps[index];
                tracing::debug!(step = %step.id(), "Starting step");
                in_flight.push(async move {
                    let started = Instant::now();
                    let result = AssertUnwindSafe(step.run(ctx)).catch_unwind().await;
                    (index, result, started.elapsed())
                });
            }

            let Some((index, result, elapsed)) = in_flight.next().await else {
                break;
            };

            let step = &steps[index];
            let (step_status, reason) = match result {
                Ok(Ok(StepOutcome::Succeeded)) => (StepStatus::Succeeded, None),
                Ok(Ok(StepOutcome::Failed(reason))) => (StepStatus::Failed, Some(reason)),
                Ok(Ok(StepOutcome::Skipped(reason))) => (StepStatus::Skipped, Some(reason)),
                Ok(Err(e)) => (StepStatus::Failed, Some(e.to_string())),
                Err(payload) => (StepStatus::Failed, Some(panic_message(payload.as_ref()))),
            };

            let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            match step_status {
                StepStatus::Succeeded => {
                    tracing::info!(step = %step.id(), elapsed_ms, "Step succeeded");
                }
                StepStatus::Skipped => {
                    tracing::info!(step = %step.id(), reason = ?reason, "Step skipped");
                }
                StepStatus::Failed => {
                    if step.criticality() == Criticality::Critical {
                        tracing::error!(step = %step.id(), reason = ?reason, "Critical step failed");
                        status = RunStatus::Failed;
                    } else {
                        tracing::warn!(step = %step.id(), reason = ?reason, "Step failed");
                    }
                }
            }

            records.push(StepRecord {
                step_id: step.id().to_string(),
                description: step.description().to_string(),
                criticality: step.criticality(),
                status: step_status,
                reason,
                elapsed_ms,
            });

            for &dependent in &graph.dependents()[index] {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        debug_assert_eq!(records.len(), steps.len());
        tracing::info!(status = %status, steps = records.len(), "Pipeline finished");

        Ok(PipelineRun { records, status })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("step panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("step panicked: {}", message)
    } else {
        "step panicked".to_string()
    }
}
