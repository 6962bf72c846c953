//! End-to-end narrative runs.

use crate::{MontageConfig, ProfileCatalog, ScriptLoader, ShotStepFactory, StepEnvironment};
use chrono::Utc;
use montage_core::{
    Criticality, NarrativeRunSummary, NarrativeScript, RunContext, SharedRunContext, StepStatus,
};
use montage_error::{MontageResult, ReportError, ReportErrorKind};
use montage_pipeline::PipelineOrchestrator;
use montage_process::{ExternalInvoker, TokioProcessInvoker};
use montage_report::{ReportPaths, SummaryReporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a finished narrative run.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct RunOutcome {
    /// Derived run summary
    summary: NarrativeRunSummary,
    /// Written report files, `None` when reporting failed
    reports: Option<ReportPaths>,
}

impl RunOutcome {
    /// Whether the run ended successfully.
    pub fn succeeded(&self) -> bool {
        self.summary.status == montage_core::RunStatus::Succeeded
    }
}

/// Loads a script, runs its step graph and publishes the summary.
///
/// # Examples
///
/// ```no_run
/// use montage_narrative::{MontageConfig, NarrativeRunner};
/// use std::path::Path;
///
/// # async fn example() -> montage_error::MontageResult<()> {
/// let config = MontageConfig::load(None)?;
/// let runner = NarrativeRunner::from_config(config)?;
/// let outcome = runner.run(Path::new("scripts/opening.json")).await?;
/// println!("{}", outcome.summary().status);
/// # Ok(())
/// # }
/// ```
pub struct NarrativeRunner {
    config: MontageConfig,
    env: Arc<StepEnvironment>,
    reporter: SummaryReporter,
}

impl NarrativeRunner {
    /// Runner over explicit collaborators.
    pub fn new(
        config: MontageConfig,
        invoker: Arc<dyn ExternalInvoker>,
        profiles: ProfileCatalog,
    ) -> Self {
        let env = Arc::new(StepEnvironment::new(
            invoker,
            config.tools().clone(),
            Arc::new(profiles),
        ));
        let reporter = SummaryReporter::new(config.qa().clone());
        Self {
            config,
            env,
            reporter,
        }
    }

    /// Runner spawning real processes, with profiles read from the
    /// configured directory.
    pub fn from_config(config: MontageConfig) -> MontageResult<Self> {
        let profiles = ProfileCatalog::from_dir(config.profiles().dir())?;
        Ok(Self::new(config, Arc::new(TokioProcessInvoker::new()), profiles))
    }

    /// Active configuration.
    pub fn config(&self) -> &MontageConfig {
        &self.config
    }

    /// Load and validate a script against the profile catalog.
    pub fn load_script(&self, path: &Path) -> MontageResult<NarrativeScript> {
        ScriptLoader::new(self.env.profiles()).load(path)
    }

    /// Load `script_path` and run it.
    ///
    /// Script errors are returned before any directory is created or any
    /// process spawned.
    pub async fn run(&self, script_path: &Path) -> MontageResult<RunOutcome> {
        let script = self.load_script(script_path)?;
        self.run_script(&script, script_path).await
    }

    /// Run a script.
    ///
    /// The script is validated again before its id is used as a directory.
    /// Past that, only failing to create the run directory is an error.
    /// Every other failure ends up in the returned summary.
    #[tracing::instrument(skip_all, fields(narrative = %script.id(), shots = script.shots().len()))]
    pub async fn run_script(
        &self,
        script: &NarrativeScript,
        script_path: &Path,
    ) -> MontageResult<RunOutcome> {
        ScriptLoader::new(self.env.profiles()).validate(script)?;
        let output_dir = self.run_dir(script);
        tokio::fs::create_dir_all(&output_dir).await.map_err(|e| {
            ReportError::new(ReportErrorKind::Io {
                path: output_dir.display().to_string(),
                message: e.to_string(),
            })
        })?;
        info!(output_dir = %output_dir.display(), "Starting narrative run");

        let ctx = SharedRunContext::new(RunContext::new(script, script_path, &output_dir));
        let factory = ShotStepFactory::new(Arc::clone(&self.env), self.config.pipeline().clone());
        let steps = factory.build(script);

        let mut orchestrator = PipelineOrchestrator::new();
        if *self.config.pipeline().max_concurrent_steps() > 0 {
            orchestrator =
                orchestrator.with_max_concurrency(*self.config.pipeline().max_concurrent_steps());
        }

        let records = match orchestrator.run(&steps, &ctx).await {
            Ok(run) => {
                ctx.update(|c| {
                    for record in run.records() {
                        if record.criticality == Criticality::Critical
                            && record.status == StepStatus::Failed
                        {
                            let reason = record.reason.as_deref().unwrap_or("failed");
                            c.push_error(format!("{}: {}", record.step_id, reason));
                        }
                    }
                    c.set_status(*run.status());
                });
                run.into_records()
            }
            Err(e) => {
                error!(error = %e, "Step graph rejected");
                ctx.update(|c| c.fail(e.to_string()));
                Vec::new()
            }
        };

        let context = ctx.into_inner();
        let summary = self.reporter.build(&context, records, Utc::now());
        let reports = self.reporter.publish(&summary, &output_dir);

        if summary.status == montage_core::RunStatus::Succeeded {
            info!(
                successful = summary.successful_shots,
                verdict = %summary.qa_summary.overall_verdict,
                "Narrative run succeeded"
            );
        } else {
            warn!(
                successful = summary.successful_shots,
                failed = summary.failed_shots,
                errors = summary.errors.len(),
                "Narrative run failed"
            );
        }

        Ok(RunOutcome { summary, reports })
    }

    fn run_dir(&self, script: &NarrativeScript) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
        self.config.output().root().join(script.id()).join(stamp)
    }
}
