//! Per-shot pipeline steps.

mod generate;
mod inspect;
mod manifest;
mod temporal;

pub use manifest::MANIFEST_FILE;

use crate::{ProfileCatalog, ToolsConfig};
use async_trait::async_trait;
use montage_core::{Criticality, SharedRunContext, ShotRef};
use montage_error::MontageResult;
use montage_pipeline::{Step, StepOutcome};
use montage_process::ExternalInvoker;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The five steps built for every shot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ShotStepKind {
    /// Render the shot
    Generate,
    /// Smooth frame-to-frame flicker
    TemporalRegularize,
    /// Automated visual inspection
    VisionQa,
    /// Quantitative quality benchmark
    Benchmark,
    /// Structured shot description
    Manifest,
}

impl ShotStepKind {
    /// Only rendering is critical.
    pub fn criticality(self) -> Criticality {
        match self {
            ShotStepKind::Generate => Criticality::Critical,
            _ => Criticality::NonCritical,
        }
    }
}

/// Collaborators shared by every step of a run.
#[derive(derive_getters::Getters)]
pub struct StepEnvironment {
    /// External program runner
    invoker: Arc<dyn ExternalInvoker>,
    /// Tool settings
    tools: ToolsConfig,
    /// Known generation profiles
    profiles: Arc<ProfileCatalog>,
}

impl StepEnvironment {
    /// Environment from parts.
    pub fn new(
        invoker: Arc<dyn ExternalInvoker>,
        tools: ToolsConfig,
        profiles: Arc<ProfileCatalog>,
    ) -> Self {
        Self {
            invoker,
            tools,
            profiles,
        }
    }
}

/// One step of one shot.
pub struct ShotStep {
    id: String,
    description: String,
    dependencies: Vec<String>,
    kind: ShotStepKind,
    shot: ShotRef,
    env: Arc<StepEnvironment>,
}

impl ShotStep {
    /// Step of `kind` for `shot`.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        dependencies: Vec<String>,
        kind: ShotStepKind,
        shot: ShotRef,
        env: Arc<StepEnvironment>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            dependencies,
            kind,
            shot,
            env,
        }
    }
}

#[async_trait]
impl Step<SharedRunContext> for ShotStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn criticality(&self) -> Criticality {
        self.kind.criticality()
    }

    #[tracing::instrument(skip_all, fields(step = %self.id, shot = %self.shot.id()))]
    async fn run(&self, ctx: &SharedRunContext) -> MontageResult<StepOutcome> {
        let outcome = match self.kind {
            ShotStepKind::Generate => generate::run(&self.shot, &self.env, ctx).await,
            ShotStepKind::TemporalRegularize => temporal::run(&self.shot, &self.env, ctx).await,
            ShotStepKind::VisionQa => inspect::run_vision(&self.shot, &self.env, ctx).await,
            ShotStepKind::Benchmark => inspect::run_benchmark(&self.shot, &self.env, ctx).await,
            ShotStepKind::Manifest => manifest::run(&self.shot, ctx).await,
        };
        Ok(outcome)
    }
}

/// Record a degraded non-critical step and skip it.
fn degrade(ctx: &SharedRunContext, shot_id: &str, kind: ShotStepKind, reason: String) -> StepOutcome {
    tracing::warn!(shot = %shot_id, step = %kind, reason = %reason, "Step degraded");
    ctx.update(|c| c.push_warning(format!("{shot_id} {kind}: {reason}")));
    StepOutcome::Skipped(reason)
}

/// Create a step's working directory under the shot directory.
async fn work_dir(ctx: &SharedRunContext, shot_id: &str, name: &str) -> Result<PathBuf, String> {
    let dir = ctx.read(|c| c.shot_dir(shot_id)).join(name);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;
    Ok(dir)
}

/// Current video of a rendered shot.
fn rendered_video(ctx: &SharedRunContext, shot_id: &str) -> Option<PathBuf> {
    ctx.shot(shot_id)
        .filter(|s| s.has_video())
        .and_then(|s| s.video_path().clone())
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
