//! Step topology for a narrative script.
//!
//! Every shot gets five steps. Rendering is serialized across shots: a
//! shot's `generate` waits for the post-processing of the previous shot and
//! of every shot it names in `dependsOn`. The four post-processing steps of a
//! shot depend only on its own `generate`, except that with
//! `inspect_after_smoothing` vision QA and benchmark also wait on temporal
//! regularization. Concatenation waits on every shot's temporal step.
//!
//! Without `inspect_after_smoothing`, vision QA and benchmark race smoothing
//! and in practice inspect the raw render.

use crate::concat::{CONCATENATE_STEP_ID, ConcatenateStep};
use crate::{PipelineConfig, ShotStep, ShotStepKind, StepEnvironment};
use montage_core::{NarrativeScript, SharedRunContext, ShotRef};
use montage_pipeline::Step;
use std::sync::Arc;

/// What a planned step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// A per-shot step
    Shot(ShotStepKind),
    /// The final concatenation
    Concatenate,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Shot(kind) => write!(f, "{kind}"),
            StepKind::Concatenate => f.write_str(CONCATENATE_STEP_ID),
        }
    }
}

/// A planned step, before it is bound to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ShotStepDescriptor {
    /// Step id
    id: String,
    /// What the step does
    kind: StepKind,
    /// Owning shot, `None` for concatenation
    shot_id: Option<String>,
    /// Ids of steps that must finish first
    dependencies: Vec<String>,
    /// Human-readable description
    description: String,
}

/// Step id for `kind` of `shot_id`.
pub fn shot_step_id(shot_id: &str, kind: ShotStepKind) -> String {
    format!("{shot_id}:{kind}")
}

const POST_STEPS: [ShotStepKind; 4] = [
    ShotStepKind::TemporalRegularize,
    ShotStepKind::VisionQa,
    ShotStepKind::Benchmark,
    ShotStepKind::Manifest,
];

fn post_step_ids(shot_id: &str) -> impl Iterator<Item = String> + '_ {
    POST_STEPS.iter().map(move |kind| shot_step_id(shot_id, *kind))
}

fn describe_shot_step(shot: &ShotRef, kind: ShotStepKind) -> String {
    match kind {
        ShotStepKind::Generate => format!(
            "Render shot {} with profile {}",
            shot.id(),
            shot.pipeline_config_id()
        ),
        ShotStepKind::TemporalRegularize => format!("Temporally regularize shot {}", shot.id()),
        ShotStepKind::VisionQa => format!("Run vision QA on shot {}", shot.id()),
        ShotStepKind::Benchmark => format!("Benchmark shot {}", shot.id()),
        ShotStepKind::Manifest => format!("Write the manifest for shot {}", shot.id()),
    }
}

/// Builds the step graph of a narrative run.
pub struct ShotStepFactory {
    env: Arc<StepEnvironment>,
    layout: PipelineConfig,
}

impl ShotStepFactory {
    /// Factory binding steps to `env`.
    pub fn new(env: Arc<StepEnvironment>, layout: PipelineConfig) -> Self {
        Self { env, layout }
    }

    /// Plan the steps for `script`, shots in script order then concatenation.
    pub fn describe(&self, script: &NarrativeScript) -> Vec<ShotStepDescriptor> {
        let mut descriptors = Vec::with_capacity(script.shots().len() * 5 + 1);
        let mut previous: Option<&ShotRef> = None;

        for shot in script.shots() {
            let mut generate_deps: Vec<String> = previous
                .map(|p| post_step_ids(p.id()).collect())
                .unwrap_or_default();
            for dependency in shot.depends_on() {
                for id in post_step_ids(dependency) {
                    if !generate_deps.contains(&id) {
                        generate_deps.push(id);
                    }
                }
            }

            let generate_id = shot_step_id(shot.id(), ShotStepKind::Generate);
            descriptors.push(ShotStepDescriptor {
                id: generate_id.clone(),
                kind: StepKind::Shot(ShotStepKind::Generate),
                shot_id: Some(shot.id().clone()),
                dependencies: generate_deps,
                description: describe_shot_step(shot, ShotStepKind::Generate),
            });

            let temporal_id = shot_step_id(shot.id(), ShotStepKind::TemporalRegularize);
            for kind in POST_STEPS {
                let mut dependencies = vec![generate_id.clone()];
                let waits_for_smoothing = matches!(kind, ShotStepKind::VisionQa | ShotStepKind::Benchmark)
                    && *self.layout.inspect_after_smoothing();
                if waits_for_smoothing {
                    dependencies.push(temporal_id.clone());
                }
                descriptors.push(ShotStepDescriptor {
                    id: shot_step_id(shot.id(), kind),
                    kind: StepKind::Shot(kind),
                    shot_id: Some(shot.id().clone()),
                    dependencies,
                    description: describe_shot_step(shot, kind),
                });
            }

            previous = Some(shot);
        }

        descriptors.push(ShotStepDescriptor {
            id: CONCATENATE_STEP_ID.to_string(),
            kind: StepKind::Concatenate,
            shot_id: None,
            dependencies: script
                .shots()
                .iter()
                .map(|s| shot_step_id(s.id(), ShotStepKind::TemporalRegularize))
                .collect(),
            description: "Concatenate rendered shots into the final video".to_string(),
        });

        descriptors
    }

    /// Instantiate the planned steps for `script`.
    pub fn build(&self, script: &NarrativeScript) -> Vec<Arc<dyn Step<SharedRunContext>>> {
        self.describe(script)
            .into_iter()
            .filter_map(|descriptor| self.instantiate(script, descriptor))
            .collect()
    }

    fn instantiate(
        &self,
        script: &NarrativeScript,
        descriptor: ShotStepDescriptor,
    ) -> Option<Arc<dyn Step<SharedRunContext>>> {
        let ShotStepDescriptor {
            id,
            kind,
            shot_id,
            dependencies,
            description,
        } = descriptor;

        match kind {
            StepKind::Concatenate => Some(Arc::new(ConcatenateStep::new(
                dependencies,
                Arc::clone(&self.env),
            ))),
            StepKind::Shot(kind) => {
                let shot = script.shot(shot_id.as_deref()?)?.clone();
                Some(Arc::new(ShotStep::new(
                    id,
                    description,
                    dependencies,
                    kind,
                    shot,
                    Arc::clone(&self.env),
                )))
            }
        }
    }
}
