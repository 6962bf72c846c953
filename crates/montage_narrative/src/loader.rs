//! Narrative script loading and validation.

use crate::ProfileCatalog;
use montage_core::NarrativeScript;
use montage_error::{MontageResult, PipelineErrorKind, ScriptError, ScriptErrorKind};
use montage_pipeline::StepGraph;
use std::collections::HashSet;
use std::path::{Component, Path};

/// Whether `id` names exactly one directory below its parent.
fn is_directory_name(id: &str) -> bool {
    if id.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == id
    )
}

/// Loads scripts and rejects malformed ones before anything runs.
#[derive(Debug, Clone, Copy)]
pub struct ScriptLoader<'a> {
    profiles: &'a ProfileCatalog,
}

impl<'a> ScriptLoader<'a> {
    /// Loader validating profile references against `profiles`.
    pub fn new(profiles: &'a ProfileCatalog) -> Self {
        Self { profiles }
    }

    /// Read, parse and validate a script file.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> MontageResult<NarrativeScript> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScriptError::new(ScriptErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        self.parse(&content)
    }

    /// Parse and validate script JSON.
    pub fn parse(&self, content: &str) -> MontageResult<NarrativeScript> {
        let script: NarrativeScript = serde_json::from_str(content)
            .map_err(|e| ScriptError::new(ScriptErrorKind::JsonParse(e.to_string())))?;
        self.validate(&script)?;
        tracing::info!(narrative = %script.id(), shots = script.shots().len(), "Script loaded");
        Ok(script)
    }

    /// Check ids, profile references, durations and declared dependencies.
    pub fn validate(&self, script: &NarrativeScript) -> Result<(), ScriptError> {
        if script.id().trim().is_empty() {
            return Err(ScriptError::new(ScriptErrorKind::EmptyId));
        }
        if !is_directory_name(script.id()) {
            return Err(ScriptError::new(ScriptErrorKind::InvalidId(
                script.id().clone(),
            )));
        }

        let mut seen = HashSet::new();
        for (index, shot) in script.shots().iter().enumerate() {
            if shot.id().trim().is_empty() {
                return Err(ScriptError::new(ScriptErrorKind::EmptyShotId(index)));
            }
            if !is_directory_name(shot.id()) {
                return Err(ScriptError::new(ScriptErrorKind::InvalidId(shot.id().clone())));
            }
            if !seen.insert(shot.id().as_str()) {
                return Err(ScriptError::new(ScriptErrorKind::DuplicateShot(
                    shot.id().clone(),
                )));
            }
        }

        for shot in script.shots() {
            if !self.profiles.contains(shot.pipeline_config_id()) {
                return Err(ScriptError::new(ScriptErrorKind::UnknownProfile {
                    shot: shot.id().clone(),
                    profile: shot.pipeline_config_id().clone(),
                }));
            }
            if let Some(duration) = shot.duration_seconds() {
                if !(duration.is_finite() && *duration > 0.0) {
                    return Err(ScriptError::new(ScriptErrorKind::InvalidDuration {
                        shot: shot.id().clone(),
                        value: duration.to_string(),
                    }));
                }
            }
        }

        StepGraph::build(
            script
                .shots()
                .iter()
                .map(|shot| (shot.id().as_str(), shot.depends_on())),
        )
        .map_err(|e| {
            ScriptError::new(match e.kind {
                PipelineErrorKind::Cycle(path) => ScriptErrorKind::DependencyCycle(path),
                PipelineErrorKind::DuplicateStep(shot) => ScriptErrorKind::DuplicateShot(shot),
                PipelineErrorKind::UnknownDependency { step, dependency } => {
                    ScriptErrorKind::UnknownDependency {
                        shot: step,
                        dependency,
                    }
                }
            })
        })?;

        Ok(())
    }
}
