//! Mutable state for one narrative run.

use crate::{NarrativeScript, ShotArtifacts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Overall status of a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    /// Steps are still executing
    #[default]
    Running,
    /// All critical steps succeeded
    Succeeded,
    /// At least one critical step failed
    Failed,
}

/// State of one narrative run.
///
/// Created once at run start with one [`ShotArtifacts`] entry per script shot,
/// in declaration order, then mutated in place by the steps that own each field.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct RunContext {
    narrative_id: String,
    title: Option<String>,
    script_path: PathBuf,
    output_dir: PathBuf,
    started_at: DateTime<Utc>,
    shots: Vec<ShotArtifacts>,
    status: RunStatus,
    final_video_path: Option<PathBuf>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl RunContext {
    /// Initialize a context for `script`.
    ///
    /// # Examples
    ///
    /// ```
    /// use montage_core::{NarrativeScript, RunContext, RunStatus};
    ///
    /// let script = NarrativeScript::new("empty", vec![]);
    /// let ctx = RunContext::new(&script, "empty.json", "/tmp/out");
    /// assert!(ctx.shots().is_empty());
    /// assert_eq!(*ctx.status(), RunStatus::Running);
    /// ```
    pub fn new(
        script: &NarrativeScript,
        script_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            narrative_id: script.id().clone(),
            title: script.title().clone(),
            script_path: script_path.into(),
            output_dir: output_dir.into(),
            started_at: Utc::now(),
            shots: script.shots().iter().map(ShotArtifacts::pending).collect(),
            status: RunStatus::Running,
            final_video_path: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Look up a shot entry.
    pub fn shot(&self, shot_id: &str) -> Option<&ShotArtifacts> {
        self.shots.iter().find(|s| s.shot_id() == shot_id)
    }

    /// Mutable access to a shot entry.
    pub fn shot_mut(&mut self, shot_id: &str) -> Option<&mut ShotArtifacts> {
        self.shots.iter_mut().find(|s| s.shot_id() == shot_id)
    }

    /// Directory holding a shot's outputs.
    pub fn shot_dir(&self, shot_id: &str) -> PathBuf {
        self.output_dir.join("shots").join(shot_id)
    }

    /// Record the concatenated artifact.
    pub fn set_final_video(&mut self, path: impl Into<PathBuf>) {
        self.final_video_path = Some(path.into());
    }

    /// Set the overall status.
    pub fn set_status(&mut self, status: RunStatus) {
        self.status = status;
    }

    /// Mark the run failed with a reason.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = RunStatus::Failed;
        self.errors.push(reason.into());
    }

    /// Record a critical error message without changing status.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record a degraded, non-critical outcome.
    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Number of shots that rendered.
    pub fn successful_shots(&self) -> usize {
        self.shots.iter().filter(|s| s.has_video()).count()
    }
}

/// A [`RunContext`] shared between concurrently running steps.
///
/// Access goes through short closures so no lock is ever held across an
/// await point. Field ownership by step kind keeps concurrent writers apart.
#[derive(Debug)]
pub struct SharedRunContext {
    inner: Mutex<RunContext>,
}

impl SharedRunContext {
    /// Wrap a freshly initialized context.
    pub fn new(context: RunContext) -> Self {
        Self {
            inner: Mutex::new(context),
        }
    }

    /// Read from the context.
    pub fn read<R>(&self, f: impl FnOnce(&RunContext) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Mutate the context.
    pub fn update<R>(&self, f: impl FnOnce(&mut RunContext) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Mutate one shot entry, returning `None` when the shot is unknown.
    pub fn update_shot<R>(
        &self,
        shot_id: &str,
        f: impl FnOnce(&mut ShotArtifacts) -> R,
    ) -> Option<R> {
        self.update(|ctx| ctx.shot_mut(shot_id).map(f))
    }

    /// Copy of one shot entry.
    pub fn shot(&self, shot_id: &str) -> Option<ShotArtifacts> {
        self.read(|ctx| ctx.shot(shot_id).cloned())
    }

    /// Copy of the whole context.
    pub fn snapshot(&self) -> RunContext {
        self.read(|ctx| ctx.clone())
    }

    /// Release the context once every step has finished.
    pub fn into_inner(self) -> RunContext {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
