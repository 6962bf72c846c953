//! Declarative narrative scripts.

use montage_error::{JsonError, MontageResult};
use serde::{Deserialize, Serialize};

/// Temporal regularization request for one shot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TemporalMode {
    /// Always smooth
    On,
    /// Never smooth
    Off,
    /// Smooth when the generation profile recommends it
    #[default]
    Auto,
}

/// Reference to one shot in a narrative.
///
/// # Examples
///
/// ```
/// use montage_core::{ShotRef, TemporalMode};
///
/// let shot = ShotRef::builder()
///     .id("opening")
///     .pipeline_config_id("wide-dolly")
///     .temporal_regularization(TemporalMode::On)
///     .build()
///     .unwrap();
/// assert_eq!(shot.temporal_mode(), TemporalMode::On);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct ShotRef {
    /// Unique shot id within the script
    id: String,
    /// Generation profile id
    pipeline_config_id: String,
    /// Optional camera path id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    camera_path_id: Option<String>,
    /// Optional target duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    duration_seconds: Option<f64>,
    /// Optional sample id handed to the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    sample_id: Option<String>,
    /// Optional temporal regularization mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    temporal_regularization: Option<TemporalMode>,
    /// Shots whose post-processing must finish before this shot renders
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    depends_on: Vec<String>,
}

impl ShotRef {
    /// Creates a new shot reference builder.
    pub fn builder() -> ShotRefBuilder {
        ShotRefBuilder::default()
    }

    /// Effective temporal mode, `auto` when the script leaves it out.
    pub fn temporal_mode(&self) -> TemporalMode {
        self.temporal_regularization.unwrap_or_default()
    }
}

/// A declarative, ordered shot list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeScript {
    /// Narrative id, also used to scope output directories
    id: String,
    /// Optional human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Shots in declaration order
    #[serde(default)]
    shots: Vec<ShotRef>,
}

impl NarrativeScript {
    /// Create a script from parts.
    pub fn new(id: impl Into<String>, shots: Vec<ShotRef>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            shots,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Parse a script from JSON text without validating it.
    pub fn from_json(content: &str) -> MontageResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| JsonError::new(format!("Invalid narrative script: {}", e)).into())
    }

    /// Look up a shot by id.
    pub fn shot(&self, id: &str) -> Option<&ShotRef> {
        self.shots.iter().find(|s| s.id == id)
    }
}
