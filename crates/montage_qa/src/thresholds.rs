//! Configurable QA thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds for every QA signal.
///
/// Deserializes from the `[qa]` configuration table; omitted keys keep their
/// defaults.
///
/// # Examples
///
/// ```
/// use montage_qa::QaThresholds;
///
/// let thresholds = QaThresholds::builder().flicker_fail(10).build().unwrap();
/// assert_eq!(*thresholds.flicker_fail(), 10);
/// assert_eq!(*thresholds.vision_overall_min(), 80.0);
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
#[serde(default)]
#[builder(default)]
pub struct QaThresholds {
    /// Vision overall score below this fails
    vision_overall_min: f64,
    /// Vision overall scores within this margin above the minimum warn
    vision_overall_margin: f64,
    /// Vision artifact severity above this fails
    vision_artifact_max: f64,
    /// Artifact severities within this margin below the maximum warn
    vision_artifact_margin: f64,
    /// Flicker frame counts above this warn
    flicker_warn: u32,
    /// Flicker frame counts above this fail
    flicker_fail: u32,
    /// Jitter scores above this warn
    jitter_warn: f64,
    /// Jitter scores above this fail
    jitter_fail: f64,
    /// Identity scores below this warn
    identity_warn: f64,
    /// Identity scores below this fail
    identity_fail: f64,
    /// Overall quality below this warns
    quality_warn: f64,
    /// Overall quality below this fails
    quality_fail: f64,
    /// Camera-path adherence error above this warns
    path_error_warn: f64,
    /// Camera-path direction consistency below this warns
    path_direction_warn: f64,
}

impl Default for QaThresholds {
    fn default() -> Self {
        Self {
            vision_overall_min: 80.0,
            vision_overall_margin: 5.0,
            vision_artifact_max: 40.0,
            vision_artifact_margin: 5.0,
            flicker_warn: 5,
            flicker_fail: 15,
            jitter_warn: 20.0,
            jitter_fail: 40.0,
            identity_warn: 70.0,
            identity_fail: 50.0,
            quality_warn: 65.0,
            quality_fail: 45.0,
            path_error_warn: 0.25,
            path_direction_warn: 0.7,
        }
    }
}

impl QaThresholds {
    /// Creates a new thresholds builder.
    pub fn builder() -> QaThresholdsBuilder {
        QaThresholdsBuilder::default()
    }
}
