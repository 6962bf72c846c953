//! Generation profile catalog.

use montage_error::{ConfigError, MontageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A named set of renderer parameters.
///
/// Only the fields the pipeline itself reads are modelled; renderer-specific
/// settings stay in the profile file for the renderer to consume.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProfile {
    /// Profile id, defaults to the file stem
    #[serde(default)]
    id: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Whether `auto` temporal regularization should smooth shots
    #[serde(default)]
    recommends_temporal_regularization: bool,
}

impl GenerationProfile {
    /// Profile with default settings.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the temporal regularization recommendation.
    pub fn recommending_smoothing(mut self, recommends: bool) -> Self {
        self.recommends_temporal_regularization = recommends;
        self
    }
}

/// Known generation profiles by id.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: HashMap<String, GenerationProfile>,
}

impl ProfileCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile, replacing any with the same id.
    pub fn insert(&mut self, profile: GenerationProfile) {
        if self.profiles.contains_key(profile.id()) {
            tracing::warn!(profile = %profile.id(), "Profile already registered, overwriting");
        }
        self.profiles.insert(profile.id().clone(), profile);
    }

    /// Builder-style [`ProfileCatalog::insert`].
    pub fn with(mut self, profile: GenerationProfile) -> Self {
        self.insert(profile);
        self
    }

    /// Load every `*.json` file in `dir`.
    ///
    /// A file that exists but cannot be parsed still registers its id with
    /// default settings, so scripts referencing it remain valid.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn from_dir(dir: &Path) -> MontageResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ConfigError::new(format!(
                "Cannot read profile directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut catalog = Self::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let mut profile = match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|c| serde_json::from_str::<GenerationProfile>(&c).map_err(|e| e.to_string()))
            {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Unreadable profile, using defaults");
                    GenerationProfile::default()
                }
            };
            profile.id = stem.to_string();
            catalog.insert(profile);
        }

        tracing::debug!(profiles = catalog.len(), "Profile catalog loaded");
        Ok(catalog)
    }

    /// Look up a profile.
    pub fn get(&self, id: &str) -> Option<&GenerationProfile> {
        self.profiles.get(id)
    }

    /// Whether a profile id is known.
    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// Whether a profile asks for temporal regularization in `auto` mode.
    pub fn recommends_smoothing(&self, id: &str) -> bool {
        self.get(id)
            .is_some_and(|p| p.recommends_temporal_regularization)
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
