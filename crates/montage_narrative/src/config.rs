//! Montage configuration.
//!
//! Loaded with the following precedence (highest wins):
//! 1. An explicit file passed by the caller
//! 2. `./montage.toml`
//! 3. `~/.config/montage/montage.toml`
//! 4. Bundled defaults (`montage.toml` at the workspace root)

use config::{Config, File, FileFormat};
use montage_error::{ConfigError, MontageResult};
use montage_process::{Invocation, RetryPolicy};
use montage_qa::QaThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const DEFAULT_CONFIG: &str = include_str!("../../../montage.toml");

/// How to run one external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ToolConfig {
    /// Program name or path
    program: String,
    /// Arguments placed before the step's own arguments
    #[serde(default)]
    args: Vec<String>,
    /// Kill the program after this many seconds; 0 disables the limit
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    /// Total attempts for transient failures
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    /// Base backoff between attempts
    #[serde(default = "default_backoff_ms")]
    backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    2000
}

impl ToolConfig {
    /// Tool with default limits.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }

    /// Replace the base arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the attempt budget and backoff.
    pub fn with_retries(mut self, max_attempts: u32, backoff_ms: u64) -> Self {
        self.max_attempts = max_attempts;
        self.backoff_ms = backoff_ms;
        self
    }

    /// Timeout as a duration, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Start an invocation with the base arguments and timeout applied.
    pub fn invocation(&self) -> Invocation {
        Invocation::new(&self.program)
            .with_args(&self.args)
            .with_timeout(self.timeout())
    }

    /// Retry policy for this tool.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(self.max_attempts.max(1))
            .backoff_ms(self.backoff_ms)
            .build()
            .unwrap_or_default()
    }
}

/// The external tools a narrative run drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ToolsConfig {
    /// Video renderer
    renderer: ToolConfig,
    /// Temporal smoother
    smoother: ToolConfig,
    /// Visual inspector
    inspector: ToolConfig,
    /// Quantitative benchmark
    benchmark: ToolConfig,
    /// Video concatenator (ffmpeg-compatible)
    concatenator: ToolConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            renderer: ToolConfig::new("montage-render"),
            smoother: ToolConfig::new("montage-smooth"),
            inspector: ToolConfig::new("montage-inspect"),
            benchmark: ToolConfig::new("montage-benchmark"),
            concatenator: ToolConfig::new("ffmpeg").with_args(["-hide_banner", "-loglevel", "error"]),
        }
    }
}

impl ToolsConfig {
    /// Tools config from parts.
    pub fn new(
        renderer: ToolConfig,
        smoother: ToolConfig,
        inspector: ToolConfig,
        benchmark: ToolConfig,
        concatenator: ToolConfig,
    ) -> Self {
        Self {
            renderer,
            smoother,
            inspector,
            benchmark,
            concatenator,
        }
    }
}

/// Where runs are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct OutputConfig {
    /// Root of all run directories
    root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("output/narratives"),
        }
    }
}

/// Where generation profiles live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProfilesConfig {
    /// Directory of `<id>.json` profile files
    dir: PathBuf,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("configs/profiles"),
        }
    }
}

/// Scheduling options.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cap on steps in flight; 0 means unbounded
    max_concurrent_steps: usize,
    /// Run vision QA and benchmark after smoothing instead of alongside it
    inspect_after_smoothing: bool,
}

impl PipelineConfig {
    /// Pipeline options from parts.
    pub fn new(max_concurrent_steps: usize, inspect_after_smoothing: bool) -> Self {
        Self {
            max_concurrent_steps,
            inspect_after_smoothing,
        }
    }
}

/// Complete Montage configuration.
#[derive(
    Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct MontageConfig {
    /// Output layout
    output: OutputConfig,
    /// Profile catalog location
    profiles: ProfilesConfig,
    /// Scheduling options
    pipeline: PipelineConfig,
    /// External tools
    tools: ToolsConfig,
    /// QA thresholds
    qa: QaThresholds,
}

impl MontageConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MontageConfigBuilder {
        MontageConfigBuilder::default()
    }

    /// Load bundled defaults merged with user overrides.
    ///
    /// `explicit` takes precedence over every other source and must exist.
    #[tracing::instrument(skip_all, fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> MontageResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/montage/montage.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("montage").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without user overrides.
    pub fn from_toml(content: &str) -> MontageResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// The bundled defaults.
    pub fn bundled() -> MontageResult<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    fn validate(&self) -> MontageResult<()> {
        let tools = [
            ("renderer", &self.tools.renderer),
            ("smoother", &self.tools.smoother),
            ("inspector", &self.tools.inspector),
            ("benchmark", &self.tools.benchmark),
            ("concatenator", &self.tools.concatenator),
        ];
        for (name, tool) in tools {
            if tool.program.trim().is_empty() {
                return Err(ConfigError::new(format!("tools.{}.program is empty", name)).into());
            }
        }
        Ok(())
    }

    /// Override the output root.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output.root = root.into();
        self
    }

    /// Override the profile directory.
    pub fn with_profiles_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profiles.dir = dir.into();
        self
    }
}
