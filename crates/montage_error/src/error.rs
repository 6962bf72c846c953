//! Top-level error wrapper types.

use crate::{ConfigError, JsonError, PipelineError, ProcessError, ReportError, ScriptError};

/// Union of every error domain in the workspace.
///
/// # Examples
///
/// ```
/// use montage_error::{ConfigError, MontageError};
///
/// let err: MontageError = ConfigError::new("bad profile dir").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MontageErrorKind {
    /// Narrative script error
    #[from(ScriptError)]
    Script(ScriptError),
    /// Step graph error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// External process error
    #[from(ProcessError)]
    Process(ProcessError),
    /// Report persistence error
    #[from(ReportError)]
    Report(ReportError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Montage error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Montage Error: {}", _0)]
pub struct MontageError(Box<MontageErrorKind>);

impl MontageError {
    /// Create a new error from a kind.
    pub fn new(kind: MontageErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MontageErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to MontageErrorKind
impl<T> From<T> for MontageError
where
    T: Into<MontageErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Montage operations.
pub type MontageResult<T> = std::result::Result<T, MontageError>;
