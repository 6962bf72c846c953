//! Report writing error types.

/// Specific error conditions for summary persistence.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ReportErrorKind {
    /// Filesystem failure
    #[display("I/O error at {}: {}", path, message)]
    Io {
        /// Path involved
        path: String,
        /// Underlying message
        message: String,
    },
    /// Summary could not be serialized
    #[display("Failed to serialize summary: {}", _0)]
    Serialize(String),
    /// Stored summary could not be parsed
    #[display("Failed to parse summary: {}", _0)]
    Parse(String),
}

/// Error type for report operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Report Error: {} at line {} in {}", kind, line, file)]
pub struct ReportError {
    /// The specific error condition
    pub kind: ReportErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ReportError {
    /// Create a new ReportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ReportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
