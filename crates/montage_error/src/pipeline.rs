//! Step graph error types.

/// Specific error conditions raised while validating a step graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Two steps share an id
    #[display("Step id '{}' is registered more than once", _0)]
    DuplicateStep(String),
    /// A step depends on an id that is not in the graph
    #[display("Step '{}' depends on unknown step '{}'", step, dependency)]
    UnknownDependency {
        /// Dependent step id
        step: String,
        /// Missing dependency id
        dependency: String,
    },
    /// The dependency declarations contain a cycle
    #[display("Step graph contains a cycle through: {}", _0)]
    Cycle(String),
}

/// Error type for step graph validation.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
