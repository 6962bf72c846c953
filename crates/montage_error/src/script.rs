//! Narrative script error types.

/// Specific error conditions for loading and validating narrative scripts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScriptErrorKind {
    /// Failed to read the script file
    #[display("Failed to read script file: {}", _0)]
    FileRead(String),
    /// Failed to parse JSON content
    #[display("Failed to parse script JSON: {}", _0)]
    JsonParse(String),
    /// Narrative id is empty or whitespace
    #[display("Narrative id cannot be empty")]
    EmptyId,
    /// A narrative or shot id is not usable as a single directory name
    #[display("Id '{}' must be a plain name without path separators or '..'", _0)]
    InvalidId(String),
    /// A shot has an empty id
    #[display("Shot at position {} has an empty id", _0)]
    EmptyShotId(usize),
    /// Two shots share an id
    #[display("Shot id '{}' is declared more than once", _0)]
    DuplicateShot(String),
    /// A shot references a generation profile that does not exist
    #[display("Shot '{}' references unknown generation profile '{}'", shot, profile)]
    UnknownProfile {
        /// Shot id
        shot: String,
        /// Missing profile id
        profile: String,
    },
    /// A shot depends on a shot that is not part of the script
    #[display("Shot '{}' depends on unknown shot '{}'", shot, dependency)]
    UnknownDependency {
        /// Shot id
        shot: String,
        /// Missing dependency id
        dependency: String,
    },
    /// Declared shot dependencies form a cycle
    #[display("Shot dependencies form a cycle: {}", _0)]
    DependencyCycle(String),
    /// Duration is not a positive finite number
    #[display("Shot '{}' has invalid duration {}", shot, value)]
    InvalidDuration {
        /// Shot id
        shot: String,
        /// Offending value, formatted
        value: String,
    },
}

/// Error type for narrative script operations.
///
/// # Examples
///
/// ```
/// use montage_error::{ScriptError, ScriptErrorKind};
///
/// let err = ScriptError::new(ScriptErrorKind::DuplicateShot("intro".into()));
/// assert!(format!("{}", err).contains("intro"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    /// The specific error condition
    pub kind: ScriptErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
