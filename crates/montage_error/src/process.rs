//! External process error types.

/// Specific error conditions for external program invocations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ProcessErrorKind {
    /// The program could not be started
    #[display("Failed to spawn '{}': {}", program, message)]
    Spawn {
        /// Program name
        program: String,
        /// Underlying I/O message
        message: String,
    },
    /// The program did not finish within its time budget
    #[display("'{}' timed out after {}s", program, seconds)]
    Timeout {
        /// Program name
        program: String,
        /// Timeout in seconds
        seconds: u64,
    },
    /// The program exited unsuccessfully
    #[display("'{}' exited with status {:?}: {}", program, code, stderr)]
    NonZeroExit {
        /// Program name
        program: String,
        /// Exit code, absent when killed by a signal
        code: Option<i32>,
        /// Tail of captured stderr
        stderr: String,
    },
    /// The program ran but its expected output could not be located
    #[display("No output from '{}' found in {}", program, location)]
    OutputNotFound {
        /// Program name
        program: String,
        /// Directory or path that was probed
        location: String,
    },
}

impl ProcessErrorKind {
    /// Whether another attempt of the same invocation might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProcessErrorKind::Timeout { .. }
                | ProcessErrorKind::NonZeroExit { .. }
                | ProcessErrorKind::Spawn { .. }
        )
    }
}

/// Error type for external process operations.
///
/// # Examples
///
/// ```
/// use montage_error::{ProcessError, ProcessErrorKind};
///
/// let err = ProcessError::new(ProcessErrorKind::NonZeroExit {
///     program: "render".into(),
///     code: Some(2),
///     stderr: "out of memory".into(),
/// });
/// assert!(err.kind.is_transient());
/// assert!(format!("{}", err).contains("out of memory"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Process Error: {} at line {} in {}", kind, line, file)]
pub struct ProcessError {
    /// The specific error condition
    pub kind: ProcessErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProcessError {
    /// Create a new ProcessError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProcessErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the failure is worth retrying.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}
