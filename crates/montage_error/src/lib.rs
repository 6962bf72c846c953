//! Error types for the Montage narrative pipeline.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use montage_error::{MontageResult, ScriptError, ScriptErrorKind};
//!
//! fn load() -> MontageResult<()> {
//!     Err(ScriptError::new(ScriptErrorKind::EmptyId))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod pipeline;
mod process;
mod report;
mod script;

pub use config::ConfigError;
pub use error::{MontageError, MontageErrorKind, MontageResult};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use process::{ProcessError, ProcessErrorKind};
pub use report::{ReportError, ReportErrorKind};
pub use script::{ScriptError, ScriptErrorKind};
