//! External program invocation for Montage.
//!
//! Every external collaborator (renderer, smoother, inspector, benchmark,
//! concatenator) is reached through one narrow contract:
//! - [`ExternalInvoker`] spawns a named program with arguments and captures
//!   exit code, stdout and stderr
//! - [`OutputDiscovery`] locates the artifact the program produced, trusting
//!   a path printed on stdout first and falling back to the most recently
//!   modified matching file in the output directory
//! - [`invoke_with_retry`] adds a bounded, per-tool retry budget

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod discovery;
mod invoker;
mod retry;

pub use discovery::OutputDiscovery;
pub use invoker::{ExternalInvoker, Invocation, ProcessOutput, TokioProcessInvoker};
pub use retry::{RetryPolicy, RetryPolicyBuilder, invoke_with_retry};

/// Result type for process operations.
pub type ProcessResult<T> = Result<T, montage_error::ProcessError>;
