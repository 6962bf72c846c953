//! Spawning external programs.

use crate::ProcessResult;
use async_trait::async_trait;
use montage_error::{ProcessError, ProcessErrorKind};
use std::process::Stdio;
use std::time::{Duration, Instant};

/// A request to run one external program.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Invocation {
    /// Invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `flag value` when `value` is present.
    pub fn optional_arg(self, flag: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.arg(flag).arg(value.to_string()),
            None => self,
        }
    }

    /// Kill the program when it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command line for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What a finished program left behind.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ProcessOutput {
    /// Exit code, absent when terminated by a signal
    exit_code: Option<i32>,
    /// Captured stdout
    stdout: String,
    /// Captured stderr
    stderr: String,
    /// Wall-clock run time
    elapsed: Duration,
}

impl ProcessOutput {
    /// Build an output record.
    pub fn new(
        exit_code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            elapsed,
        }
    }

    /// Whether the program exited with code zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last `lines` lines of stderr.
    pub fn stderr_tail(&self, lines: usize) -> String {
        let all: Vec<&str> = self.stderr.lines().collect();
        all[all.len().saturating_sub(lines)..].join("\n")
    }

    /// Turn a non-zero exit into an error carrying the stderr tail.
    pub fn check(self, program: &str) -> ProcessResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProcessError::new(ProcessErrorKind::NonZeroExit {
                program: program.to_string(),
                code: self.exit_code,
                stderr: self.stderr_tail(20),
            }))
        }
    }
}

/// Runs external programs.
///
/// Implementations report a non-zero exit through [`ProcessOutput`], not as an
/// error; errors are reserved for programs that could not be run to completion.
#[async_trait]
pub trait ExternalInvoker: Send + Sync {
    /// Run a program and capture its output.
    async fn run(&self, invocation: &Invocation) -> ProcessResult<ProcessOutput>;
}

/// [`ExternalInvoker`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessInvoker;

impl TokioProcessInvoker {
    /// Invoker honouring each invocation's own timeout.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExternalInvoker for TokioProcessInvoker {
    #[tracing::instrument(skip(self, invocation), fields(program = %invocation.program()))]
    async fn run(&self, invocation: &Invocation) -> ProcessResult<ProcessOutput> {
        tracing::debug!(command = %invocation.display(), "Spawning external program");

        let mut command = tokio::process::Command::new(invocation.program());
        command
            .args(invocation.args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let started = Instant::now();
        let pending = command.output();
        let result = match *invocation.timeout() {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                tracing::warn!(seconds = limit.as_secs(), "External program timed out");
                ProcessError::new(ProcessErrorKind::Timeout {
                    program: invocation.program().clone(),
                    seconds: limit.as_secs(),
                })
            })?,
            None => pending.await,
        };

        let output = result.map_err(|e| {
            ProcessError::new(ProcessErrorKind::Spawn {
                program: invocation.program().clone(),
                message: e.to_string(),
            })
        })?;

        let elapsed = started.elapsed();
        let output = ProcessOutput::new(
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
            elapsed,
        );

        tracing::debug!(
            exit_code = ?output.exit_code(),
            elapsed_ms = elapsed.as_millis() as u64,
            "External program finished"
        );
        Ok(output)
    }
}
