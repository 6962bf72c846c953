use async_trait::async_trait;
use montage_error::{ProcessError, ProcessErrorKind};
use montage_process::{
    ExternalInvoker, Invocation, ProcessOutput, ProcessResult, RetryPolicy, TokioProcessInvoker,
    invoke_with_retry,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_captures_stdout_stderr_and_exit_code() {
    let invocation = Invocation::new("sh").with_args(["-c", "echo rendered; echo warn >&2; exit 3"]);
    let output = TokioProcessInvoker::new().run(&invocation).await.unwrap();

    assert_eq!(*output.exit_code(), Some(3));
    assert_eq!(output.stdout().trim(), "rendered");
    assert_eq!(output.stderr().trim(), "warn");
    assert!(!output.success());

    let err = output.check("sh").unwrap_err();
    match err.kind {
        ProcessErrorKind::NonZeroExit { code, stderr, .. } => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "warn");
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_enforced_by_invoker() {
    let invocation = Invocation::new("sleep")
        .arg("5")
        .with_timeout(Some(Duration::from_millis(100)));
    let err = TokioProcessInvoker::new().run(&invocation).await.unwrap_err();
    assert!(matches!(err.kind, ProcessErrorKind::Timeout { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let invocation = Invocation::new("montage-definitely-not-installed");
    let err = TokioProcessInvoker::new()
        .run(&invocation)
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ProcessErrorKind::Spawn { .. }));
}

struct Flaky {
    failures_before_success: u32,
    calls: AtomicU32,
    permanent: bool,
}

impl Flaky {
    fn new(failures_before_success: u32) -> Self {
        Self {
            failures_before_success,
            calls: AtomicU32::new(0),
            permanent: false,
        }
    }
}

#[async_trait]
impl ExternalInvoker for Flaky {
    async fn run(&self, _invocation: &Invocation) -> ProcessResult<ProcessOutput> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.permanent {
            return Err(ProcessError::new(ProcessErrorKind::OutputNotFound {
                program: "render".into(),
                location: "/runs/a/render".into(),
            }));
        }
        if call <= self.failures_before_success {
            Ok(ProcessOutput::new(Some(1), "", "transient glitch", Duration::ZERO))
        } else {
            Ok(ProcessOutput::new(Some(0), "ok", "", Duration::ZERO))
        }
    }
}

fn fast_policy(attempts: u32) -> RetryPolicy {
    RetryPolicy::builder()
        .max_attempts(attempts)
        .backoff_ms(1)
        .max_backoff_ms(5)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_single_attempt_by_default() {
    let invoker = Flaky::new(1);
    let err = invoke_with_retry(&invoker, &Invocation::new("render"), &RetryPolicy::default())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ProcessErrorKind::NonZeroExit { .. }));
    assert_eq!(invoker.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transient_failures_retried_within_budget() {
    let invoker = Flaky::new(2);
    let output = invoke_with_retry(&invoker, &Invocation::new("render"), &fast_policy(3))
        .await
        .unwrap();
    assert_eq!(output.stdout(), "ok");
    assert_eq!(invoker.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_budget_exhaustion_returns_last_error() {
    let invoker = Flaky::new(10);
    let err = invoke_with_retry(&invoker, &Invocation::new("render"), &fast_policy(2))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("transient glitch"));
    assert_eq!(invoker.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_permanent_failure_not_retried() {
    let invoker = Flaky {
        permanent: true,
        ..Flaky::new(0)
    };
    let err = invoke_with_retry(&invoker, &Invocation::new("render"), &fast_policy(5))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ProcessErrorKind::OutputNotFound { .. }));
    assert_eq!(invoker.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_optional_args_are_paired() {
    let invocation = Invocation::new("render")
        .optional_arg("--camera-path", Some("orbit"))
        .optional_arg("--sample", None::<String>)
        .optional_arg("--duration", Some(4.5));
    assert_eq!(invocation.args(), &vec!["--camera-path", "orbit", "--duration", "4.5"]);
}
