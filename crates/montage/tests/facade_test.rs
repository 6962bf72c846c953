use async_trait::async_trait;
use montage::{
    ExternalInvoker, Invocation, MontageConfig, NarrativeRunner, ProcessOutput, ProcessResult,
    ProfileCatalog, RunStatus, Verdict, load_summary,
};
use std::sync::Arc;
use std::time::Duration;

struct NeverInvoked;

#[async_trait]
impl ExternalInvoker for NeverInvoked {
    async fn run(&self, invocation: &Invocation) -> ProcessResult<ProcessOutput> {
        panic!("unexpected invocation of {}", invocation.display());
    }
}

#[test]
fn test_bundled_configuration_loads() {
    let config = MontageConfig::bundled().unwrap();
    assert_eq!(config.tools().concatenator().program(), "ffmpeg");
    assert_eq!(config.tools().renderer().timeout(), Some(Duration::from_secs(300)));
    assert_eq!(*config.pipeline().max_concurrent_steps(), 0);
}

#[tokio::test]
async fn test_empty_narrative_fails_with_vacuous_pass() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("empty.json");
    std::fs::write(&script, r#"{"id": "empty", "shots": []}"#).unwrap();

    let config = MontageConfig::bundled()
        .unwrap()
        .with_output_root(dir.path().join("runs"));
    let runner = NarrativeRunner::new(config, Arc::new(NeverInvoked), ProfileCatalog::new());
    let outcome = runner.run(&script).await.unwrap();

    let summary = outcome.summary();
    assert_eq!(summary.status, RunStatus::Failed);
    assert_eq!(summary.shot_count, 0);
    assert_eq!(summary.qa_summary.overall_verdict, Verdict::Pass);
    assert!(summary.final_video_path.is_none());

    let reports = outcome.reports().clone().unwrap();
    let reloaded = load_summary(reports.summary()).unwrap();
    assert_eq!(reloaded.status, RunStatus::Failed);
}
