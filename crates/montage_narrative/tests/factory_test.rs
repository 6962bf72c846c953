use montage_core::{Criticality, NarrativeScript, ShotRef};
use montage_narrative::{
    CONCATENATE_STEP_ID, PipelineConfig, ShotStepFactory, ShotStepKind, StepEnvironment, StepKind,
    shot_step_id,
};
use std::sync::Arc;

mod support;

fn shot(id: &str) -> ShotRef {
    ShotRef::builder()
        .id(id)
        .pipeline_config_id("dolly")
        .build()
        .unwrap()
}

fn factory(layout: PipelineConfig) -> ShotStepFactory {
    let env = StepEnvironment::new(
        Arc::new(support::FakeInvoker::new()),
        support::tools(),
        Arc::new(support::profiles()),
    );
    ShotStepFactory::new(Arc::new(env), layout)
}

fn deps_of<'a>(
    descriptors: &'a [montage_narrative::ShotStepDescriptor],
    id: &str,
) -> &'a [String] {
    descriptors
        .iter()
        .find(|d| d.id() == id)
        .map(|d| d.dependencies().as_slice())
        .unwrap_or_else(|| panic!("no step {id}"))
}

fn post_ids(shot: &str) -> Vec<String> {
    [
        ShotStepKind::TemporalRegularize,
        ShotStepKind::VisionQa,
        ShotStepKind::Benchmark,
        ShotStepKind::Manifest,
    ]
    .into_iter()
    .map(|k| shot_step_id(shot, k))
    .collect()
}

#[test]
fn test_five_steps_per_shot_plus_concatenation() {
    let script = NarrativeScript::new("n", vec![shot("a"), shot("b"), shot("c")]);
    let descriptors = factory(PipelineConfig::default()).describe(&script);

    assert_eq!(descriptors.len(), 16);
    let ids: Vec<&str> = descriptors.iter().map(|d| d.id().as_str()).collect();
    assert_eq!(
        &ids[..5],
        &[
            "a:generate",
            "a:temporal-regularize",
            "a:vision-qa",
            "a:benchmark",
            "a:manifest"
        ]
    );
    assert_eq!(ids.last(), Some(&CONCATENATE_STEP_ID));
    assert_eq!(descriptors[0].kind(), &StepKind::Shot(ShotStepKind::Generate));
    assert_eq!(descriptors[0].shot_id().as_deref(), Some("a"));
    assert_eq!(descriptors[15].shot_id(), &None);
}

#[test]
fn test_rendering_is_serialized_behind_previous_post_processing() {
    let script = NarrativeScript::new("n", vec![shot("a"), shot("b")]);
    let descriptors = factory(PipelineConfig::default()).describe(&script);

    assert!(deps_of(&descriptors, "a:generate").is_empty());
    assert_eq!(deps_of(&descriptors, "b:generate"), post_ids("a").as_slice());
    for id in post_ids("b") {
        assert_eq!(deps_of(&descriptors, &id), &["b:generate".to_string()]);
    }
    assert_eq!(
        deps_of(&descriptors, CONCATENATE_STEP_ID),
        &["a:temporal-regularize".to_string(), "b:temporal-regularize".to_string()]
    );
}

#[test]
fn test_inspection_can_wait_for_smoothing() {
    let script = NarrativeScript::new("n", vec![shot("a")]);
    let descriptors = factory(PipelineConfig::new(0, true)).describe(&script);

    let expected = ["a:generate".to_string(), "a:temporal-regularize".to_string()];
    assert_eq!(deps_of(&descriptors, "a:vision-qa"), &expected);
    assert_eq!(deps_of(&descriptors, "a:benchmark"), &expected);
    assert_eq!(deps_of(&descriptors, "a:manifest"), &["a:generate".to_string()]);
}

#[test]
fn test_declared_dependencies_extend_generate() {
    let c = ShotRef::builder()
        .id("c")
        .pipeline_config_id("static")
        .depends_on(vec!["a".to_string()])
        .build()
        .unwrap();
    let script = NarrativeScript::new("n", vec![shot("a"), shot("b"), c]);
    let descriptors = factory(PipelineConfig::default()).describe(&script);

    let mut expected = post_ids("b");
    expected.extend(post_ids("a"));
    assert_eq!(deps_of(&descriptors, "c:generate"), expected.as_slice());
}

#[test]
fn test_build_binds_criticality() {
    let script = NarrativeScript::new("n", vec![shot("a"), shot("b")]);
    let steps = factory(PipelineConfig::default()).build(&script);

    assert_eq!(steps.len(), 11);
    let critical: Vec<&str> = steps
        .iter()
        .filter(|s| s.criticality() == Criticality::Critical)
        .map(|s| s.id())
        .collect();
    assert_eq!(critical, vec!["a:generate", "b:generate", CONCATENATE_STEP_ID]);
}

#[test]
fn test_empty_script_only_concatenates() {
    let script = NarrativeScript::new("n", vec![]);
    let descriptors = factory(PipelineConfig::default()).describe(&script);
    assert_eq!(descriptors.len(), 1);
    assert!(descriptors[0].dependencies().is_empty());
}
