use montage_error::{MontageErrorKind, ScriptErrorKind};
use montage_narrative::{GenerationProfile, ProfileCatalog, ScriptLoader};

mod support;

fn script_kind(json: &str) -> ScriptErrorKind {
    let profiles = support::profiles();
    let err = ScriptLoader::new(&profiles).parse(json).unwrap_err();
    match err.kind() {
        MontageErrorKind::Script(e) => e.kind.clone(),
        other => panic!("expected script error, got {other:?}"),
    }
}

#[test]
fn test_parses_valid_script() {
    let profiles = support::profiles();
    let script = ScriptLoader::new(&profiles)
        .parse(
            r#"{
                "id": "harbor",
                "title": "Harbor at dawn",
                "shots": [
                    {"id": "wide", "pipelineConfigId": "dolly", "cameraPathId": "orbit", "durationSeconds": 4.0},
                    {"id": "close", "pipelineConfigId": "static", "temporalRegularization": "off", "sampleId": "s2"}
                ]
            }"#,
        )
        .unwrap();

    assert_eq!(script.id(), "harbor");
    assert_eq!(script.title().as_deref(), Some("Harbor at dawn"));
    assert_eq!(script.shots().len(), 2);
    assert_eq!(script.shots()[0].camera_path_id().as_deref(), Some("orbit"));
    assert_eq!(script.shots()[1].sample_id().as_deref(), Some("s2"));
}

#[test]
fn test_unknown_profile_rejects_whole_script() {
    let kind = script_kind(
        r#"{"id": "n", "shots": [
            {"id": "a", "pipelineConfigId": "dolly"},
            {"id": "b", "pipelineConfigId": "crane"}
        ]}"#,
    );
    assert_eq!(
        kind,
        ScriptErrorKind::UnknownProfile {
            shot: "b".into(),
            profile: "crane".into()
        }
    );
}

#[test]
fn test_duplicate_shot_ids_rejected() {
    let kind = script_kind(
        r#"{"id": "n", "shots": [
            {"id": "a", "pipelineConfigId": "dolly"},
            {"id": "a", "pipelineConfigId": "static"}
        ]}"#,
    );
    assert_eq!(kind, ScriptErrorKind::DuplicateShot("a".into()));
}

#[test]
fn test_malformed_scripts_rejected() {
    assert!(matches!(script_kind("{not json"), ScriptErrorKind::JsonParse(_)));
    assert!(matches!(
        script_kind(r#"{"id": "n", "shots": [{"id": "a"}]}"#),
        ScriptErrorKind::JsonParse(_)
    ));
    assert_eq!(script_kind(r#"{"id": " ", "shots": []}"#), ScriptErrorKind::EmptyId);
    assert_eq!(
        script_kind(r#"{"id": "n", "shots": [{"id": "", "pipelineConfigId": "dolly"}]}"#),
        ScriptErrorKind::EmptyShotId(0)
    );
    assert!(matches!(
        script_kind(
            r#"{"id": "n", "shots": [{"id": "a", "pipelineConfigId": "dolly", "durationSeconds": -1}]}"#
        ),
        ScriptErrorKind::InvalidDuration { .. }
    ));
    assert!(matches!(
        script_kind(
            r#"{"id": "n", "shots": [{"id": "a", "pipelineConfigId": "dolly", "temporalRegularization": "maybe"}]}"#
        ),
        ScriptErrorKind::JsonParse(_)
    ));
}

#[test]
fn test_dependency_cycle_rejected() {
    let kind = script_kind(
        r#"{"id": "n", "shots": [
            {"id": "a", "pipelineConfigId": "dolly", "dependsOn": ["b"]},
            {"id": "b", "pipelineConfigId": "dolly", "dependsOn": ["a"]}
        ]}"#,
    );
    assert!(matches!(kind, ScriptErrorKind::DependencyCycle(_)));
}

#[test]
fn test_narrative_id_must_be_a_plain_directory_name() {
    for id in ["/tmp/escaped", "../outside", "nested/run", "..", "."] {
        let json = format!(r#"{{"id": "{id}", "shots": []}}"#);
        assert_eq!(script_kind(&json), ScriptErrorKind::InvalidId(id.into()), "{id}");
    }
    assert_eq!(
        script_kind(r#"{"id": "back\\slash", "shots": []}"#),
        ScriptErrorKind::InvalidId("back\\slash".into())
    );
}

#[test]
fn test_shot_id_must_be_a_plain_directory_name() {
    let kind = script_kind(
        r#"{"id": "n", "shots": [
            {"id": "a", "pipelineConfigId": "dolly"},
            {"id": "../b", "pipelineConfigId": "dolly"}
        ]}"#,
    );
    assert_eq!(kind, ScriptErrorKind::InvalidId("../b".into()));

    let profiles = support::profiles();
    let script = ScriptLoader::new(&profiles)
        .parse(r#"{"id": "harbor.v2", "shots": [{"id": "shot..1", "pipelineConfigId": "dolly"}]}"#)
        .unwrap();
    assert_eq!(script.id(), "harbor.v2");
}

#[test]
fn test_unknown_dependency_rejected() {
    let kind = script_kind(
        r#"{"id": "n", "shots": [
            {"id": "a", "pipelineConfigId": "dolly", "dependsOn": ["ghost"]}
        ]}"#,
    );
    assert_eq!(
        kind,
        ScriptErrorKind::UnknownDependency {
            shot: "a".into(),
            dependency: "ghost".into()
        }
    );
}

#[test]
fn test_empty_script_is_valid() {
    let profiles = ProfileCatalog::new();
    let script = ScriptLoader::new(&profiles)
        .parse(r#"{"id": "empty", "shots": []}"#)
        .unwrap();
    assert!(script.shots().is_empty());
}

#[test]
fn test_load_reads_file_and_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("n.json");
    std::fs::write(&path, r#"{"id": "n", "shots": [{"id": "a", "pipelineConfigId": "dolly"}]}"#)
        .unwrap();

    let profiles = support::profiles();
    let loader = ScriptLoader::new(&profiles);
    assert_eq!(loader.load(&path).unwrap().shots().len(), 1);

    let err = loader.load(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(
        err.kind(),
        MontageErrorKind::Script(e) if matches!(e.kind, ScriptErrorKind::FileRead(_))
    ));
}

#[test]
fn test_profile_catalog_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dolly.json"),
        r#"{"description": "slow push", "recommendsTemporalRegularization": true}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let catalog = ProfileCatalog::from_dir(dir.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.recommends_smoothing("dolly"));
    assert!(catalog.contains("broken"));
    assert!(!catalog.recommends_smoothing("broken"));
    assert!(!catalog.contains("notes"));
    assert_eq!(
        catalog.get("dolly").map(GenerationProfile::id).map(String::as_str),
        Some("dolly")
    );

    assert!(ProfileCatalog::from_dir(&dir.path().join("absent")).is_err());
}
