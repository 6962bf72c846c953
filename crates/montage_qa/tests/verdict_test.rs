use montage_core::{ShotMetrics, ShotQaSummary, Verdict};
use montage_qa::{QaThresholds, compute_narrative_overall_verdict, compute_shot_qa_verdict};

fn verdict_of(metrics: &ShotMetrics) -> ShotQaSummary {
    compute_shot_qa_verdict(metrics, "profile", &QaThresholds::default())
}

fn shot_with(id: &str, verdict: Verdict) -> ShotQaSummary {
    ShotQaSummary {
        shot_id: id.to_string(),
        profile_id: "profile".to_string(),
        metrics: ShotMetrics::new(id),
        verdict,
        reasons: Vec::new(),
    }
}

#[test]
fn test_healthy_metrics_pass_without_reasons() {
    let metrics = ShotMetrics {
        vision_overall: Some(90.0),
        vision_artifacts: Some(20.0),
        flicker_frame_count: Some(1),
        jitter_score: Some(5.0),
        identity_score: Some(85.0),
        ..ShotMetrics::new("s1")
    };
    let summary = verdict_of(&metrics);
    assert_eq!(summary.verdict, Verdict::Pass);
    assert!(summary.reasons.is_empty());
    assert_eq!(summary.profile_id, "profile");
}

#[test]
fn test_marginal_vision_score_warns() {
    let metrics = ShotMetrics {
        vision_overall: Some(82.0),
        ..ShotMetrics::new("s1")
    };
    let summary = verdict_of(&metrics);
    assert_eq!(summary.verdict, Verdict::Warn);
    assert_eq!(summary.reasons.len(), 1);
    assert!(summary.reasons[0].contains("marginal"));
}

#[test]
fn test_vision_status_fail_overrides_passing_metrics() {
    let metrics = ShotMetrics {
        vision_status: Some("FAIL".to_string()),
        vision_overall: Some(99.0),
        identity_score: Some(95.0),
        ..ShotMetrics::new("s1")
    };
    assert_eq!(verdict_of(&metrics).verdict, Verdict::Fail);

    let lower = ShotMetrics {
        vision_status: Some("warn".to_string()),
        ..ShotMetrics::new("s1")
    };
    assert_eq!(verdict_of(&lower).verdict, Verdict::Warn);
}

#[test]
fn test_absent_metrics_pass() {
    let summary = verdict_of(&ShotMetrics::new("empty"));
    assert_eq!(summary.verdict, Verdict::Pass);
    assert!(summary.reasons.is_empty());
}

#[test]
fn test_reasons_accumulate_per_signal() {
    let metrics = ShotMetrics {
        flicker_frame_count: Some(20),
        jitter_score: Some(25.0),
        overall_quality: Some(60.0),
        vision_artifacts: Some(38.0),
        ..ShotMetrics::new("s1")
    };
    let summary = verdict_of(&metrics);
    assert_eq!(summary.verdict, Verdict::Fail);
    assert_eq!(summary.reasons.len(), 4);
    assert!(summary.reasons.iter().any(|r| r.contains("flicker")));
    assert!(summary.reasons.iter().any(|r| r.contains("artifact") && r.contains("marginal")));
}

#[test]
fn test_camera_path_signals_never_fail() {
    let metrics = ShotMetrics {
        path_adherence_error: Some(1_000.0),
        path_direction_consistency: Some(-1.0),
        ..ShotMetrics::new("s1")
    };
    let summary = verdict_of(&metrics);
    assert_eq!(summary.verdict, Verdict::Warn);
    assert_eq!(summary.reasons.len(), 2);
}

fn set_vision_overall(m: &mut ShotMetrics, v: f64) {
    m.vision_overall = Some(v);
}

fn set_vision_artifacts(m: &mut ShotMetrics, v: f64) {
    m.vision_artifacts = Some(v);
}

fn set_flicker(m: &mut ShotMetrics, v: f64) {
    m.flicker_frame_count = Some(v as u32);
}

fn set_jitter(m: &mut ShotMetrics, v: f64) {
    m.jitter_score = Some(v);
}

fn set_identity(m: &mut ShotMetrics, v: f64) {
    m.identity_score = Some(v);
}

fn set_quality(m: &mut ShotMetrics, v: f64) {
    m.overall_quality = Some(v);
}

fn set_path_error(m: &mut ShotMetrics, v: f64) {
    m.path_adherence_error = Some(v / 100.0);
}

fn set_direction(m: &mut ShotMetrics, v: f64) {
    m.path_direction_consistency = Some(v / 100.0);
}

#[test]
fn test_verdict_is_monotonic_in_each_signal() {
    type Setter = fn(&mut ShotMetrics, f64);
    let worsening: Vec<(&str, Setter, f64, f64)> = vec![
        ("vision overall", set_vision_overall as Setter, 100.0, -1.0),
        ("vision artifacts", set_vision_artifacts as Setter, 0.0, 1.0),
        ("flicker", set_flicker as Setter, 0.0, 1.0),
        ("jitter", set_jitter as Setter, 0.0, 1.0),
        ("identity", set_identity as Setter, 100.0, -1.0),
        ("quality", set_quality as Setter, 100.0, -1.0),
        ("path error", set_path_error as Setter, 0.0, 1.0),
        ("direction", set_direction as Setter, 100.0, -1.0),
    ];

    let baseline = ShotMetrics {
        identity_score: Some(80.0),
        jitter_score: Some(10.0),
        ..ShotMetrics::new("s1")
    };

    for (name, set, start, step) in worsening {
        let mut previous = Verdict::Pass;
        for i in 0..=100 {
            let mut metrics = baseline.clone();
            set(&mut metrics, start + step * f64::from(i));
            let verdict = verdict_of(&metrics).verdict;
            assert!(
                verdict >= previous,
                "{name}: verdict dropped from {previous} to {verdict} at step {i}"
            );
            previous = verdict;
        }
        assert_ne!(previous, Verdict::Pass, "{name} never tripped");
    }
}

#[test]
fn test_custom_thresholds_apply() {
    let strict = QaThresholds::builder()
        .jitter_warn(1.0)
        .jitter_fail(2.0)
        .build()
        .unwrap();
    let metrics = ShotMetrics {
        jitter_score: Some(3.0),
        ..ShotMetrics::new("s1")
    };
    assert_eq!(compute_shot_qa_verdict(&metrics, "p", &strict).verdict, Verdict::Fail);
}

#[test]
fn test_thresholds_deserialize_partial_table() {
    let thresholds: QaThresholds = toml::from_str("flicker_fail = 30\nidentity_warn = 75.0").unwrap();
    assert_eq!(*thresholds.flicker_fail(), 30);
    assert_eq!(*thresholds.identity_warn(), 75.0);
    assert_eq!(*thresholds.flicker_warn(), 5);
}

#[test]
fn test_empty_narrative_is_vacuous_pass() {
    let summary = compute_narrative_overall_verdict(Vec::new());
    assert_eq!(summary.overall_verdict, Verdict::Pass);
    assert_eq!(summary.overall_reasons.len(), 1);
    assert!(summary.overall_reasons[0].contains("vacuously"));
}

#[test]
fn test_narrative_fail_lists_failing_shots() {
    let shots = vec![
        shot_with("a", Verdict::Pass),
        shot_with("b", Verdict::Fail),
        shot_with("c", Verdict::Warn),
    ];
    let summary = compute_narrative_overall_verdict(shots);
    assert_eq!(summary.overall_verdict, Verdict::Fail);
    assert!(summary.overall_reasons[0].contains('b'));
    assert_eq!(summary.shots.len(), 3);
}

#[test]
fn test_narrative_aggregation_over_all_combinations() {
    let all = [Verdict::Pass, Verdict::Warn, Verdict::Fail];
    for len in 1..=4u32 {
        for code in 0..3usize.pow(len) {
            let mut rest = code;
            let shots: Vec<ShotQaSummary> = (0..len)
                .map(|i| {
                    let verdict = all[rest % 3];
                    rest /= 3;
                    shot_with(&format!("s{i}"), verdict)
                })
                .collect();
            let any_fail = shots.iter().any(|s| s.verdict == Verdict::Fail);
            let any_warn = shots.iter().any(|s| s.verdict == Verdict::Warn);
            let expected = if any_fail {
                Verdict::Fail
            } else if any_warn {
                Verdict::Warn
            } else {
                Verdict::Pass
            };
            assert_eq!(compute_narrative_overall_verdict(shots).overall_verdict, expected);
        }
    }
}
