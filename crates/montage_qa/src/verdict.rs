//! Per-shot classification and narrative aggregation.

use crate::QaThresholds;
use montage_core::{NarrativeQaSummary, ShotMetrics, ShotQaSummary, Verdict};

/// Which direction of a signal is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Larger values are better; values below the levels trip
    HigherIsBetter,
    /// Smaller values are better; values above the levels trip
    LowerIsBetter,
}

/// Classify one value.
///
/// `fail` is optional for soft signals that can only warn. Non-finite values
/// always pass.
///
/// # Examples
///
/// ```
/// use montage_core::Verdict;
/// use montage_qa::{Polarity, classify};
///
/// assert_eq!(classify(12.0, Polarity::LowerIsBetter, 5.0, Some(15.0)), Verdict::Warn);
/// assert_eq!(classify(0.5, Polarity::HigherIsBetter, 0.7, None), Verdict::Warn);
/// ```
pub fn classify(value: f64, polarity: Polarity, warn: f64, fail: Option<f64>) -> Verdict {
    if !value.is_finite() {
        return Verdict::Pass;
    }
    let trips = |level: f64| match polarity {
        Polarity::HigherIsBetter => value < level,
        Polarity::LowerIsBetter => value > level,
    };
    if fail.is_some_and(|level| trips(level)) {
        Verdict::Fail
    } else if trips(warn) {
        Verdict::Warn
    } else {
        Verdict::Pass
    }
}

struct Finding {
    verdict: Verdict,
    reason: String,
}

fn push(findings: &mut Vec<Finding>, verdict: Verdict, reason: String) {
    if verdict != Verdict::Pass {
        findings.push(Finding { verdict, reason });
    }
}

fn evaluate(metrics: &ShotMetrics, t: &QaThresholds) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(status) = metrics.vision_status.as_deref() {
        match status.trim().to_ascii_uppercase().as_str() {
            "FAIL" => push(&mut findings, Verdict::Fail, "vision inspection reported FAIL".into()),
            "WARN" => push(&mut findings, Verdict::Warn, "vision inspection reported WARN".into()),
            _ => {}
        }
    }

    if let Some(score) = metrics.vision_overall {
        let min = *t.vision_overall_min();
        let verdict = classify(
            score,
            Polarity::HigherIsBetter,
            min + t.vision_overall_margin(),
            Some(min),
        );
        let reason = match verdict {
            Verdict::Fail => format!("vision overall score {score:.1} is below minimum {min:.1}"),
            _ => format!(
                "vision overall score {score:.1} is marginal (within {:.1} of minimum {min:.1})",
                t.vision_overall_margin()
            ),
        };
        push(&mut findings, verdict, reason);
    }

    if let Some(severity) = metrics.vision_artifacts {
        let max = *t.vision_artifact_max();
        let verdict = classify(
            severity,
            Polarity::LowerIsBetter,
            max - t.vision_artifact_margin(),
            Some(max),
        );
        let reason = match verdict {
            Verdict::Fail => {
                format!("vision artifact severity {severity:.1} is above maximum {max:.1}")
            }
            _ => format!(
                "vision artifact severity {severity:.1} is marginal (within {:.1} of maximum {max:.1})",
                t.vision_artifact_margin()
            ),
        };
        push(&mut findings, verdict, reason);
    }

    if let Some(count) = metrics.flicker_frame_count {
        let verdict = classify(
            f64::from(count),
            Polarity::LowerIsBetter,
            f64::from(*t.flicker_warn()),
            Some(f64::from(*t.flicker_fail())),
        );
        let level = if verdict == Verdict::Fail {
            t.flicker_fail()
        } else {
            t.flicker_warn()
        };
        push(
            &mut findings,
            verdict,
            format!("flicker frame count {count} exceeds {level}"),
        );
    }

    let scored = [
        (
            "jitter score",
            metrics.jitter_score,
            Polarity::LowerIsBetter,
            *t.jitter_warn(),
            Some(*t.jitter_fail()),
        ),
        (
            "identity score",
            metrics.identity_score,
            Polarity::HigherIsBetter,
            *t.identity_warn(),
            Some(*t.identity_fail()),
        ),
        (
            "overall quality",
            metrics.overall_quality,
            Polarity::HigherIsBetter,
            *t.quality_warn(),
            Some(*t.quality_fail()),
        ),
        (
            "camera-path adherence error",
            metrics.path_adherence_error,
            Polarity::LowerIsBetter,
            *t.path_error_warn(),
            None,
        ),
        (
            "camera-path direction consistency",
            metrics.path_direction_consistency,
            Polarity::HigherIsBetter,
            *t.path_direction_warn(),
            None,
        ),
    ];

    for (name, value, polarity, warn, fail) in scored {
        let Some(value) = value else { continue };
        let verdict = classify(value, polarity, warn, fail);
        let level = match (verdict, fail) {
            (Verdict::Fail, Some(fail)) => fail,
            _ => warn,
        };
        let relation = match polarity {
            Polarity::HigherIsBetter => "below",
            Polarity::LowerIsBetter => "above",
        };
        push(
            &mut findings,
            verdict,
            format!("{name} {value:.2} is {relation} {level:.2}"),
        );
    }

    findings
}

/// Classify one shot.
///
/// The verdict is the most severe tripped signal; each tripped signal adds
/// one reason.
///
/// # Examples
///
/// ```
/// use montage_core::{ShotMetrics, Verdict};
/// use montage_qa::{QaThresholds, compute_shot_qa_verdict};
///
/// let metrics = ShotMetrics {
///     vision_overall: Some(82.0),
///     ..ShotMetrics::new("intro")
/// };
/// let summary = compute_shot_qa_verdict(&metrics, "wide", &QaThresholds::default());
/// assert_eq!(summary.verdict, Verdict::Warn);
/// assert!(summary.reasons[0].contains("marginal"));
/// ```
pub fn compute_shot_qa_verdict(
    metrics: &ShotMetrics,
    profile_id: &str,
    thresholds: &QaThresholds,
) -> ShotQaSummary {
    let findings = evaluate(metrics, thresholds);
    let verdict = findings
        .iter()
        .map(|f| f.verdict)
        .max()
        .unwrap_or(Verdict::Pass);

    tracing::debug!(
        shot = %metrics.shot_id,
        verdict = %verdict,
        reasons = findings.len(),
        "Shot QA verdict computed"
    );

    ShotQaSummary {
        shot_id: metrics.shot_id.clone(),
        profile_id: profile_id.to_string(),
        metrics: metrics.clone(),
        verdict,
        reasons: findings.into_iter().map(|f| f.reason).collect(),
    }
}

const LISTED_SHOTS: usize = 5;

fn list_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let ids: Vec<&str> = ids.collect();
    let mut listed = ids
        .iter()
        .take(LISTED_SHOTS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if ids.len() > LISTED_SHOTS {
        listed.push_str(&format!(" and {} more", ids.len() - LISTED_SHOTS));
    }
    listed
}

/// Aggregate shot verdicts for a narrative.
///
/// FAIL when any shot failed, else WARN when any shot warned, else PASS.
/// An empty list is a vacuous PASS.
pub fn compute_narrative_overall_verdict(shots: Vec<ShotQaSummary>) -> NarrativeQaSummary {
    let total = shots.len();
    let with = |verdict: Verdict| {
        shots
            .iter()
            .filter(move |s| s.verdict == verdict)
            .map(|s| s.shot_id.as_str())
    };
    let failed = with(Verdict::Fail).count();
    let warned = with(Verdict::Warn).count();

    let (overall_verdict, overall_reasons) = if total == 0 {
        (
            Verdict::Pass,
            vec!["no shots were evaluated; verdict is vacuously PASS".to_string()],
        )
    } else if failed > 0 {
        let mut reasons = vec![format!(
            "{failed} of {total} shots failed QA: {}",
            list_ids(with(Verdict::Fail))
        )];
        if warned > 0 {
            reasons.push(format!("{warned} of {total} shots need review"));
        }
        (Verdict::Fail, reasons)
    } else if warned > 0 {
        (
            Verdict::Warn,
            vec![format!(
                "{warned} of {total} shots need review: {}",
                list_ids(with(Verdict::Warn))
            )],
        )
    } else {
        (Verdict::Pass, vec![format!("all {total} shots passed QA")])
    };

    tracing::info!(verdict = %overall_verdict, shots = total, failed, warned, "Narrative QA verdict computed");

    NarrativeQaSummary {
        overall_verdict,
        overall_reasons,
        shots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries_are_exclusive() {
        assert_eq!(classify(15.0, Polarity::LowerIsBetter, 5.0, Some(15.0)), Verdict::Warn);
        assert_eq!(classify(5.0, Polarity::LowerIsBetter, 5.0, Some(15.0)), Verdict::Pass);
        assert_eq!(classify(50.0, Polarity::HigherIsBetter, 70.0, Some(50.0)), Verdict::Warn);
        assert_eq!(classify(f64::NAN, Polarity::HigherIsBetter, 70.0, Some(50.0)), Verdict::Pass);
    }

    #[test]
    fn test_list_ids_truncates() {
        let ids = ["a", "b", "c", "d", "e", "f", "g"];
        assert_eq!(list_ids(ids.into_iter()), "a, b, c, d, e and 2 more");
    }
}
