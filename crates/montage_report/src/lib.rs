//! Summary reporting for Montage runs.
//!
//! Turns a finished [`RunContext`] into a [`NarrativeRunSummary`], reading each
//! shot's benchmark and vision reports defensively, and persists it as JSON
//! plus a Markdown report.
//!
//! [`RunContext`]: montage_core::RunContext
//! [`NarrativeRunSummary`]: montage_core::NarrativeRunSummary

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod atomic;
mod extract;
mod markdown;
mod reporter;

pub use atomic::write_atomic;
pub use extract::{collect_shot_metrics, read_benchmark_report, read_vision_report, read_vision_status};
pub use markdown::render_markdown;
pub use reporter::{ReportPaths, SummaryReporter, load_summary};

/// File name of the machine-readable summary.
pub const SUMMARY_FILE: &str = "narrative-run-summary.json";

/// File name of the human-readable report.
pub const REPORT_FILE: &str = "narrative-run-report.md";
