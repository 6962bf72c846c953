//! Montage - multi-shot narrative video pipelines
//!
//! Montage renders a narrative one shot at a time through external tools,
//! post-processes every shot (temporal regularization, vision QA, benchmark,
//! manifest), joins the shots into one video and reports a PASS/WARN/FAIL
//! verdict per shot and for the whole narrative.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use montage::{MontageConfig, NarrativeRunner};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = NarrativeRunner::from_config(MontageConfig::load(None)?)?;
//!     let outcome = runner.run(Path::new("scripts/harbor.json")).await?;
//!     println!("{}", outcome.summary().qa_summary.overall_verdict);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `montage_error` - Error types
//! - `montage_core` - Scripts, run context, metrics and summaries
//! - `montage_pipeline` - Step contract and topological orchestrator
//! - `montage_process` - External program invocation and output discovery
//! - `montage_qa` - Verdict engine
//! - `montage_report` - JSON and Markdown run reports
//! - `montage_narrative` - Configuration, script loading, shot steps and runs
//!
//! This crate (`montage`) re-exports everything for convenience.

pub use montage_core::*;
pub use montage_error::*;
pub use montage_narrative::*;
pub use montage_pipeline::*;
pub use montage_process::*;
pub use montage_qa::*;
pub use montage_report::*;

mod observability;

pub use observability::{ObservabilityConfig, init_observability_with_config};
