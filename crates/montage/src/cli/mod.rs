//! Command-line interface module.

mod commands;
mod report;
mod run;
mod validate;

pub use commands::{Cli, Commands, RunArgs};
pub use report::render_report;
pub use run::run_narrative;
pub use validate::validate_script;
