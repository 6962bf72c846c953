//! Script validation command handler.

use montage::{
    MontageConfig, MontageResult, PipelineOrchestrator, ProfileCatalog, ScriptLoader,
    ShotStepFactory, StepEnvironment, TokioProcessInvoker,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/// Validate a script and its full step graph, then print the plan.
///
/// Nothing is spawned and no output directory is created.
pub fn validate_script(script: &Path, config: Option<&Path>) -> MontageResult<ExitCode> {
    let config = MontageConfig::load(config)?;
    let profiles = ProfileCatalog::from_dir(config.profiles().dir())?;
    let narrative = ScriptLoader::new(&profiles).load(script)?;

    let env = StepEnvironment::new(
        Arc::new(TokioProcessInvoker::new()),
        config.tools().clone(),
        Arc::new(profiles),
    );
    let factory = ShotStepFactory::new(Arc::new(env), config.pipeline().clone());
    PipelineOrchestrator::new().validate(&factory.build(&narrative))?;

    let plan = factory.describe(&narrative);
    println!(
        "Script '{}' is valid: {} shots, {} steps",
        narrative.id(),
        narrative.shots().len(),
        plan.len()
    );
    for step in &plan {
        if step.dependencies().is_empty() {
            println!("  {}", step.id());
        } else {
            println!("  {} <- {}", step.id(), step.dependencies().join(", "));
        }
    }

    Ok(ExitCode::SUCCESS)
}
