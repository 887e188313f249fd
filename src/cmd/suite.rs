use crate::reports;
use slapseg::config::{HarnessConfig, Operation};
use slapseg::dataset::Dataset;
use slapseg::engine;
use slapseg::error::SlapResult;
use slapseg::orchestrator::{run_suite, Orchestrator};
use tracing::{info, warn};

pub fn run(
    operation: Operation,
    seed: u64,
    num_procs: usize,
    debug: bool,
    harness: &HarnessConfig,
) -> SlapResult<()> {
    info!("🚀 Starting {:?} suite with {} process(es)", operation, num_procs);

    let dataset = Dataset::load(&harness.images)?;
    if dataset.is_empty() {
        warn!("⚠️  Manifest lists no images; nothing will be logged");
    }
    let mut engine = engine::load(&harness.engine, &harness.engine_config)?;

    let program = std::env::current_exe()?;
    let orchestrator = Orchestrator::new(program, num_procs, harness.clone()).with_debug(debug);

    let summaries = run_suite(operation, seed, engine.as_mut(), &dataset, &orchestrator)?;
    reports::print_run_summary(operation, seed, &summaries);
    Ok(())
}
