use slapseg::orchestrator::{run_worker, WORKER_FAILURE_EXIT};
use std::io;
use tracing::{debug, error};

/// Entry point of a worker process. The job arrives on stdin.
pub fn run() -> i32 {
    match run_worker(io::stdin().lock()) {
        Ok(log) => {
            if let Some(path) = log {
                debug!("Worker {} wrote {}", std::process::id(), path.display());
            }
            0
        }
        Err(e) => {
            error!("{}: {}", std::process::id(), e);
            WORKER_FAILURE_EXIT
        }
    }
}
