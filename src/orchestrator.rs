use crate::config::{HarnessConfig, Operation};
use crate::dataset::Dataset;
use crate::driver::{orientation_log_name, segmentation_log_name, shuffled_names, TestDriver};
use crate::engine::{self, SegmentationEngine};
use crate::error::{SlapResult, SlapSegError};
use crate::types::SlapKind;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Exit status of a worker whose run failed.
pub const WORKER_FAILURE_EXIT: i32 = 1;

/// Hidden command-line flag that turns the binary into a worker.
pub const WORKER_FLAG: &str = "--worker";

/// Flag forwarded to workers when the parent logs at debug level.
pub const DEBUG_FLAG: &str = "--debug";

/// Split `combined` into `num_sets` contiguous slices. Every slice but the
/// last holds `ceil(len / num_sets)` names; the last takes the remainder.
pub fn split_set(combined: &[String], num_sets: usize) -> SlapResult<Vec<Vec<String>>> {
    if num_sets == 0 {
        return Ok(Vec::new());
    }
    if num_sets == 1 {
        return Ok(vec![combined.to_vec()]);
    }

    let size = combined.len().div_ceil(num_sets);
    // Ceiling-sized slices must leave at least one name for the last set.
    if num_sets > combined.len() || size * (num_sets - 1) >= combined.len() {
        return Err(SlapSegError::Config(format!(
            "Too many sets: cannot split {} images across {} processes",
            combined.len(),
            num_sets
        )));
    }

    Ok(combined.chunks(size).map(<[String]>::to_vec).collect())
}

/// Everything a worker process needs to run its share of a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerJob {
    pub operation: Operation,
    pub kind: SlapKind,
    pub names: Vec<String>,
    pub config: HarnessConfig,
}

/// Run one partition of the suite against an engine in this process.
pub fn run_partition(
    engine: &mut dyn SegmentationEngine,
    dataset: &Dataset,
    output_dir: &Path,
    operation: Operation,
    kind: SlapKind,
    names: &[String],
) -> SlapResult<Option<PathBuf>> {
    let mut driver = TestDriver::new(engine, dataset, output_dir);
    match operation {
        Operation::Segment => driver.run_segment(kind, names).map(Some),
        Operation::Orientation => driver.run_determine_orientation(kind, names),
        other => Err(SlapSegError::Orchestration(format!(
            "Invalid operation {:?} sent to worker",
            other
        ))),
    }
}

/// Worker side: read the job from `input` and run it with a fresh engine.
pub fn run_worker<R: Read>(input: R) -> SlapResult<Option<PathBuf>> {
    let job: WorkerJob = serde_json::from_reader(input)?;
    debug!(
        "Worker {} received {} {} images",
        std::process::id(),
        job.names.len(),
        job.kind
    );

    let dataset = Dataset::load(&job.config.images)?;
    let mut engine = engine::load(&job.config.engine, &job.config.engine_config)?;
    run_partition(
        engine.as_mut(),
        &dataset,
        &job.config.output,
        job.operation,
        job.kind,
        &job.names,
    )
}

#[cfg(unix)]
fn is_no_children(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::ECHILD)
}

#[cfg(not(unix))]
fn is_no_children(_e: &io::Error) -> bool {
    false
}

/// Block until every child has exited. Interrupted waits are retried and
/// a child that has already been reaped counts as exited.
pub fn wait_for_exit(children: &mut [Child]) -> SlapResult<Vec<Option<ExitStatus>>> {
    let mut statuses = Vec::with_capacity(children.len());
    for child in children.iter_mut() {
        let status = loop {
            match child.wait() {
                Ok(status) => break Some(status),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if is_no_children(&e) => break None,
                Err(e) => {
                    return Err(SlapSegError::Orchestration(format!(
                        "Error while reaping: {}",
                        e
                    )))
                }
            }
        };
        debug!("Worker {} exited ({:?})", child.id(), status);
        statuses.push(status);
    }
    Ok(statuses)
}

/// What happened to one image kind during a suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: SlapKind,
    pub images: usize,
    pub workers: usize,
    pub logs: Vec<PathBuf>,
    pub duration: Duration,
}

/// Fans a suite out across worker processes.
pub struct Orchestrator {
    worker_program: PathBuf,
    num_procs: usize,
    config: HarnessConfig,
    debug: bool,
}

impl Orchestrator {
    /// `worker_program` is re-executed with [`WORKER_FLAG`] for each worker.
    pub fn new(
        worker_program: impl Into<PathBuf>,
        num_procs: usize,
        config: HarnessConfig,
    ) -> Self {
        Self {
            worker_program: worker_program.into(),
            num_procs,
            config,
            debug: false,
        }
    }

    /// Start workers with [`DEBUG_FLAG`] so they log at the parent's level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn num_procs(&self) -> usize {
        self.num_procs
    }

    /// Arguments a worker process is started with.
    pub fn worker_args(&self) -> Vec<&'static str> {
        let mut args = vec![WORKER_FLAG];
        if self.debug {
            args.push(DEBUG_FLAG);
        }
        args
    }

    fn spawn_worker(&self, job: &WorkerJob) -> SlapResult<Child> {
        let mut child = Command::new(&self.worker_program)
            .args(self.worker_args())
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| SlapSegError::Orchestration(format!("Error during spawn: {}", e)))?;

        let payload = serde_json::to_vec(job)?;
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "worker stdin unavailable")),
        };
        if let Err(e) = write_result {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SlapSegError::Orchestration(format!(
                "Error sending job to worker {}: {}",
                child.id(),
                e
            )));
        }
        Ok(child)
    }

    /// Run one kind's names across all workers and wait for them.
    pub fn run_kind(
        &self,
        operation: Operation,
        kind: SlapKind,
        names: &[String],
    ) -> SlapResult<Vec<PathBuf>> {
        let sets = split_set(names, self.num_procs)?;

        let mut children = Vec::with_capacity(sets.len());
        for set in sets {
            let job = WorkerJob {
                operation,
                kind,
                names: set,
                config: self.config.clone(),
            };
            match self.spawn_worker(&job) {
                Ok(child) => {
                    debug!("Spawned worker {} with {} images", child.id(), job.names.len());
                    children.push(child);
                }
                Err(e) => {
                    // Reap what was already started before giving up.
                    let _ = wait_for_exit(&mut children);
                    return Err(e);
                }
            }
        }

        let statuses = wait_for_exit(&mut children)?;

        let mut failed = 0;
        for (status, child) in statuses.iter().zip(&children) {
            if let Some(s) = status.filter(|s| !s.success()) {
                error!("Worker {} failed ({})", child.id(), s);
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(SlapSegError::WorkerFailed {
                failed,
                total: children.len(),
            });
        }

        let logs = children
            .iter()
            .map(|child| {
                let name = match operation {
                    Operation::Orientation => orientation_log_name(kind, child.id()),
                    _ => segmentation_log_name(kind, child.id()),
                };
                self.config.output.join(name)
            })
            .filter(|path| path.exists())
            .collect();
        Ok(logs)
    }
}

/// Run the selected suite over every kind the engine supports.
///
/// Names are shuffled per kind with one generator seeded from `seed`, so a
/// seed always reproduces the same assignment of images to workers.
pub fn run_suite(
    operation: Operation,
    seed: u64,
    engine: &mut dyn SegmentationEngine,
    dataset: &Dataset,
    orchestrator: &Orchestrator,
) -> SlapResult<Vec<KindSummary>> {
    if !operation.is_suite() {
        return Err(SlapSegError::Orchestration(format!(
            "Invalid operation {:?} sent to suite runner",
            operation
        )));
    }

    let mut rng = fastrand::Rng::with_seed(seed);
    let supported = engine.supported();
    info!("Random seed: {}", seed);

    if operation == Operation::Orientation && !supported.determine_orientation {
        warn!("Engine does not claim orientation determination; nothing to run");
        return Ok(Vec::new());
    }

    let mut summaries = Vec::new();
    for kind in supported.kinds.iter().copied() {
        let names = shuffled_names(dataset, kind, &mut rng);
        if names.is_empty() {
            info!("No {} images in the dataset; skipping", kind);
            continue;
        }
        let start = Instant::now();

        let logs = if orchestrator.num_procs() <= 1 {
            run_partition(
                engine,
                dataset,
                &orchestrator.config.output,
                operation,
                kind,
                &names,
            )?
            .into_iter()
            .collect()
        } else {
            orchestrator.run_kind(operation, kind, &names)?
        };

        summaries.push(KindSummary {
            kind,
            images: names.len(),
            workers: orchestrator.num_procs(),
            logs,
            duration: start.elapsed(),
        });
    }
    Ok(summaries)
}
