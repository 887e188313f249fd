use crate::dataset::Dataset;
use crate::engine::SegmentationEngine;
use crate::error::{EngineError, SlapResult, SlapSegError};
use crate::record::{
    LogWriter, OrientationRecord, RegionResult, Regions, SegmentationRecord, ORIENTATION_HEADER,
    SEGMENTATION_HEADER,
};
use crate::types::{ReturnCode, SlapKind};
use crate::validate::{
    check_deficiency_contract, expected_positions, gather_deficiencies, has_correct_quantity,
    validate_segmentation_position,
};
use std::any::Any;
use std::fs::{self, File};
use std::io::BufWriter;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

pub fn segmentation_log_name(kind: SlapKind, pid: u32) -> String {
    format!("segments-{}-{}.log", kind.code(), pid)
}

pub fn orientation_log_name(kind: SlapKind, pid: u32) -> String {
    format!("orientation-{}-{}.log", kind.code(), pid)
}

/// Shuffle the names of every `kind` image with the caller's generator.
pub fn shuffled_names(dataset: &Dataset, kind: SlapKind, rng: &mut fastrand::Rng) -> Vec<String> {
    let mut names = dataset.names(kind);
    rng.shuffle(&mut names);
    names
}

fn panic_detail(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}

/// Run one engine call, turning errors and panics into labeled failures.
fn call_engine<T>(
    operation: &'static str,
    image: &str,
    call: impl FnOnce() -> Result<T, EngineError>,
) -> SlapResult<(T, u128)> {
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(call));
    let elapsed = start.elapsed().as_micros();

    match outcome {
        Ok(Ok(value)) => Ok((value, elapsed)),
        Ok(Err(e)) => Err(SlapSegError::Engine {
            operation,
            image: image.to_string(),
            detail: Some(e.to_string()),
        }),
        Err(payload) => {
            warn!("Engine panicked while {} {}", operation, image);
            Err(SlapSegError::Engine {
                operation,
                image: image.to_string(),
                detail: panic_detail(payload.as_ref()),
            })
        }
    }
}

/// Feeds images of one kind to an engine and logs what comes back.
pub struct TestDriver<'a> {
    engine: &'a mut dyn SegmentationEngine,
    dataset: &'a Dataset,
    output_dir: &'a Path,
    pid: u32,
}

impl<'a> TestDriver<'a> {
    pub fn new(
        engine: &'a mut dyn SegmentationEngine,
        dataset: &'a Dataset,
        output_dir: &'a Path,
    ) -> Self {
        Self {
            engine,
            dataset,
            output_dir,
            pid: std::process::id(),
        }
    }

    fn create_log(
        &self,
        file_name: String,
        header: &[&str],
    ) -> SlapResult<LogWriter<BufWriter<File>>> {
        fs::create_dir_all(self.output_dir).map_err(|source| SlapSegError::Log {
            pid: self.pid,
            source,
        })?;
        let path = self.output_dir.join(file_name);
        let file = File::create(&path).map_err(|source| SlapSegError::Log {
            pid: self.pid,
            source,
        })?;
        debug!("Writing log {}", path.display());
        Ok(LogWriter::new(BufWriter::new(file), header)?)
    }

    /// Segment every image in `names`, in order, into this process's log.
    pub fn run_segment(&mut self, kind: SlapKind, names: &[String]) -> SlapResult<PathBuf> {
        let file_name = segmentation_log_name(kind, self.pid);
        let path = self.output_dir.join(&file_name);
        let mut log = self.create_log(file_name, SEGMENTATION_HEADER)?;

        info!("{}: segmenting {} {} images", self.pid, names.len(), kind);
        for name in names {
            let record = self.segment(kind, name)?;
            log.write_segmentation(&record)?;
        }
        Ok(path)
    }

    /// Ask the engine for the orientation of every image in `names`.
    /// Returns `None` without touching the filesystem if the engine
    /// does not claim the capability.
    pub fn run_determine_orientation(
        &mut self,
        kind: SlapKind,
        names: &[String],
    ) -> SlapResult<Option<PathBuf>> {
        if !self.engine.supported().determine_orientation {
            info!("Engine does not determine orientation; skipping {}", kind);
            return Ok(None);
        }

        let file_name = orientation_log_name(kind, self.pid);
        let path = self.output_dir.join(&file_name);
        let mut log = self.create_log(file_name, ORIENTATION_HEADER)?;

        info!(
            "{}: determining orientation of {} {} images",
            self.pid,
            names.len(),
            kind
        );
        for name in names {
            let record = self.determine_orientation(kind, name)?;
            log.write_orientation(&record)?;
        }
        Ok(Some(path))
    }

    pub fn segment(&mut self, kind: SlapKind, name: &str) -> SlapResult<SegmentationRecord> {
        let md = self.dataset.metadata(kind, name)?;
        let image = self.dataset.slap_image(kind, name, true)?;

        let engine = &mut *self.engine;
        let ((status, positions), elapsed_us) =
            call_engine("segmenting", name, || engine.segment(&image))?;

        check_deficiency_contract(&status, name)?;

        let regions = if status.code.has_attempt() {
            let deficiencies = gather_deficiencies(&status);
            let correct_quantity = has_correct_quantity(&positions, kind, md.orientation);
            if !correct_quantity {
                debug!(
                    "{}: {} positions returned for {} orientation",
                    name,
                    positions.len(),
                    md.orientation
                );
            }
            Regions::Attempted {
                regions: positions
                    .into_iter()
                    .map(|position| RegionResult {
                        errors: validate_segmentation_position(
                            &position, kind, md.width, md.height,
                        ),
                        position,
                    })
                    .collect(),
                deficiencies,
                correct_quantity,
            }
        } else {
            Regions::Declined {
                expected: expected_positions(kind, md.orientation)
                    .into_iter()
                    .collect(),
            }
        };

        Ok(SegmentationRecord {
            name: name.to_string(),
            elapsed_us,
            status,
            regions,
        })
    }

    pub fn determine_orientation(
        &mut self,
        kind: SlapKind,
        name: &str,
    ) -> SlapResult<OrientationRecord> {
        let image = self.dataset.slap_image(kind, name, false)?;

        let engine = &mut *self.engine;
        let ((status, orientation), elapsed_us) = call_engine(
            "determining orientation of",
            name,
            || engine.determine_orientation(&image),
        )?;

        let orientation = (status.code == ReturnCode::Success).then_some(orientation);
        Ok(OrientationRecord {
            name: name.to_string(),
            elapsed_us,
            status,
            orientation,
        })
    }
}
