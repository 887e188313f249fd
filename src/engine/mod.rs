pub mod null;

pub use self::null::NullEngine;

use crate::error::{EngineError, SlapResult, SlapSegError};
use crate::types::{
    Orientation, ReturnStatus, SegmentationPosition, SlapImage, SubmissionIdentification,
    Supported,
};
use std::path::Path;
use tracing::{info, warn};

/// Result of a segmentation call: overall status plus every position found.
pub type SegmentOutput = (ReturnStatus, Vec<SegmentationPosition>);

/// Result of an orientation call. The orientation is only meaningful when
/// the status is `Success`.
pub type OrientationOutput = (ReturnStatus, Orientation);

/// The contract a third-party segmentation algorithm implements.
///
/// An instance is used by one process at a time and is never shared
/// between threads, so implementations need not be `Sync`.
pub trait SegmentationEngine {
    fn identification(&self) -> SubmissionIdentification;

    fn supported(&self) -> Supported;

    /// Locate every finger (and palm) region in `image`.
    ///
    /// On failure a best-effort segmentation should still be returned
    /// alongside `RequestRecaptureWithAttempt`.
    fn segment(&mut self, image: &SlapImage) -> Result<SegmentOutput, EngineError>;

    /// Hypothesize the hand orientation. `image.orientation` is `None`.
    ///
    /// Engines without this capability return `NotImplemented`.
    fn determine_orientation(
        &mut self,
        image: &SlapImage,
    ) -> Result<OrientationOutput, EngineError>;
}

/// Names accepted by [`load`].
pub const ENGINE_NAMES: &[&str] = &["null", "flaky"];

/// Resolve an engine implementation by name.
///
/// `config_dir` is the engine's read-only configuration directory. A
/// missing directory is tolerated; a path that exists but is not a
/// directory is rejected.
pub fn load(name: &str, config_dir: &Path) -> SlapResult<Box<dyn SegmentationEngine>> {
    info!("Loading engine '{}' (config: {})", name, config_dir.display());
    if config_dir.exists() && !config_dir.is_dir() {
        return Err(SlapSegError::Config(format!(
            "Engine configuration {} is not a directory",
            config_dir.display()
        )));
    }
    if !config_dir.exists() {
        warn!(
            "Engine configuration directory {} does not exist",
            config_dir.display()
        );
    }

    match name {
        "null" => Ok(Box::new(NullEngine::new())),
        "flaky" => Ok(Box::new(NullEngine::flaky(None))),
        other => Err(SlapSegError::Config(format!(
            "Unknown engine '{}' (available: {})",
            other,
            ENGINE_NAMES.join(", ")
        ))),
    }
}
